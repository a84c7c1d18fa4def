//! Timelapse Generator - order still images and export them as MP4, AVI or GIF
//!
//! A Rust application for assembling timelapses from a hand-ordered image list.

mod config;
mod encode;
mod gui;
mod project;

use eframe::egui;
use gui::TimelapseApp;

fn main() -> eframe::Result<()> {
    // Log to stderr (RUST_LOG=debug for encoder command lines)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if !encode::FfmpegEncoder::is_available() {
        log::warn!("ffmpeg not found on PATH; only GIF export will work");
    }

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config::WINDOW_SIZE)
            .with_min_inner_size(config::MIN_WINDOW_SIZE)
            .with_title("Sci-Fi Timelapse Generator"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Timelapse Generator",
        options,
        Box::new(|cc| Ok(Box::new(TimelapseApp::new(cc)))),
    )
}
