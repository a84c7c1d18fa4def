//! Encode module - turns an ordered (image, duration) sequence into a media file
//!
//! MP4 and AVI are produced by the `ffmpeg` executable, GIF in-process
//! with the `image` crate. The container is inferred from the output extension.

mod canvas;
mod ffmpeg;
mod format;
mod gif;

pub use ffmpeg::FfmpegEncoder;
pub use format::{with_default_extension, OutputFormat};
pub use gif::GifFrameEncoder;

use crate::config::EncodeSettings;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("No images to encode")]
    NoFrames,
    #[error("Unsupported output format: {0} (use .mp4, .gif or .avi)")]
    UnsupportedFormat(PathBuf),
    #[error("Image not found: {0}")]
    MissingImage(PathBuf),
    #[error("Failed to read image {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("GIF encoding failed: {0}")]
    Gif(#[source] image::ImageError),
    #[error("ffmpeg was not found on PATH")]
    FfmpegNotFound,
    #[error("ffmpeg failed: {0}")]
    FfmpegFailed(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// One image of the timelapse and how long it stays on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct TimedFrame {
    pub path: PathBuf,
    pub duration: f64,
}

impl From<(PathBuf, f64)> for TimedFrame {
    fn from((path, duration): (PathBuf, f64)) -> Self {
        Self { path, duration }
    }
}

/// Encoding collaborator: writes `frames` to `output`.
///
/// `progress` receives (frames done, total frames).
pub trait Encoder {
    fn encode(
        &self,
        frames: &[TimedFrame],
        output: &Path,
        progress: &mut dyn FnMut(usize, usize),
    ) -> Result<(), EncodeError>;
}

/// Pick the encoder implementation for a container.
pub fn encoder_for(format: OutputFormat, settings: EncodeSettings) -> Box<dyn Encoder + Send> {
    match format {
        OutputFormat::Gif => Box::new(GifFrameEncoder::new(settings)),
        OutputFormat::Mp4 | OutputFormat::Avi => Box::new(FfmpegEncoder::new(format, settings)),
    }
}

/// Encode a sequence to `output`, choosing the encoder from its extension.
pub fn encode_timelapse(
    frames: &[TimedFrame],
    output: &Path,
    settings: EncodeSettings,
    progress: &mut dyn FnMut(usize, usize),
) -> Result<(), EncodeError> {
    let format = OutputFormat::from_path(output)?;
    check_frames(frames)?;

    log::info!(
        "Encoding {} images to {} ({})",
        frames.len(),
        output.display(),
        format
    );
    encoder_for(format, settings).encode(frames, output, progress)
}

/// Every frame must exist on disk, and there must be at least one.
pub fn check_frames(frames: &[TimedFrame]) -> Result<(), EncodeError> {
    if frames.is_empty() {
        return Err(EncodeError::NoFrames);
    }
    if let Some(missing) = frames.iter().find(|f| !f.path.is_file()) {
        return Err(EncodeError::MissingImage(missing.path.clone()));
    }
    Ok(())
}

/// Number of output frames an image occupies at `fps` (never zero).
pub fn frames_for_duration(duration: f64, fps: u32) -> u32 {
    ((duration * fps as f64).round() as u32).max(1)
}
