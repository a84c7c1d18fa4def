//! Control Panel Widget
//! Left side panel with image, ordering and export controls.

use crate::gui::theme;
use egui::{Color32, RichText};
use std::path::Path;

/// What the panel needs to know to enable its buttons.
pub struct PanelState<'a> {
    pub image_count: usize,
    pub has_selection: bool,
    pub duration: f64,
    pub output_directory: Option<&'a Path>,
    pub busy: bool,
}

/// Left side control panel.
pub struct ControlPanel {
    pub progress: f32,
    pub status: String,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            progress: 0.0,
            status: "Ready".to_string(),
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui, state: &PanelState<'_>) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("Timelapse Generator")
                    .size(22.0)
                    .strong()
                    .color(theme::ACCENT),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Images Section =====
        ui.label(RichText::new("🖼 Images").size(14.0).strong());
        ui.add_space(5.0);

        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(!state.busy, |ui| {
                let button = egui::Button::new(RichText::new("➕ Add Images").size(14.0))
                    .min_size(egui::vec2(200.0, 30.0));
                if ui.add(button).clicked() {
                    action = ControlPanelAction::AddImages;
                }
            });
            ui.label(
                RichText::new(format!("{} image(s) selected", state.image_count))
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });

        ui.add_space(10.0);

        ui.horizontal(|ui| {
            ui.add_enabled_ui(state.has_selection && !state.busy, |ui| {
                if ui.button("⬆ Move Up").clicked() {
                    action = ControlPanelAction::MoveUp;
                }
                if ui.button("⬇ Move Down").clicked() {
                    action = ControlPanelAction::MoveDown;
                }
            });
        });
        if !state.has_selection && state.image_count > 0 {
            ui.label(
                RichText::new("Click an image to select it for reordering")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Output Section =====
        ui.label(RichText::new("📁 Output").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let dir_text = state
                        .output_directory
                        .map(|p| p.to_string_lossy().to_string())
                        .unwrap_or_else(|| "No directory selected".to_string());

                    ui.label(RichText::new(&dir_text).size(12.0).color(
                        if state.output_directory.is_some() {
                            Color32::WHITE
                        } else {
                            Color32::GRAY
                        },
                    ));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("📂 Browse").clicked() {
                            action = ControlPanelAction::SelectOutputDirectory;
                        }
                    });
                });
            });

        ui.add_space(5.0);
        ui.label(
            RichText::new(format!("Duration per image: {} s", state.duration))
                .size(12.0)
                .color(Color32::GRAY),
        );

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Action Buttons =====
        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(!state.busy, |ui| {
                let preview = egui::Button::new(RichText::new("▶ Preview Timelapse").size(16.0))
                    .min_size(egui::vec2(200.0, 35.0));
                if ui.add(preview).clicked() {
                    action = ControlPanelAction::Preview;
                }

                ui.add_space(8.0);

                let save = egui::Button::new(RichText::new("💾 Save Timelapse").size(16.0))
                    .min_size(egui::vec2(200.0, 35.0));
                if ui.add(save).clicked() {
                    action = ControlPanelAction::Save;
                }
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Progress Section =====
        ui.label(RichText::new("📊 Progress").size(14.0).strong());
        ui.add_space(5.0);

        ui.add(
            egui::ProgressBar::new(self.progress / 100.0)
                .show_percentage()
                .animate(state.busy),
        );

        ui.add_space(5.0);

        let status_color = if self.status.contains("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.contains("Complete") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    /// Set progress and status
    pub fn set_progress(&mut self, progress: f32, status: &str) {
        self.progress = progress;
        self.status = status.to_string();
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    AddImages,
    MoveUp,
    MoveDown,
    SelectOutputDirectory,
    Preview,
    Save,
}
