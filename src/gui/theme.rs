//! Dark color scheme.

use egui::Color32;

pub const BACKGROUND: Color32 = Color32::from_rgb(0x1a, 0x1a, 0x2e);
pub const SELECTED_ROW: Color32 = Color32::from_rgb(0x2a, 0x2a, 0x3e);
pub const ACCENT: Color32 = Color32::from_rgb(0x66, 0xd9, 0xef);

/// Apply the dark visuals with our panel background.
pub fn apply(ctx: &egui::Context) {
    let mut visuals = egui::Visuals::dark();
    visuals.panel_fill = BACKGROUND;
    visuals.window_fill = SELECTED_ROW;
    visuals.selection.bg_fill = ACCENT.linear_multiply(0.4);
    ctx.set_visuals(visuals);
}
