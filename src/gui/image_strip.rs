//! Image Strip Widget
//! Scrollable list of thumbnails in render order. Clicking a row selects it.

use crate::config::THUMBNAIL_SIZE;
use crate::gui::theme;
use crate::gui::ThumbnailCache;
use crate::project::ImageList;
use egui::{Color32, RichText, ScrollArea, Sense};

const THUMB_BOX: f32 = THUMBNAIL_SIZE as f32;
const ROW_MARGIN: f32 = 5.0;
/// Height of one framed row. `show_rows` adds `item_spacing.y` between rows itself.
const ROW_HEIGHT: f32 = THUMB_BOX + 2.0 * ROW_MARGIN;

/// Actions triggered by the image strip
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ImageStripAction {
    None,
    Select(usize),
}

pub struct ImageStrip;

impl ImageStrip {
    /// Draw every image row; returns the row the user clicked.
    pub fn show(ui: &mut egui::Ui, images: &ImageList, thumbnails: &ThumbnailCache) -> ImageStripAction {
        let mut action = ImageStripAction::None;

        if images.is_empty() {
            ui.centered_and_justified(|ui| {
                ui.label(
                    RichText::new("No images yet. Click \"Add Images\" to begin.")
                        .size(18.0)
                        .color(theme::ACCENT),
                );
            });
            return action;
        }

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show_rows(ui, ROW_HEIGHT, images.len(), |ui, row_range| {
                for idx in row_range {
                    let Some(entry) = images.get(idx) else {
                        continue;
                    };
                    let selected = images.selected() == Some(idx);

                    let fill = if selected {
                        theme::SELECTED_ROW
                    } else {
                        theme::BACKGROUND
                    };

                    let row = egui::Frame::none()
                        .fill(fill)
                        .rounding(5.0)
                        .inner_margin(ROW_MARGIN)
                        .show(ui, |ui| {
                            ui.set_width(ui.available_width());
                            ui.horizontal(|ui| {
                                ui.label(
                                    RichText::new(format!("{:>3}", idx + 1))
                                        .monospace()
                                        .color(Color32::GRAY),
                                );

                                let (rect, _) = ui.allocate_exact_size(
                                    egui::vec2(THUMB_BOX, THUMB_BOX),
                                    Sense::hover(),
                                );
                                if let Some(texture) = thumbnails.get(&entry.path) {
                                    let size = texture.size_vec2();
                                    let thumb_rect = egui::Rect::from_center_size(rect.center(), size);
                                    egui::Image::new((texture.id(), size)).paint_at(ui, thumb_rect);
                                } else {
                                    let text = if thumbnails.has_failed(&entry.path) {
                                        "unreadable"
                                    } else {
                                        "loading…"
                                    };
                                    ui.painter().text(
                                        rect.center(),
                                        egui::Align2::CENTER_CENTER,
                                        text,
                                        egui::FontId::proportional(11.0),
                                        Color32::GRAY,
                                    );
                                }

                                ui.label(
                                    RichText::new(entry.display_name())
                                        .size(12.0)
                                        .color(theme::ACCENT),
                                );
                            });
                        });

                    if row.response.interact(Sense::click()).clicked() {
                        action = ImageStripAction::Select(idx);
                    }
                }
            });

        action
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_height_fits_thumbnail_and_frame_margins() {
        // Thumbnails are scaled to fit THUMBNAIL_SIZE, so the box never clips one
        assert_eq!(ROW_HEIGHT - 2.0 * ROW_MARGIN, THUMBNAIL_SIZE as f32);
        assert!(ROW_HEIGHT > THUMB_BOX);
    }
}
