//! GUI module - User interface components

mod app;
mod control_panel;
mod dialogs;
mod image_strip;
mod theme;
mod thumbnails;

pub use app::TimelapseApp;
pub use control_panel::{ControlPanel, ControlPanelAction, PanelState};
pub use dialogs::{DurationPrompt, Notice, NoticeQueue, PromptOutcome};
pub use image_strip::{ImageStrip, ImageStripAction};
pub use thumbnails::ThumbnailCache;
