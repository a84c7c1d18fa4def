//! Project module - ordered image list and timelapse settings

mod image_list;
mod timelapse;

pub use image_list::{Direction, ImageList};
pub use timelapse::{validate_duration, ProjectError, TimelapseProject};
