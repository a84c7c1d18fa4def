//! Timelapse Project
//! Image list, per-image duration and output directory for one session.

use crate::config::{DEFAULT_DURATION, MAX_DURATION, MIN_DURATION};
use crate::project::ImageList;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ProjectError {
    #[error("Please add images to create a timelapse.")]
    NoImages,
    #[error("Please select an output directory to save the timelapse.")]
    NoOutputDirectory,
    #[error("Output directory is not writable: {0}")]
    OutputDirectoryNotWritable(PathBuf),
    #[error("Duration must be greater than {min} and at most {max} seconds (got {value})")]
    DurationOutOfRange { value: f64, min: f64, max: f64 },
}

impl ProjectError {
    /// Short title for the notice shown to the user.
    pub fn title(&self) -> &'static str {
        match self {
            ProjectError::NoImages => "No Images",
            ProjectError::NoOutputDirectory => "No Output Directory",
            ProjectError::OutputDirectoryNotWritable(_) => "Output Directory",
            ProjectError::DurationOutOfRange { .. } => "Invalid Duration",
        }
    }
}

/// In-memory project owned by the application controller. Never persisted.
#[derive(Debug, Clone)]
pub struct TimelapseProject {
    pub images: ImageList,
    duration_per_image: f64,
    output_directory: Option<PathBuf>,
}

impl Default for TimelapseProject {
    fn default() -> Self {
        Self::new()
    }
}

impl TimelapseProject {
    pub fn new() -> Self {
        Self {
            images: ImageList::new(),
            duration_per_image: DEFAULT_DURATION,
            output_directory: None,
        }
    }

    pub fn duration(&self) -> f64 {
        self.duration_per_image
    }

    /// Set seconds per image. Values outside (0.1, 10.0] are rejected.
    pub fn set_duration(&mut self, seconds: f64) -> Result<(), ProjectError> {
        validate_duration(seconds)?;
        self.duration_per_image = seconds;
        Ok(())
    }

    pub fn output_directory(&self) -> Option<&Path> {
        self.output_directory.as_deref()
    }

    pub fn set_output_directory(&mut self, dir: impl Into<PathBuf>) {
        self.output_directory = Some(dir.into());
    }

    /// Preview needs at least one image.
    pub fn validate_for_export(&self) -> Result<(), ProjectError> {
        if self.images.is_empty() {
            return Err(ProjectError::NoImages);
        }
        Ok(())
    }

    /// Save needs images and a writable output directory, checked in that order.
    pub fn validate_for_save(&self) -> Result<(), ProjectError> {
        self.validate_for_export()?;
        let dir = self
            .output_directory
            .as_ref()
            .ok_or(ProjectError::NoOutputDirectory)?;
        if !is_writable_dir(dir) {
            return Err(ProjectError::OutputDirectoryNotWritable(dir.clone()));
        }
        Ok(())
    }

    pub fn export_sequence(&self) -> Vec<(PathBuf, f64)> {
        self.images.export_sequence(self.duration_per_image)
    }
}

pub fn validate_duration(seconds: f64) -> Result<(), ProjectError> {
    if seconds.is_finite() && seconds > MIN_DURATION && seconds <= MAX_DURATION {
        Ok(())
    } else {
        Err(ProjectError::DurationOutOfRange {
            value: seconds,
            min: MIN_DURATION,
            max: MAX_DURATION,
        })
    }
}

/// A directory counts as writable only if a scratch file can be created in it.
fn is_writable_dir(dir: &Path) -> bool {
    if !dir.is_dir() {
        return false;
    }
    match tempfile::tempfile_in(dir) {
        Ok(_) => true,
        Err(e) => {
            log::debug!("{} is not writable: {}", dir.display(), e);
            false
        }
    }
}
