//! Output format inference
//! The container is chosen solely from the output file extension.

use crate::encode::EncodeError;
use std::fmt;
use std::path::{Path, PathBuf};

/// Supported output containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Mp4,
    Gif,
    Avi,
}

impl OutputFormat {
    /// Order used for save dialog filters; the first one is the default.
    pub fn all() -> &'static [OutputFormat] {
        &[OutputFormat::Mp4, OutputFormat::Gif, OutputFormat::Avi]
    }

    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Mp4 => "mp4",
            OutputFormat::Gif => "gif",
            OutputFormat::Avi => "avi",
        }
    }

    /// ffmpeg video codec, `None` for formats encoded in-process.
    pub fn ffmpeg_codec(self) -> Option<&'static str> {
        match self {
            OutputFormat::Mp4 => Some("libx264"),
            OutputFormat::Avi => Some("mpeg4"),
            OutputFormat::Gif => None,
        }
    }

    /// Dialog filter label, e.g. "MP4 files".
    pub fn filter_label(self) -> String {
        format!("{} files", self)
    }

    /// Infer the format from the path's extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self, EncodeError> {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "mp4" => Ok(OutputFormat::Mp4),
            "gif" => Ok(OutputFormat::Gif),
            "avi" => Ok(OutputFormat::Avi),
            _ => Err(EncodeError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Mp4 => write!(f, "MP4"),
            OutputFormat::Gif => write!(f, "GIF"),
            OutputFormat::Avi => write!(f, "AVI"),
        }
    }
}

/// Append `.mp4` when the chosen path has no extension at all.
pub fn with_default_extension(path: PathBuf) -> PathBuf {
    if path.extension().is_some() {
        path
    } else {
        path.with_extension(OutputFormat::Mp4.extension())
    }
}
