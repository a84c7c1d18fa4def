//! Application configuration
//! Fixed encoder parameters and UI constants. Nothing here is persisted.

/// Output frame rate for every container.
pub const FRAME_RATE: u32 = 24;

/// Target video bitrate passed to ffmpeg.
pub const VIDEO_BITRATE: &str = "5000k";

/// x264 preset used for MP4 output.
pub const X264_PRESET: &str = "ultrafast";

/// Exclusive lower bound for the per-image duration (seconds).
pub const MIN_DURATION: f64 = 0.1;
/// Inclusive upper bound for the per-image duration (seconds).
pub const MAX_DURATION: f64 = 10.0;
/// Duration used until the user picks another one.
pub const DEFAULT_DURATION: f64 = 0.5;

/// Thumbnails are fit inside a square of this many pixels.
pub const THUMBNAIL_SIZE: u32 = 100;

pub const WINDOW_SIZE: [f32; 2] = [1000.0, 700.0];
pub const MIN_WINDOW_SIZE: [f32; 2] = [800.0, 560.0];

/// Encoder settings handed to every encode job.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodeSettings {
    pub fps: u32,
    pub bitrate: String,
    pub preset: String,
    /// GIF repeats forever when true.
    pub loop_forever: bool,
}

impl Default for EncodeSettings {
    fn default() -> Self {
        Self {
            fps: FRAME_RATE,
            bitrate: VIDEO_BITRATE.to_string(),
            preset: X264_PRESET.to_string(),
            loop_forever: true,
        }
    }
}
