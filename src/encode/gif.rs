//! GIF Encoder
//! Writes one GIF frame per image with the image's duration as frame delay.

use crate::config::EncodeSettings;
use crate::encode::canvas::{canvas_size, compose_on_canvas};
use crate::encode::{frames_for_duration, EncodeError, Encoder, TimedFrame};
use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Speed/quality tradeoff for color quantization (1 = best, 30 = fastest).
const GIF_SPEED: i32 = 10;

/// In-process GIF encoder built on the `image` crate.
pub struct GifFrameEncoder {
    settings: EncodeSettings,
}

impl GifFrameEncoder {
    pub fn new(settings: EncodeSettings) -> Self {
        Self { settings }
    }

    /// Frame delay for `duration`, snapped to the output frame rate grid.
    fn delay_for(&self, duration: f64) -> Delay {
        let fps = self.settings.fps.max(1);
        let frames = frames_for_duration(duration, fps);
        Delay::from_numer_denom_ms(frames * 1000, fps)
    }
}

impl Encoder for GifFrameEncoder {
    fn encode(
        &self,
        frames: &[TimedFrame],
        output: &Path,
        progress: &mut dyn FnMut(usize, usize),
    ) -> Result<(), EncodeError> {
        if frames.is_empty() {
            return Err(EncodeError::NoFrames);
        }
        let (width, height) = canvas_size(frames)?;
        let total = frames.len();

        let writer = BufWriter::new(File::create(output)?);
        let mut encoder = GifEncoder::new_with_speed(writer, GIF_SPEED);
        if self.settings.loop_forever {
            encoder.set_repeat(Repeat::Infinite).map_err(EncodeError::Gif)?;
        }

        for (idx, frame) in frames.iter().enumerate() {
            let img = image::open(&frame.path)
                .map_err(|source| EncodeError::Image {
                    path: frame.path.clone(),
                    source,
                })?
                .to_rgba8();
            let composed = compose_on_canvas(&img, width, height);
            encoder
                .encode_frame(Frame::from_parts(composed, 0, 0, self.delay_for(frame.duration)))
                .map_err(EncodeError::Gif)?;
            progress(idx + 1, total);
        }

        log::info!("GIF written: {} ({} frames)", output.display(), total);
        Ok(())
    }
}
