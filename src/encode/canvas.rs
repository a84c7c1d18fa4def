//! Frame canvas
//! Images of different sizes are centered on a black canvas as large as the largest one.

use crate::encode::{EncodeError, TimedFrame};
use image::{imageops, Rgba, RgbaImage};

/// Largest width and height over all frames, read from image headers only.
pub fn canvas_size(frames: &[TimedFrame]) -> Result<(u32, u32), EncodeError> {
    let mut size = (0u32, 0u32);
    for frame in frames {
        let (w, h) = image::image_dimensions(&frame.path).map_err(|source| EncodeError::Image {
            path: frame.path.clone(),
            source,
        })?;
        size = (size.0.max(w), size.1.max(h));
    }
    Ok(size)
}

/// Center `img` on an opaque black canvas of `width` x `height`.
pub fn compose_on_canvas(img: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    if img.width() == width && img.height() == height {
        return img.clone();
    }
    let mut canvas = RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 255]));
    let x = (width as i64 - img.width() as i64) / 2;
    let y = (height as i64 - img.height() as i64) / 2;
    imageops::overlay(&mut canvas, img, x, y);
    canvas
}

/// Round dimensions up to even numbers (required by yuv420p).
pub fn even_size((w, h): (u32, u32)) -> (u32, u32) {
    (w + w % 2, h + h % 2)
}
