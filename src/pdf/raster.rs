//! Image preparation for embedding.
//!
//! Thumbnails are decoded, downscaled so neither side exceeds the configured
//! maximum, and flattened onto white (PDF image XObjects here carry no alpha).
//! Placement math is kept pure so it can be tested without a document.

use super::writer::PdfError;
use crate::layout::Rect;
use image::{DynamicImage, ImageReader, Rgb, RgbImage};
use std::path::Path;

/// Decode `path` and make it ready for embedding.
pub fn load_for_embedding(path: &Path, max_pixels: u32) -> Result<RgbImage, PdfError> {
    let img = ImageReader::open(path)?
        .with_guessed_format()?
        .decode()
        .map_err(|source| PdfError::Image {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(flatten_on_white(&downscale(img, max_pixels)))
}

fn downscale(img: DynamicImage, max_pixels: u32) -> DynamicImage {
    if img.width() > max_pixels || img.height() > max_pixels {
        img.thumbnail(max_pixels, max_pixels)
    } else {
        img
    }
}

/// Composite `img` over a white background.
pub fn flatten_on_white(img: &DynamicImage) -> RgbImage {
    let rgba = img.to_rgba8();
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let a = u16::from(a);
        let blend = |c: u8| ((u16::from(c) * a + 255 * (255 - a)) / 255) as u8;
        Rgb([blend(r), blend(g), blend(b)])
    })
}

/// Largest box with the image's aspect ratio that fits `area`, centered.
pub fn fit_centered(width: u32, height: u32, area: Rect) -> Rect {
    if width == 0 || height == 0 {
        return area;
    }
    let scale = (area.width / width as f32).min(area.height / height as f32);
    let w = width as f32 * scale;
    let h = height as f32 * scale;
    Rect {
        x: area.x + (area.width - w) / 2.0,
        y: area.y + (area.height - h) / 2.0,
        width: w,
        height: h,
    }
}
