//! Built-in generic icons, one per [`FileKind`].
//!
//! Icons are drawn in code and PNG-encoded on demand, so the binary carries
//! no image assets. Drawing is deterministic: the same kind always encodes
//! to the same bytes, which is what lets the resolver reuse a previously
//! materialized icon without comparing contents.

use crate::classify::FileKind;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::io::Cursor;

/// Edge length of every icon, in pixels.
pub const ICON_SIZE: u32 = 96;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const OUTLINE: Rgb<u8> = Rgb([144, 144, 144]);
const PAPER: Rgb<u8> = Rgb([248, 248, 248]);

/// Sheet geometry: left, top, right, bottom (exclusive) and folded corner.
const SHEET: (u32, u32, u32, u32) = (20, 8, 76, 88);
const FOLD: u32 = 16;

fn accent(kind: FileKind) -> Rgb<u8> {
    match kind {
        FileKind::Camera => Rgb([46, 134, 193]),
        FileKind::Audio => Rgb([142, 68, 173]),
        FileKind::Video => Rgb([192, 57, 43]),
        FileKind::Document => Rgb([41, 128, 185]),
        FileKind::Pdf => Rgb([203, 67, 53]),
        FileKind::Executable => Rgb([39, 55, 70]),
        FileKind::Archive => Rgb([212, 172, 13]),
        FileKind::Bitmap => Rgb([22, 160, 133]),
        FileKind::Html => Rgb([230, 126, 34]),
        FileKind::Folder => Rgb([241, 196, 15]),
        FileKind::Unknown => Rgb([149, 165, 166]),
    }
}

/// File name of the icon for `kind` inside the storage directory.
pub fn icon_name(kind: FileKind) -> String {
    format!("{}.png", kind.as_str())
}

/// Draw the icon for `kind`.
pub fn render(kind: FileKind) -> RgbImage {
    if kind == FileKind::Folder {
        return render_folder(accent(kind));
    }
    let color = accent(kind);
    let (left, top, right, bottom) = SHEET;
    let stripes = stripe_count(kind);

    RgbImage::from_fn(ICON_SIZE, ICON_SIZE, |x, y| {
        if x < left || x >= right || y < top || y >= bottom {
            return BACKGROUND;
        }
        // Folded top-right corner.
        let fold_x = right - FOLD;
        if x >= fold_x && y < top + FOLD {
            let dx = x - fold_x;
            let dy = y - top;
            if dx > dy {
                return BACKGROUND;
            }
            if dx == dy || x == fold_x || y == top + FOLD - 1 {
                return OUTLINE;
            }
        }
        if x <= left + 1 || x >= right - 2 || y <= top + 1 || y >= bottom - 2 {
            return OUTLINE;
        }
        // Accent band across the lower part of the sheet.
        if (56..76).contains(&y) && x > left + 3 && x < right - 4 {
            return color;
        }
        // Text-like stripes above the band, count varies per kind.
        for i in 0..stripes {
            let row = top + 24 + i * 6;
            if y == row && x > left + 7 && x < right - 10 {
                return OUTLINE;
            }
        }
        PAPER
    })
}

fn render_folder(color: Rgb<u8>) -> RgbImage {
    RgbImage::from_fn(ICON_SIZE, ICON_SIZE, |x, y| {
        let tab = (14..44).contains(&x) && (18..28).contains(&y);
        let body = (10..86).contains(&x) && (26..80).contains(&y);
        if tab || body {
            color
        } else {
            BACKGROUND
        }
    })
}

fn stripe_count(kind: FileKind) -> u32 {
    FileKind::ALL
        .iter()
        .position(|k| *k == kind)
        .map(|i| (i as u32 % 4) + 1)
        .unwrap_or(1)
}

/// PNG-encoded icon for `kind`.
pub fn icon_png(kind: FileKind) -> Result<Vec<u8>, image::ImageError> {
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(render(kind))
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}
