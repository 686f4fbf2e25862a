//! Shared test utilities.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let (tmp, ctx) = test_context();
//! std::fs::write(tmp.path().join("cover.png"), png_bytes(4, 4)).unwrap();
//! ```

use crate::context::Context;
use id3::{Tag, Version};
use image::{ImageFormat, Rgb, RgbImage};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// =========================================================================
// Fixture setup
// =========================================================================

/// A context whose storage and temp directories live under a fresh temp dir.
///
/// Neither directory exists yet; the resolver creates them on first write.
/// Keep the returned `TempDir` alive for as long as the context is used.
pub fn test_context() -> (TempDir, Context) {
    let tmp = TempDir::new().unwrap();
    let ctx = Context::with_dirs(tmp.path().join("storage"), tmp.path().join("temp"));
    (tmp, ctx)
}

/// Encoded PNG of the given size, filled with a single color.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_pixel(width, height, Rgb([200, 40, 40]));
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png).unwrap();
    buf.into_inner()
}

/// Write an MP3-shaped file: an ID3v2.4 `tag` followed by filler audio.
pub fn write_tagged_mp3(dir: &Path, name: &str, tag: &Tag) -> PathBuf {
    let mut bytes = Vec::new();
    tag.write_to(&mut bytes, Version::Id3v24).unwrap();
    // MPEG frame sync followed by silence.
    bytes.extend_from_slice(&[0xff, 0xfb, 0x90, 0x00]);
    bytes.resize(bytes.len() + 412, 0);
    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}
