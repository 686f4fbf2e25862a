//! The drawing surface the sheet builder talks to.
//!
//! [`DocumentWriter`] has three operations: start a page with a header, draw
//! an image into a box, draw a label. Coordinates use the layout's top-left
//! origin. The production implementation is
//! [`PdfDocument`](super::document::PdfDocument); tests use the recording
//! writer below.

use crate::layout::{Point, Rect};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PdfError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot decode image {path}: {source}")]
    Image {
        path: PathBuf,
        source: image::ImageError,
    },
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("no page started")]
    NoPage,
}

pub trait DocumentWriter {
    /// Start a new page whose header shows `title`.
    fn add_page(&mut self, title: &str) -> Result<(), PdfError>;

    /// Draw the image at `image` scaled to fit `area`, centered.
    fn place_image(&mut self, image: &Path, area: Rect) -> Result<(), PdfError>;

    /// Draw a single-line label starting at `at` (baseline).
    fn place_text(&mut self, text: &str, at: Point) -> Result<(), PdfError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::collections::HashSet;

    /// Writer that records calls instead of drawing.
    ///
    /// Images listed in `broken` fail to embed.
    #[derive(Debug, Default)]
    pub struct RecordingWriter {
        pub ops: Vec<RecordedOp>,
        pub broken: HashSet<PathBuf>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum RecordedOp {
        Page(String),
        Image(PathBuf, Rect),
        Text(String, Point),
    }

    impl RecordingWriter {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_broken(paths: impl IntoIterator<Item = PathBuf>) -> Self {
            Self {
                ops: Vec::new(),
                broken: paths.into_iter().collect(),
            }
        }

        pub fn pages(&self) -> Vec<&str> {
            self.ops
                .iter()
                .filter_map(|op| match op {
                    RecordedOp::Page(title) => Some(title.as_str()),
                    _ => None,
                })
                .collect()
        }

        pub fn labels(&self) -> Vec<&str> {
            self.ops
                .iter()
                .filter_map(|op| match op {
                    RecordedOp::Text(text, _) => Some(text.as_str()),
                    _ => None,
                })
                .collect()
        }

        pub fn images(&self) -> Vec<&Path> {
            self.ops
                .iter()
                .filter_map(|op| match op {
                    RecordedOp::Image(path, _) => Some(path.as_path()),
                    _ => None,
                })
                .collect()
        }
    }

    impl DocumentWriter for RecordingWriter {
        fn add_page(&mut self, title: &str) -> Result<(), PdfError> {
            self.ops.push(RecordedOp::Page(title.to_string()));
            Ok(())
        }

        fn place_image(&mut self, image: &Path, area: Rect) -> Result<(), PdfError> {
            if self.broken.contains(image) {
                return Err(PdfError::Io(std::io::Error::other("broken image")));
            }
            self.ops.push(RecordedOp::Image(image.to_path_buf(), area));
            Ok(())
        }

        fn place_text(&mut self, text: &str, at: Point) -> Result<(), PdfError> {
            self.ops.push(RecordedOp::Text(text.to_string(), at));
            Ok(())
        }
    }
}
