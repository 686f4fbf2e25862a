//! Contact-sheet layout: pagination and cell geometry.
//!
//! A sheet is a fixed grid of 5 columns × 7 rows per Letter page. Cells are
//! numbered from zero within each directory, and a cell's place on the page
//! depends only on its number:
//!
//! ```text
//! slot = n mod 35          a new page starts whenever slot == 0
//! row  = slot / 5
//! col  = slot mod 5
//! image  at (col*100 + 50, row*100 + 50), 80 × 80
//! label  at (col*100 + 45, row*100 + 140)
//! ```
//!
//! Coordinates are points with a top-left origin; the PDF writer flips them.
//! Files whose thumbnail can't be resolved don't consume a number, so the
//! grid never has holes.

use crate::thumbs::ThumbnailError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::path::PathBuf;

pub const COLUMNS: usize = 5;
pub const ROWS: usize = 7;
pub const CELLS_PER_PAGE: usize = COLUMNS * ROWS;

/// US Letter, portrait, in points.
pub const PAGE_WIDTH: f32 = 612.0;
pub const PAGE_HEIGHT: f32 = 792.0;

const CELL_PITCH: f32 = 100.0;
const IMAGE_OFFSET: f32 = 50.0;
pub const IMAGE_SIZE: f32 = 80.0;
const LABEL_OFFSET_X: f32 = 45.0;
const LABEL_OFFSET_Y: f32 = 140.0;

/// Labels keep this many trailing characters of the file name.
pub const LABEL_MAX_CHARS: usize = 24;

/// Header cell, placed at the top-left margin.
pub const HEADER_WIDTH: f32 = 570.0;
pub const HEADER_HEIGHT: f32 = 12.0;

/// File name ordering within a directory. Both orders are stable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    /// Plain string comparison: `B.jpg` before `a.jpg`.
    #[default]
    CaseSensitive,
    /// Compare lowercased names; equal names keep their listing order.
    CaseInsensitive,
}

impl SortOrder {
    pub fn sort(self, names: &mut [String]) {
        match self {
            SortOrder::CaseSensitive => names.sort(),
            SortOrder::CaseInsensitive => names.sort_by(|a, b| compare_folded(a, b)),
        }
    }
}

fn compare_folded(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Row and column of a cell on its page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct GridPosition {
    pub row: usize,
    pub col: usize,
}

impl GridPosition {
    /// Box the thumbnail is drawn into.
    pub fn image_rect(self) -> Rect {
        Rect {
            x: self.col as f32 * CELL_PITCH + IMAGE_OFFSET,
            y: self.row as f32 * CELL_PITCH + IMAGE_OFFSET,
            width: IMAGE_SIZE,
            height: IMAGE_SIZE,
        }
    }

    /// Baseline start of the label under the thumbnail.
    pub fn label_origin(self) -> Point {
        Point {
            x: self.col as f32 * CELL_PITCH + LABEL_OFFSET_X,
            y: self.row as f32 * CELL_PITCH + LABEL_OFFSET_Y,
        }
    }
}

/// Grid position of cell `n` (zero-based within its directory).
pub fn grid_position(n: usize) -> GridPosition {
    let slot = n % CELLS_PER_PAGE;
    GridPosition {
        row: slot / COLUMNS,
        col: slot % COLUMNS,
    }
}

/// Whether cell `n` is the first on a new page.
pub fn starts_page(n: usize) -> bool {
    n % CELLS_PER_PAGE == 0
}

/// Keep the trailing [`LABEL_MAX_CHARS`] characters of `name`.
pub fn truncate_label(name: &str) -> String {
    let count = name.chars().count();
    if count <= LABEL_MAX_CHARS {
        name.to_string()
    } else {
        name.chars().skip(count - LABEL_MAX_CHARS).collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    /// Running number within the directory.
    pub index: usize,
    pub position: GridPosition,
    /// Full file name.
    pub name: String,
    pub label: String,
    /// Image to draw for this file.
    pub image: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub title: String,
    pub cells: Vec<Cell>,
}

/// A file left off the sheet because its thumbnail couldn't be resolved.
#[derive(Debug)]
pub struct SkippedFile<E> {
    pub name: String,
    pub error: E,
}

#[derive(Debug)]
pub struct DirectoryLayout<E = ThumbnailError> {
    pub pages: Vec<Page>,
    pub skipped: Vec<SkippedFile<E>>,
}

impl<E> DirectoryLayout<E> {
    pub fn cell_count(&self) -> usize {
        self.pages.iter().map(|p| p.cells.len()).sum()
    }
}

/// Sort `files` and lay them out under `title`.
///
/// `resolve` maps a file name to the image to draw. Errors are collected in
/// [`DirectoryLayout::skipped`] and the file takes no cell. A directory
/// where nothing resolves produces no pages at all.
pub fn layout_directory<E, F>(
    title: &str,
    mut files: Vec<String>,
    order: SortOrder,
    mut resolve: F,
) -> DirectoryLayout<E>
where
    F: FnMut(&str) -> Result<PathBuf, E>,
{
    order.sort(&mut files);

    let mut pages: Vec<Page> = Vec::new();
    let mut skipped = Vec::new();
    let mut n = 0;

    for name in files {
        let image = match resolve(&name) {
            Ok(image) => image,
            Err(error) => {
                skipped.push(SkippedFile { name, error });
                continue;
            }
        };
        if starts_page(n) {
            pages.push(Page {
                title: title.to_string(),
                cells: Vec::with_capacity(CELLS_PER_PAGE),
            });
        }
        let cell = Cell {
            index: n,
            position: grid_position(n),
            label: truncate_label(&name),
            name,
            image,
        };
        if let Some(page) = pages.last_mut() {
            page.cells.push(cell);
        }
        n += 1;
    }

    DirectoryLayout { pages, skipped }
}
