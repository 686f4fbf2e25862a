//! Contact-sheet builder: many directories into one document.
//!
//! ```text
//! for each directory (in the order given)
//!     list           → failure: record, skip the directory
//!     layout         → unresolved files recorded, take no cell
//!     render pages   → image that won't embed: recorded, label skipped
//! save once          → the only error returned to the caller
//! ```
//!
//! Progress goes out as [`SheetEvent`]s on an optional channel; the CLI
//! drains it on a printer thread. Everything that went wrong per item ends up
//! in [`SheetReport::failures`].

use crate::context::Context;
use crate::layout::{DirectoryLayout, layout_directory};
use crate::listing::list_directory;
use crate::pdf::{DocumentWriter, PdfDocument, PdfError};
use crate::thumbs::{CacheStats, ThumbnailResolver};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum SheetError {
    #[error("cannot write {path}: {source}")]
    Write { path: PathBuf, source: PdfError },
}

/// Where a per-item failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureStage {
    Listing,
    Thumbnail,
    Embed,
}

impl fmt::Display for FailureStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FailureStage::Listing => "listing",
            FailureStage::Thumbnail => "thumbnail",
            FailureStage::Embed => "embed",
        })
    }
}

/// A directory or file that didn't make it onto the sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    pub path: PathBuf,
    pub stage: FailureStage,
    pub message: String,
}

impl Failure {
    fn new(path: PathBuf, stage: FailureStage, error: &dyn std::error::Error) -> Self {
        Self {
            path,
            stage,
            message: error.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectorySummary {
    pub path: PathBuf,
    pub pages: usize,
    /// Cells drawn with their image.
    pub cells: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SheetReport {
    pub directories: Vec<DirectorySummary>,
    pub failures: Vec<Failure>,
    pub cache: CacheStats,
}

impl SheetReport {
    pub fn page_count(&self) -> usize {
        self.directories.iter().map(|d| d.pages).sum()
    }

    pub fn cell_count(&self) -> usize {
        self.directories.iter().map(|d| d.cells).sum()
    }
}

#[derive(Debug, Clone)]
pub enum SheetEvent {
    DirectoryStarted {
        path: PathBuf,
        index: usize,
        total: usize,
    },
    FileSkipped(Failure),
    DirectoryFailed(Failure),
    DirectoryFinished(DirectorySummary),
}

/// Build the sheet for `directories` and write it to `output`.
pub fn generate_pdf(
    ctx: &Context,
    directories: &[PathBuf],
    output: &Path,
    events: Option<Sender<SheetEvent>>,
) -> Result<SheetReport, SheetError> {
    let mut doc = PdfDocument::new(ctx.document().clone());
    let report = render_sheet(ctx, directories, &mut doc, events);
    doc.save(output).map_err(|source| SheetError::Write {
        path: output.to_path_buf(),
        source,
    })?;
    info!(
        output = %output.display(),
        pages = report.page_count(),
        failures = report.failures.len(),
        "contact sheet written"
    );
    Ok(report)
}

/// Render every directory into `writer`. Never fails; see the report.
pub fn render_sheet<W: DocumentWriter>(
    ctx: &Context,
    directories: &[PathBuf],
    writer: &mut W,
    events: Option<Sender<SheetEvent>>,
) -> SheetReport {
    let emit = |event: SheetEvent| {
        if let Some(tx) = &events {
            tx.send(event).ok();
        }
    };
    let mut resolver = ThumbnailResolver::new(ctx);
    let mut report = SheetReport::default();

    for (index, dir) in directories.iter().enumerate() {
        emit(SheetEvent::DirectoryStarted {
            path: dir.clone(),
            index,
            total: directories.len(),
        });

        let files = match list_directory(dir, ctx.hidden()) {
            Ok(files) => files,
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "skipping directory");
                let failure = Failure::new(dir.clone(), FailureStage::Listing, &e);
                report.failures.push(failure.clone());
                emit(SheetEvent::DirectoryFailed(failure));
                continue;
            }
        };
        info!(dir = %dir.display(), files = files.len(), "laying out directory");

        let title = dir.display().to_string();
        let layout = layout_directory(&title, files, ctx.document().sort, |name| {
            resolver.resolve(dir, name).map(|resolved| {
                debug!(file = name, thumbnail = %resolved.path.display(), "resolved");
                resolved.path
            })
        });

        for skipped in &layout.skipped {
            let path = dir.join(&skipped.name);
            warn!(file = %path.display(), error = %skipped.error, "no thumbnail");
            let failure = Failure::new(path, FailureStage::Thumbnail, &skipped.error);
            report.failures.push(failure.clone());
            emit(SheetEvent::FileSkipped(failure));
        }

        let (summary, failures) = render_directory(dir, &layout, writer);
        for failure in failures {
            warn!(file = %failure.path.display(), error = %failure.message, "cell not drawn");
            report.failures.push(failure.clone());
            emit(SheetEvent::FileSkipped(failure));
        }
        info!(
            dir = %dir.display(),
            pages = summary.pages,
            cells = summary.cells,
            "directory done"
        );
        report.directories.push(summary.clone());
        emit(SheetEvent::DirectoryFinished(summary));
    }

    report.cache = resolver.stats().clone();
    report
}

fn render_directory<W: DocumentWriter>(
    dir: &Path,
    layout: &DirectoryLayout,
    writer: &mut W,
) -> (DirectorySummary, Vec<Failure>) {
    let mut summary = DirectorySummary {
        path: dir.to_path_buf(),
        pages: 0,
        cells: 0,
    };
    let mut failures = Vec::new();

    for page in &layout.pages {
        if let Err(e) = writer.add_page(&page.title) {
            failures.push(Failure::new(dir.to_path_buf(), FailureStage::Embed, &e));
            break;
        }
        summary.pages += 1;
        for cell in &page.cells {
            if let Err(e) = writer.place_image(&cell.image, cell.position.image_rect()) {
                failures.push(Failure::new(dir.join(&cell.name), FailureStage::Embed, &e));
                continue;
            }
            if let Err(e) = writer.place_text(&cell.label, cell.position.label_origin()) {
                failures.push(Failure::new(dir.join(&cell.name), FailureStage::Embed, &e));
                continue;
            }
            summary.cells += 1;
        }
    }
    (summary, failures)
}
