//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Progress (`pdf`)
//!
//! ```text
//! [1/2] /home/me/photos
//!     skipped /home/me/photos/broken.mp3 (thumbnail): cannot read tag ...
//!     12 cells on 1 page
//! [2/2] /home/me/missing
//!     failed (listing): cannot read directory ...
//! ```
//!
//! ## Report
//!
//! ```text
//! Directories
//! 001 /home/me/photos (12 cells, 1 page)
//!
//! Failures
//!     listing: /home/me/missing
//!         cannot read directory /home/me/missing: No such file or directory
//!
//! Wrote 1 page to sheet.pdf
//! Thumbnails: 3 original, 8 cached, 1 written (12 total)
//! ```
//!
//! ## Listing (`list`)
//!
//! ```text
//! /home/me/photos
//! 001 album/ (folder)
//! 002 dawn.jpg (camera)
//! ```
//!
//! # Architecture
//!
//! Each output has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::audio::AudioInfo;
use crate::classify::FileKind;
use crate::sheet::{Failure, SheetEvent, SheetReport};
use crate::thumbs::{ResolvedThumbnail, ThumbnailError, ThumbnailSource};
use std::path::Path;

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// `1 page`, `2 pages`.
fn count(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("{} {}", n, noun)
    } else {
        format!("{} {}s", n, noun)
    }
}

fn failure_line(failure: &Failure) -> String {
    format!(
        "skipped {} ({}): {}",
        failure.path.display(),
        failure.stage,
        failure.message
    )
}

// ============================================================================
// Progress events
// ============================================================================

/// Format a single progress event from the sheet builder.
pub fn format_sheet_event(event: &SheetEvent) -> Vec<String> {
    match event {
        SheetEvent::DirectoryStarted { path, index, total } => {
            vec![format!("[{}/{}] {}", index + 1, total, path.display())]
        }
        SheetEvent::FileSkipped(failure) => {
            vec![format!("{}{}", indent(1), failure_line(failure))]
        }
        SheetEvent::DirectoryFailed(failure) => vec![format!(
            "{}failed ({}): {}",
            indent(1),
            failure.stage,
            failure.message
        )],
        SheetEvent::DirectoryFinished(summary) => vec![format!(
            "{}{} on {}",
            indent(1),
            count(summary.cells, "cell"),
            count(summary.pages, "page")
        )],
    }
}

// ============================================================================
// Report
// ============================================================================

/// Format the end-of-run report for a sheet written to `output`.
pub fn format_report(report: &SheetReport, output: &Path) -> Vec<String> {
    let mut lines = Vec::new();

    if !report.directories.is_empty() {
        lines.push("Directories".to_string());
        for (i, dir) in report.directories.iter().enumerate() {
            lines.push(format!(
                "{} {} ({}, {})",
                format_index(i + 1),
                dir.path.display(),
                count(dir.cells, "cell"),
                count(dir.pages, "page")
            ));
        }
    }

    if !report.failures.is_empty() {
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.push("Failures".to_string());
        for failure in &report.failures {
            lines.push(format!(
                "{}{}: {}",
                indent(1),
                failure.stage,
                failure.path.display()
            ));
            lines.push(format!("{}{}", indent(2), failure.message));
        }
    }

    if !lines.is_empty() {
        lines.push(String::new());
    }
    lines.push(format!(
        "Wrote {} to {}",
        count(report.page_count(), "page"),
        output.display()
    ));
    lines.push(format!("Thumbnails: {}", report.cache));
    lines
}

pub fn print_report(report: &SheetReport, output: &Path) {
    for line in format_report(report, output) {
        println!("{}", line);
    }
}

// ============================================================================
// Listing
// ============================================================================

/// Format a directory listing: one numbered line per entry with its kind.
///
/// Folders get a trailing `/`.
pub fn format_listing(dir: &Path, entries: &[(String, FileKind)]) -> Vec<String> {
    let mut lines = vec![dir.display().to_string()];
    for (i, (name, kind)) in entries.iter().enumerate() {
        let slash = if *kind == FileKind::Folder { "/" } else { "" };
        lines.push(format!("{} {}{} ({})", format_index(i + 1), name, slash, kind));
    }
    if entries.is_empty() {
        lines.push(format!("{}(empty)", indent(1)));
    }
    lines
}

pub fn print_listing(dir: &Path, entries: &[(String, FileKind)]) {
    for line in format_listing(dir, entries) {
        println!("{}", line);
    }
}

// ============================================================================
// File info
// ============================================================================

fn source_label(source: ThumbnailSource) -> String {
    match source {
        ThumbnailSource::Original => "original".to_string(),
        ThumbnailSource::AudioCover => "cover art".to_string(),
        ThumbnailSource::Icon(kind) => format!("{} icon", kind),
    }
}

/// Format what `info` knows about one file.
///
/// ```text
/// track.mp3
///     Kind: audio
///     Artist: Miles Davis
///     Title: Blue in Green
///     Album: Kind of Blue
///     Year: 1959, Genre: Jazz
///     Thumbnail: /tmp/snap-sheet.x/track.jpeg (cover art)
/// ```
pub fn format_file_info(
    path: &Path,
    kind: FileKind,
    audio: Option<&AudioInfo>,
    thumbnail: &Result<ResolvedThumbnail, ThumbnailError>,
) -> Vec<String> {
    let mut lines = vec![
        path.display().to_string(),
        format!("{}Kind: {}", indent(1), kind),
    ];
    if let Some(info) = audio {
        for line in info.to_string().lines() {
            lines.push(format!("{}{}", indent(1), line));
        }
    }
    match thumbnail {
        Ok(resolved) => lines.push(format!(
            "{}Thumbnail: {} ({})",
            indent(1),
            resolved.path.display(),
            source_label(resolved.source)
        )),
        Err(e) => lines.push(format!("{}Thumbnail: none ({})", indent(1), e)),
    }
    lines
}

pub fn print_file_info(
    path: &Path,
    kind: FileKind,
    audio: Option<&AudioInfo>,
    thumbnail: &Result<ResolvedThumbnail, ThumbnailError>,
) {
    for line in format_file_info(path, kind, audio, thumbnail) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
