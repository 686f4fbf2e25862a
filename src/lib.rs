//! # snap-sheet
//!
//! Contact-sheet PDFs for directories of files. Every visible file becomes a
//! cell: a thumbnail with the file name underneath, 35 cells to a Letter
//! page, each directory starting on its own page.
//!
//! # Pipeline
//!
//! ```text
//! directory ─ list ─▶ names ─ layout ─▶ pages/cells ─ render ─▶ PDF
//!                               │
//!                      resolve thumbnail per name
//!                 (original image / audio cover / kind icon)
//! ```
//!
//! Failures are per item. An unreadable directory, a file without a usable
//! thumbnail or an image that won't embed is recorded in the
//! [`sheet::SheetReport`] and the run carries on; only writing the final
//! document can fail the whole operation.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`classify`] | File kind from extension (or directory-ness) |
//! | [`audio`] | ID3 tag fields and embedded cover art |
//! | [`icons`] | Generated PNG icon per file kind |
//! | [`thumbs`] | Thumbnail resolution and on-disk materialization, cache stats |
//! | [`listing`] | Visible entries of one directory |
//! | [`layout`] | Sorting, pagination and cell geometry |
//! | [`pdf`] | [`pdf::DocumentWriter`] and the lopdf-backed document |
//! | [`sheet`] | Drives all of the above over many directories |
//! | [`paths`] | Unique, sorted input directory list |
//! | [`context`] | Storage/temp directories and settings for a run |
//! | [`config`] | Layered `config.toml` loading and validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Icons Are Drawn, Not Shipped
//!
//! Kind icons are rendered with the `image` crate at first use and cached in
//! the storage directory. The binary carries no asset files, and a deleted
//! cache heals itself on the next run.
//!
//! ## Base-14 Fonts Only
//!
//! Headers and labels use Helvetica, which every PDF reader provides, so no
//! font program is embedded. The cost is WinAnsi text: characters outside
//! Latin-1 print as `?`.
//!
//! ## Writer Behind a Trait
//!
//! [`sheet::render_sheet`] is generic over [`pdf::DocumentWriter`], so paging
//! and failure handling are tested with a recording writer and the PDF code
//! is tested on its own.

pub mod audio;
pub mod classify;
pub mod config;
pub mod context;
pub mod icons;
pub mod layout;
pub mod listing;
pub mod output;
pub mod paths;
pub mod pdf;
pub mod sheet;
pub mod thumbs;

#[cfg(test)]
pub(crate) mod test_helpers;
