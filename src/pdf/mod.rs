//! PDF output.
//!
//! | Concern | Where |
//! |---|---|
//! | **Drawing surface** | [`DocumentWriter`] trait |
//! | **PDF objects and pages** | [`PdfDocument`], lopdf |
//! | **Image decode / downscale / flatten** | `raster`, `image` crate |
//! | **Text encoding and widths** | `fonts`, base-14 Helvetica |
//!
//! The sheet builder only sees [`DocumentWriter`], so its paging and error
//! handling are tested against a recording writer without producing PDFs.

mod document;
mod fonts;
mod raster;
pub mod writer;

pub use document::PdfDocument;
pub use writer::{DocumentWriter, PdfError};
