//! [`PdfDocument`]: a [`DocumentWriter`] backed by lopdf.
//!
//! Pages are US Letter. Each page gets its own content stream and XObject
//! table; image XObjects are stored once per source path and referenced
//! from every page that shows them. Nothing touches disk until
//! [`PdfDocument::save`].

use super::fonts::{Face, encode_win_ansi};
use super::raster::{fit_centered, load_for_embedding};
use super::writer::{DocumentWriter, PdfError};
use crate::config::DocumentConfig;
use crate::layout::{HEADER_HEIGHT, HEADER_WIDTH, PAGE_HEIGHT, PAGE_WIDTH, Point, Rect};
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat, dictionary};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

const PRODUCER: &str = concat!("snap-sheet ", env!("CARGO_PKG_VERSION"));

pub struct PdfDocument {
    doc: Document,
    pages_id: ObjectId,
    fonts: Dictionary,
    kids: Vec<ObjectId>,
    current: Option<PageContent>,
    images: HashMap<PathBuf, EmbeddedImage>,
    settings: DocumentConfig,
}

struct PageContent {
    operations: Vec<Operation>,
    xobjects: Dictionary,
}

impl PageContent {
    fn new() -> Self {
        Self {
            operations: Vec::new(),
            xobjects: Dictionary::new(),
        }
    }
}

#[derive(Debug, Clone)]
struct EmbeddedImage {
    name: String,
    id: ObjectId,
    width: u32,
    height: u32,
}

impl PdfDocument {
    pub fn new(settings: DocumentConfig) -> Self {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let mut fonts = Dictionary::new();
        for face in [Face::Regular, Face::Bold] {
            let id = doc.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => face.base_font(),
                "Encoding" => "WinAnsiEncoding",
            });
            fonts.set(face.resource_name(), id);
        }
        Self {
            doc,
            pages_id,
            fonts,
            kids: Vec::new(),
            current: None,
            images: HashMap::new(),
            settings,
        }
    }

    /// Pages finished or in progress.
    pub fn page_count(&self) -> usize {
        self.kids.len() + usize::from(self.current.is_some())
    }

    /// Finish the document and write it to `path`.
    ///
    /// A document with no pages gets one blank page so the output is a
    /// valid PDF.
    pub fn save(mut self, path: &Path) -> Result<(), PdfError> {
        if self.page_count() == 0 {
            self.current = Some(PageContent::new());
        }
        self.finish_page()?;

        let kids: Vec<Object> = self.kids.iter().map(|&id| id.into()).collect();
        let media_box: Vec<Object> =
            vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()];
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => self.kids.len() as i64,
            "MediaBox" => media_box,
        };
        self.doc.objects.insert(self.pages_id, Object::Dictionary(pages));

        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.doc.trailer.set("Root", catalog_id);
        let info_id = self.doc.add_object(dictionary! {
            "Producer" => Object::string_literal(PRODUCER),
        });
        self.doc.trailer.set("Info", info_id);

        self.doc.compress();
        self.doc.save(path)?;
        Ok(())
    }

    fn finish_page(&mut self) -> Result<(), PdfError> {
        let Some(page) = self.current.take() else {
            return Ok(());
        };
        let content = Content {
            operations: page.operations,
        };
        let content_id = self
            .doc
            .add_object(Stream::new(Dictionary::new(), content.encode()?));
        let resources = dictionary! {
            "Font" => self.fonts.clone(),
            "XObject" => page.xobjects,
        };
        let page_id = self.doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "Contents" => content_id,
            "Resources" => resources,
        });
        self.kids.push(page_id);
        Ok(())
    }

    fn page(&mut self) -> Result<&mut PageContent, PdfError> {
        self.current.as_mut().ok_or(PdfError::NoPage)
    }

    fn embed(&mut self, path: &Path) -> Result<EmbeddedImage, PdfError> {
        if let Some(image) = self.images.get(path) {
            return Ok(image.clone());
        }
        let rgb = load_for_embedding(path, self.settings.max_image_pixels)?;
        let (width, height) = rgb.dimensions();
        let dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => i64::from(width),
            "Height" => i64::from(height),
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
        };
        let id = self.doc.add_object(Stream::new(dict, rgb.into_raw()));
        let image = EmbeddedImage {
            name: format!("Im{}", self.images.len() + 1),
            id,
            width,
            height,
        };
        self.images.insert(path.to_path_buf(), image.clone());
        Ok(image)
    }

    fn text(
        &mut self,
        face: Face,
        size: f32,
        x: f32,
        baseline: f32,
        bytes: Vec<u8>,
    ) -> Result<(), PdfError> {
        let page = self.page()?;
        page.operations.extend([
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![face.resource_name().into(), size.into()]),
            Operation::new("Td", vec![x.into(), (PAGE_HEIGHT - baseline).into()]),
            Operation::new("Tj", vec![Object::String(bytes, StringFormat::Hexadecimal)]),
            Operation::new("ET", vec![]),
        ]);
        Ok(())
    }
}

impl DocumentWriter for PdfDocument {
    fn add_page(&mut self, title: &str) -> Result<(), PdfError> {
        self.finish_page()?;
        self.current = Some(PageContent::new());

        let size = self.settings.title_font_size;
        let margin = self.settings.margin;
        let bytes = encode_win_ansi(title);
        let width = Face::Bold.text_width(&bytes, size);
        let x = margin + ((HEADER_WIDTH - width) / 2.0).max(0.0);
        let baseline = margin + HEADER_HEIGHT / 2.0 + 0.3 * size;
        self.text(Face::Bold, size, x, baseline, bytes)
    }

    fn place_image(&mut self, image: &Path, area: Rect) -> Result<(), PdfError> {
        self.page()?;
        let embedded = self.embed(image)?;
        let r = fit_centered(embedded.width, embedded.height, area);
        let page = self.page()?;
        page.xobjects
            .set(embedded.name.as_str(), Object::Reference(embedded.id));
        page.operations.extend([
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    r.width.into(),
                    0.into(),
                    0.into(),
                    r.height.into(),
                    r.x.into(),
                    (PAGE_HEIGHT - r.y - r.height).into(),
                ],
            ),
            Operation::new("Do", vec![Object::Name(embedded.name.into_bytes())]),
            Operation::new("Q", vec![]),
        ]);
        Ok(())
    }

    fn place_text(&mut self, text: &str, at: Point) -> Result<(), PdfError> {
        let size = self.settings.label_font_size;
        self.text(Face::Regular, size, at.x, at.y, encode_win_ansi(text))
    }
}
