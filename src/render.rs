//! PDF serialization of finished [`Document`]s with `genpdf`.
//!
//! The writer replays the instruction sequence page by page through a custom
//! [`Element`]; no layout decisions are made here.

use std::io;

use genpdf::elements::Image;
use genpdf::error::Error;
use genpdf::fonts::{FontData, FontFamily};
use genpdf::style::Style;
use genpdf::{render, Element, Position, RenderResult, Scale, Size};
use image::GenericImageView;
use log::{debug, warn};

use crate::document::{Document, DrawOp, Page};
use crate::error::ReportError;
use crate::fonts;
use crate::metrics::{mm_from_f64, FontMetrics};

const DEFAULT_IMAGE_DPI: f64 = 300.0;
const MM_PER_INCH: f64 = 25.4;

/// Options applied while serializing a document.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WriteOptions {
    /// Embed a directive asking the viewer to open its print dialog.
    pub auto_print: bool,
}

/// Serializes a [`Document`] into a deliverable artifact.
pub trait DocumentWriter {
    fn write(&self, document: &Document, options: WriteOptions) -> Result<Vec<u8>, ReportError>;

    /// Whether [`WriteOptions::auto_print`] is honoured.
    fn supports_auto_print(&self) -> bool {
        false
    }
}

impl<W: DocumentWriter + ?Sized> DocumentWriter for &W {
    fn write(&self, document: &Document, options: WriteOptions) -> Result<Vec<u8>, ReportError> {
        (**self).write(document, options)
    }

    fn supports_auto_print(&self) -> bool {
        (**self).supports_auto_print()
    }
}

/// Writes PDF files using `genpdf`.
#[derive(Clone)]
pub struct PdfWriter {
    family: FontFamily<FontData>,
}

impl PdfWriter {
    pub fn new(family: FontFamily<FontData>) -> Self {
        Self { family }
    }

    /// Creates a writer using the bundled font family.
    pub fn from_default_fonts() -> Result<Self, ReportError> {
        fonts::default_font_family()
            .map(Self::new)
            .map_err(ReportError::FontLoad)
    }

    /// Text measurement matching the fonts this writer embeds.
    pub fn metrics(&self) -> FontMetrics {
        FontMetrics::new(self.family.clone())
    }

    fn render_pdf(&self, document: &Document) -> Result<Vec<u8>, Error> {
        let geometry = document.geometry();
        let mut pdf = genpdf::Document::new(self.family.clone());
        pdf.set_title(document.title());
        pdf.set_paper_size(Size::new(
            mm_from_f64(geometry.page_width),
            mm_from_f64(geometry.page_height),
        ));
        pdf.push(DocumentCanvas::new(document)?);

        let mut bytes = Vec::new();
        pdf.render(&mut bytes)?;
        Ok(bytes)
    }
}

impl DocumentWriter for PdfWriter {
    fn write(&self, document: &Document, options: WriteOptions) -> Result<Vec<u8>, ReportError> {
        let bytes = self
            .render_pdf(document)
            .map_err(|err| ReportError::render(format!("PDF rendering failed: {err}")))?;
        debug!(
            "rendered '{}' into {} bytes",
            document.title(),
            bytes.len()
        );

        if !options.auto_print {
            return Ok(bytes);
        }

        #[cfg(feature = "autoprint")]
        {
            crate::autoprint::apply_auto_print(&bytes)
                .map_err(|err| ReportError::render(format!("failed to embed print action: {err}")))
        }

        #[cfg(not(feature = "autoprint"))]
        {
            warn!("auto-print requested but the `autoprint` feature is disabled");
            Ok(bytes)
        }
    }

    fn supports_auto_print(&self) -> bool {
        cfg!(feature = "autoprint")
    }
}

/// Replays one [`Page`] of instructions per render call.
struct DocumentCanvas {
    pages: Vec<Page>,
    logo: Option<image::DynamicImage>,
    next_page: usize,
}

impl DocumentCanvas {
    fn new(document: &Document) -> Result<Self, Error> {
        let logo = match document.logo() {
            // genpdf rejects images with an alpha channel.
            Some(asset) => Some(image::DynamicImage::ImageRgb8(
                asset
                    .to_dynamic_image()
                    .map_err(|err| {
                        Error::new(
                            "Failed to decode logo for embedding",
                            io::Error::new(io::ErrorKind::InvalidData, err.to_string()),
                        )
                    })?
                    .to_rgb8(),
            )),
            None => None,
        };
        Ok(Self {
            pages: document.pages().to_vec(),
            logo,
            next_page: 0,
        })
    }

    fn draw_logo(
        &self,
        context: &genpdf::Context,
        area: &render::Area<'_>,
        style: Style,
        op: (f64, f64, f64, f64),
    ) -> Result<(), Error> {
        let (x, y, width, height) = op;
        let Some(logo) = &self.logo else {
            warn!("logo instruction without a loaded logo; skipping");
            return Ok(());
        };

        let (px_width, px_height) = logo.dimensions();
        let natural_width = MM_PER_INCH * f64::from(px_width) / DEFAULT_IMAGE_DPI;
        let natural_height = MM_PER_INCH * f64::from(px_height) / DEFAULT_IMAGE_DPI;
        if natural_width <= f64::EPSILON || natural_height <= f64::EPSILON {
            return Ok(());
        }

        let mut image = Image::from_dynamic_image(logo.clone())?
            .with_position(Position::new(mm_from_f64(x), mm_from_f64(y)))
            .with_scale(Scale::new(width / natural_width, height / natural_height));
        image.render(context, area.clone(), style)?;
        Ok(())
    }
}

impl Element for DocumentCanvas {
    fn render(
        &mut self,
        context: &genpdf::Context,
        area: render::Area<'_>,
        style: Style,
    ) -> Result<RenderResult, Error> {
        let mut result = RenderResult::default();
        let Some(page) = self.pages.get(self.next_page) else {
            return Ok(result);
        };

        for op in page.ops() {
            match op {
                DrawOp::Text {
                    x,
                    y,
                    text,
                    style: text_style,
                } => {
                    let text_style = style.and(text_style.to_genpdf());
                    let glyph_height = text_style
                        .font(&context.font_cache)
                        .glyph_height(text_style.font_size());
                    let top = mm_from_f64(*y) - glyph_height;
                    let position = Position::new(mm_from_f64(*x), top);
                    if let Some(mut section) = area.text_section(&context.font_cache, position, text_style) {
                        section.print_str(text, text_style)?;
                    } else {
                        warn!("text '{text}' does not fit at ({x:.2}, {y:.2})");
                    }
                }
                // genpdf strokes every line with its default pen; `thickness`
                // only survives in the instruction stream.
                DrawOp::Rule { x1, x2, y, .. } => {
                    area.draw_line(
                        vec![
                            Position::new(mm_from_f64(*x1), mm_from_f64(*y)),
                            Position::new(mm_from_f64(*x2), mm_from_f64(*y)),
                        ],
                        Style::new(),
                    );
                }
                DrawOp::Logo {
                    x,
                    y,
                    width,
                    height,
                } => self.draw_logo(context, &area, style, (*x, *y, *width, *height))?,
            }
        }

        self.next_page += 1;
        result.size = area.size();
        result.has_more = self.next_page < self.pages.len();
        Ok(result)
    }
}
