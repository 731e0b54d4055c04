//! Text measurement used by every width-dependent layout computation.
//!
//! Layout is computed ahead of rendering, so the measurement must agree with
//! the font the PDF writer later embeds. [`FontMetrics`] guarantees that by
//! sharing the writer's font family; [`FixedAdvance`] is a font-free metric for
//! previews and reproducible tests.

use genpdf::fonts::{FontCache, FontData, FontFamily};
use genpdf::style::Style;
use genpdf::Mm;
use serde::Serialize;

const MM_PER_POINT: f64 = 25.4 / 72.0;

pub(crate) fn mm_from_f64(value: f64) -> Mm {
    Mm::from(printpdf::Mm(value))
}

pub(crate) fn mm_to_f64(value: Mm) -> f64 {
    let mm: printpdf::Mm = value.into();
    mm.0
}

/// Font weight used by the report. Italics are never used.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub enum FontWeight {
    #[default]
    Regular,
    Bold,
}

/// Font size and weight of a piece of text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct TextStyle {
    /// Font size in points.
    pub size: u8,
    pub weight: FontWeight,
}

impl TextStyle {
    pub const fn regular(size: u8) -> Self {
        Self {
            size,
            weight: FontWeight::Regular,
        }
    }

    pub const fn bold(size: u8) -> Self {
        Self {
            size,
            weight: FontWeight::Bold,
        }
    }

    pub fn is_bold(&self) -> bool {
        self.weight == FontWeight::Bold
    }

    /// Converts the style into the equivalent `genpdf` style.
    pub fn to_genpdf(self) -> Style {
        let mut style = Style::new().with_font_size(self.size);
        if self.is_bold() {
            style.set_bold();
        }
        style
    }
}

/// Measures rendered text widths in millimetres.
///
/// Implementations must be deterministic: the same text and style always
/// yield the same width.
pub trait TextMeasure {
    fn text_width(&self, text: &str, style: TextStyle) -> f64;
}

impl<T: TextMeasure + ?Sized> TextMeasure for &T {
    fn text_width(&self, text: &str, style: TextStyle) -> f64 {
        (**self).text_width(text, style)
    }
}

/// Measurement backed by real font metrics.
pub struct FontMetrics {
    cache: FontCache,
}

impl FontMetrics {
    /// Builds metrics for the given font family.
    pub fn new(family: FontFamily<FontData>) -> Self {
        Self {
            cache: FontCache::new(family),
        }
    }
}

impl TextMeasure for FontMetrics {
    fn text_width(&self, text: &str, style: TextStyle) -> f64 {
        mm_to_f64(style.to_genpdf().str_width(&self.cache, text))
    }
}

/// Constant-advance measurement: every character is `em_ratio` ems wide.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedAdvance {
    em_ratio: f64,
}

impl FixedAdvance {
    pub fn new(em_ratio: f64) -> Self {
        Self { em_ratio }
    }
}

impl Default for FixedAdvance {
    fn default() -> Self {
        Self::new(0.5)
    }
}

impl TextMeasure for FixedAdvance {
    fn text_width(&self, text: &str, style: TextStyle) -> f64 {
        let weight = if style.is_bold() { 1.1 } else { 1.0 };
        text.chars().count() as f64 * self.em_ratio * weight * f64::from(style.size) * MM_PER_POINT
    }
}
