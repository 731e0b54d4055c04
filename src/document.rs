//! The finished report as an ordered sequence of drawing instructions.
//!
//! A [`Document`] is engine independent: it records what to draw and where,
//! in millimetres from the top-left page corner, and is serialized to PDF by a
//! [`DocumentWriter`](crate::render::DocumentWriter) only when delivered.
//! Building the instructions separately from writing them is what makes Save
//! and Print structurally comparable.

use serde::Serialize;

use crate::assets::Asset;
use crate::layout::PageGeometry;
use crate::metrics::{TextMeasure, TextStyle};

/// A single drawing instruction.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawOp {
    /// Text whose baseline starts at `(x, y)`.
    Text {
        x: f64,
        y: f64,
        text: String,
        style: TextStyle,
    },
    /// A horizontal stroke from `x1` to `x2` at height `y`.
    Rule {
        x1: f64,
        x2: f64,
        y: f64,
        thickness: f64,
    },
    /// The logo, with its top-left corner at `(x, y)`.
    Logo {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
}

/// The instructions drawn on one page.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Page {
    ops: Vec<DrawOp>,
}

impl Page {
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Iterates over the text instructions as `(x, y, text)`.
    pub fn texts(&self) -> impl Iterator<Item = (f64, f64, &str)> + '_ {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { x, y, text, .. } => Some((*x, *y, text.as_str())),
            _ => None,
        })
    }

    /// Iterates over the horizontal rules as `(x1, x2, y)`.
    pub fn rules(&self) -> impl Iterator<Item = (f64, f64, f64)> + '_ {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Rule { x1, x2, y, .. } => Some((*x1, *x2, *y)),
            _ => None,
        })
    }
}

/// A finished, immutable report.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Document {
    title: String,
    geometry: PageGeometry,
    pages: Vec<Page>,
    #[serde(skip)]
    logo: Option<Asset>,
}

impl Document {
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn geometry(&self) -> PageGeometry {
        self.geometry
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// The logo referenced by [`DrawOp::Logo`] instructions, if one was loaded.
    pub fn logo(&self) -> Option<&Asset> {
        self.logo.as_ref()
    }

    /// Finds the first text instruction equal to `text` and returns its page index and position.
    pub fn find_text(&self, text: &str) -> Option<(usize, f64, f64)> {
        self.pages.iter().enumerate().find_map(|(index, page)| {
            page.texts()
                .find(|(_, _, candidate)| *candidate == text)
                .map(|(x, y, _)| (index, x, y))
        })
    }
}

/// Drawing surface that accumulates instructions for one build.
///
/// The canvas carries a current text style. Use [`Canvas::with_style`] to
/// change it for a scoped operation; the previous style is restored when the
/// closure returns.
pub struct Canvas<'m> {
    measure: &'m dyn TextMeasure,
    style: TextStyle,
    pages: Vec<Page>,
}

impl<'m> Canvas<'m> {
    pub fn new(measure: &'m dyn TextMeasure, style: TextStyle) -> Self {
        Self {
            measure,
            style,
            pages: vec![Page::default()],
        }
    }

    pub fn style(&self) -> TextStyle {
        self.style
    }

    /// Runs `f` with `style` applied, restoring the previous style afterwards.
    pub fn with_style<R>(&mut self, style: TextStyle, f: impl FnOnce(&mut Self) -> R) -> R {
        let previous = std::mem::replace(&mut self.style, style);
        let result = f(self);
        self.style = previous;
        result
    }

    /// Width of `text` in the current style.
    pub fn text_width(&self, text: &str) -> f64 {
        self.measure.text_width(text, self.style)
    }

    pub fn text(&mut self, x: f64, y: f64, text: impl Into<String>) {
        let style = self.style;
        self.push(DrawOp::Text {
            x,
            y,
            text: text.into(),
            style,
        });
    }

    pub fn rule(&mut self, x1: f64, x2: f64, y: f64, thickness: f64) {
        self.push(DrawOp::Rule { x1, x2, y, thickness });
    }

    pub fn logo(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.push(DrawOp::Logo {
            x,
            y,
            width,
            height,
        });
    }

    /// Starts a new, empty page. Subsequent instructions land on it.
    pub fn new_page(&mut self) {
        self.pages.push(Page::default());
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn finish(
        self,
        title: impl Into<String>,
        geometry: PageGeometry,
        logo: Option<Asset>,
    ) -> Document {
        Document {
            title: title.into(),
            geometry,
            pages: self.pages,
            logo,
        }
    }

    fn push(&mut self, op: DrawOp) {
        if let Some(page) = self.pages.last_mut() {
            page.ops.push(op);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::FixedAdvance;

    #[test]
    fn style_scope_restores_previous_style() {
        let metric = FixedAdvance::default();
        let mut canvas = Canvas::new(&metric, TextStyle::regular(10));

        let inner = canvas.with_style(TextStyle::bold(12), |canvas| {
            canvas.text(0.0, 0.0, "Title");
            canvas.style()
        });

        assert_eq!(inner, TextStyle::bold(12));
        assert_eq!(canvas.style(), TextStyle::regular(10));

        let document = canvas.finish("t", PageGeometry::default(), None);
        assert_eq!(
            document.pages()[0].ops()[0],
            DrawOp::Text {
                x: 0.0,
                y: 0.0,
                text: "Title".into(),
                style: TextStyle::bold(12),
            }
        );
    }

    #[test]
    fn new_page_routes_instructions() {
        let metric = FixedAdvance::default();
        let mut canvas = Canvas::new(&metric, TextStyle::regular(10));
        canvas.text(15.0, 15.0, "first");
        canvas.new_page();
        canvas.rule(15.0, 195.0, 16.0, 0.2);

        let document = canvas.finish("t", PageGeometry::default(), None);
        assert_eq!(document.pages().len(), 2);
        assert_eq!(document.find_text("first"), Some((0, 15.0, 15.0)));
        assert_eq!(document.pages()[1].rules().count(), 1);
    }
}
