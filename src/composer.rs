//! Section composer: threads the layout cursor through the schema.

use log::debug;

use crate::document::Canvas;
use crate::layout::{
    draw_multi_column_line, draw_section_title, draw_static_line, draw_two_column_line, Cursor,
    Field, PageGeometry, TITLE_LINE_HEIGHT,
};
use crate::metrics::TextStyle;
use crate::record::PoolRecord;
use crate::schema::{RowSpec, SectionSpec};

/// Padding inserted before every section except the first.
pub const SECTION_GAP: f64 = 5.0;

/// Drives the vertical flow of one document build.
///
/// The cursor only moves down. When a row's baseline would fall below the
/// bottom margin, a new page is started and the cursor returns to the top
/// margin.
pub struct SectionComposer<'c, 'm> {
    canvas: &'c mut Canvas<'m>,
    geometry: PageGeometry,
    cursor: Cursor,
    sections: usize,
}

impl<'c, 'm> SectionComposer<'c, 'm> {
    /// Creates a composer whose first row sits at baseline `y`.
    pub fn new(canvas: &'c mut Canvas<'m>, geometry: PageGeometry, y: f64) -> Self {
        Self {
            canvas,
            geometry,
            cursor: Cursor {
                x: geometry.content_left(),
                y,
            },
            sections: 0,
        }
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Moves the cursor down by `amount`.
    pub fn advance(&mut self, amount: f64) {
        self.cursor.y += amount.max(0.0);
    }

    /// Renders every section in order.
    pub fn render_sections(&mut self, sections: &[SectionSpec<'_>], record: &PoolRecord) {
        for section in sections {
            self.render_section(section, record);
        }
    }

    /// Renders one section: its title followed by each row.
    pub fn render_section(&mut self, section: &SectionSpec<'_>, record: &PoolRecord) {
        if self.sections > 0 {
            self.advance(SECTION_GAP);
        }
        self.sections += 1;
        debug!("composing section '{}' at y={:.2}", section.title, self.cursor.y);

        self.title(section.title, !section.rows.is_empty());
        for row in section.rows {
            match row {
                RowSpec::Fields(specs) => {
                    let fields: Vec<Field> = specs.iter().map(|spec| spec.resolve(record)).collect();
                    self.fields(&fields);
                }
                RowSpec::Legend(text) => self.legend(text),
            }
        }
    }

    /// Draws a section title. With `keep_with_next`, the title moves to a new
    /// page unless the row after it still fits on this one.
    pub fn title(&mut self, title: &str, keep_with_next: bool) {
        if keep_with_next {
            self.ensure_room_for(TITLE_LINE_HEIGHT);
        } else {
            self.ensure_room();
        }
        let (left, right) = self.bounds();
        self.cursor.y = draw_section_title(self.canvas, title, left, right, self.cursor.y);
    }

    pub fn legend(&mut self, text: &str) {
        self.ensure_room();
        let (left, right) = self.bounds();
        self.cursor.y = draw_static_line(self.canvas, text, left, right, self.cursor.y);
    }

    pub fn fields(&mut self, fields: &[Field]) {
        self.ensure_room();
        let (left, right) = self.bounds();
        let y = self.cursor.y;
        self.cursor.y = match fields {
            [first, second] => draw_two_column_line(self.canvas, first, second, left, right, y),
            _ => draw_multi_column_line(self.canvas, fields, left, right, y),
        };
    }

    /// Draws free text in `style` and advances by `advance`.
    pub fn text_line(&mut self, text: &str, style: TextStyle, advance: f64) {
        self.ensure_room();
        let Cursor { x, y } = self.cursor;
        self.canvas.with_style(style, |canvas| canvas.text(x, y, text));
        self.advance(advance);
    }

    /// Draws a full-width horizontal rule at the cursor and advances by `advance`.
    pub fn rule(&mut self, thickness: f64, advance: f64) {
        self.ensure_room();
        let (left, right) = self.bounds();
        self.canvas.rule(left, right, self.cursor.y, thickness);
        self.advance(advance);
    }

    fn bounds(&self) -> (f64, f64) {
        (self.geometry.content_left(), self.geometry.content_right())
    }

    fn ensure_room(&mut self) {
        self.ensure_room_for(0.0);
    }

    /// Starts a new page unless a baseline `extra` below the cursor still fits.
    fn ensure_room_for(&mut self, extra: f64) {
        let at_top = self.cursor.y <= self.geometry.content_top();
        if !at_top && self.cursor.y + extra > self.geometry.content_bottom() {
            debug!(
                "cursor at y={:.2} passed the bottom margin; starting page {}",
                self.cursor.y,
                self.canvas.page_count() + 1
            );
            self.canvas.new_page();
            self.cursor = Cursor {
                x: self.geometry.content_left(),
                y: self.geometry.content_top(),
            };
        }
    }
}
