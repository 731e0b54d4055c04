//! Field-layout primitives: positioned label, underline and value triples.
//!
//! All coordinates are millimetres from the top-left page corner and every
//! `y` is a text baseline. Each primitive draws one row and returns the
//! baseline of the next row.

use std::borrow::Cow;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::document::Canvas;
use crate::metrics::TextStyle;

/// Vertical advance of a field row.
pub const FIELD_LINE_HEIGHT: f64 = 8.0;
/// Vertical advance of a section title.
pub const TITLE_LINE_HEIGHT: f64 = 6.0;
/// Vertical advance of a legend line.
pub const STATIC_LINE_HEIGHT: f64 = 6.0;
/// Horizontal space between adjacent columns.
pub const COLUMN_GAP: f64 = 4.0;
/// Space between the end of a label and the start of its underline.
pub const LABEL_PAD: f64 = 1.5;
/// Offset of the value text from the start of the underline.
pub const VALUE_INSET: f64 = 2.0;
/// Distance of the underline below the baseline.
pub const UNDERLINE_DROP: f64 = 1.0;
pub const UNDERLINE_THICKNESS: f64 = 0.2;
/// Marks a value cut short to fit its underline.
pub const ELLIPSIS: &str = "\u{2026}";
/// Tolerance for column arithmetic.
pub const EPSILON: f64 = 1e-6;

pub const FIELD_STYLE: TextStyle = TextStyle::regular(10);
pub const LEGEND_STYLE: TextStyle = TextStyle::regular(10);
pub const TITLE_STYLE: TextStyle = TextStyle::bold(12);

/// Fixed page profile: A4 portrait with uniform margins.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageGeometry {
    pub page_width: f64,
    pub page_height: f64,
    pub margin: f64,
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self {
            page_width: 210.0,
            page_height: 297.0,
            margin: 15.0,
        }
    }
}

impl PageGeometry {
    pub fn content_left(&self) -> f64 {
        self.margin
    }

    pub fn content_right(&self) -> f64 {
        self.page_width - self.margin
    }

    pub fn content_top(&self) -> f64 {
        self.margin
    }

    /// Lowest baseline a row may use before the content moves to a new page.
    pub fn content_bottom(&self) -> f64 {
        self.page_height - self.margin
    }
}

/// Current drawing position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cursor {
    pub x: f64,
    pub y: f64,
}

/// One label/value pair, constructed per draw call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Field {
    pub label: String,
    pub value: String,
}

impl Field {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }

    /// A field whose value is left blank for hand-filling.
    pub fn blank(label: impl Into<String>) -> Self {
        Self::new(label, String::new())
    }
}

/// Splits `[left, right]` into `count` equal columns separated by `gap`.
///
/// Returns `(start, end)` pairs. The last column always ends exactly at
/// `right`, so widths plus gaps add up to `right - left`.
pub fn column_spans(left: f64, right: f64, count: usize, gap: f64) -> Vec<(f64, f64)> {
    if count == 0 {
        return Vec::new();
    }
    let gaps = gap * (count - 1) as f64;
    let width = (right - left - gaps) / count as f64;
    (0..count)
        .map(|index| {
            let start = left + index as f64 * (width + gap);
            let end = if index + 1 == count {
                right
            } else {
                start + width
            };
            (start, end)
        })
        .collect()
}

/// Draws `label:` followed by an underline running to `right`, with the value on top.
///
/// Nothing but the label crosses `right`: a label wider than its column
/// leaves a zero-length underline at `right`, and values are shortened with
/// an ellipsis to fit above the underline.
pub fn draw_single_line(canvas: &mut Canvas<'_>, field: &Field, left: f64, right: f64, y: f64) -> f64 {
    canvas.with_style(FIELD_STYLE, |canvas| {
        let label = format!("{}:", field.label);
        let label_width = canvas.text_width(&label);
        canvas.text(left, y, label);

        let start = (left + label_width + LABEL_PAD).min(right);
        canvas.rule(start, right, y + UNDERLINE_DROP, UNDERLINE_THICKNESS);

        if field.value.is_empty() {
            return;
        }
        match fit_text(canvas, &field.value, right - start - VALUE_INSET) {
            Some(value) => canvas.text(start + VALUE_INSET, y, value),
            None => debug!("no room for value '{}' of '{}'", field.value, field.label),
        }
    });
    y + FIELD_LINE_HEIGHT
}

/// Shortens `text` with a trailing ellipsis until it is at most `max_width`
/// wide in the canvas style. `None` when not even the ellipsis fits.
pub fn fit_text<'t>(canvas: &Canvas<'_>, text: &'t str, max_width: f64) -> Option<Cow<'t, str>> {
    if canvas.text_width(text) <= max_width + EPSILON {
        return Some(Cow::Borrowed(text));
    }
    text.char_indices()
        .rev()
        .map(|(index, _)| format!("{}{ELLIPSIS}", text[..index].trim_end()))
        .find(|candidate| canvas.text_width(candidate) <= max_width + EPSILON)
        .map(Cow::Owned)
}

/// Draws two fields side by side, split at the midpoint.
pub fn draw_two_column_line(
    canvas: &mut Canvas<'_>,
    left_field: &Field,
    right_field: &Field,
    left: f64,
    right: f64,
    y: f64,
) -> f64 {
    let spans = column_spans(left, right, 2, COLUMN_GAP);
    draw_single_line(canvas, left_field, spans[0].0, spans[0].1, y);
    draw_single_line(canvas, right_field, spans[1].0, spans[1].1, y)
}

/// Draws `fields` in equally sized columns on one row.
///
/// An empty slice draws nothing and leaves `y` unchanged.
pub fn draw_multi_column_line(
    canvas: &mut Canvas<'_>,
    fields: &[Field],
    left: f64,
    right: f64,
    y: f64,
) -> f64 {
    if fields.is_empty() {
        return y;
    }
    for (field, (start, end)) in fields
        .iter()
        .zip(column_spans(left, right, fields.len(), COLUMN_GAP))
    {
        draw_single_line(canvas, field, start, end, y);
    }
    y + FIELD_LINE_HEIGHT
}

/// Draws a plain legend line without underline.
pub fn draw_static_line(canvas: &mut Canvas<'_>, text: &str, left: f64, right: f64, y: f64) -> f64 {
    canvas.with_style(LEGEND_STYLE, |canvas| {
        if left + canvas.text_width(text) > right + EPSILON {
            debug!("legend line exceeds the content width: {text}");
        }
        canvas.text(left, y, text);
    });
    y + STATIC_LINE_HEIGHT
}

/// Draws a bold section header.
pub fn draw_section_title(canvas: &mut Canvas<'_>, title: &str, left: f64, right: f64, y: f64) -> f64 {
    canvas.with_style(TITLE_STYLE, |canvas| {
        if left + canvas.text_width(title) > right + EPSILON {
            debug!("section title exceeds the content width: {title}");
        }
        canvas.text(left, y, title);
    });
    y + TITLE_LINE_HEIGHT
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DrawOp;
    use crate::metrics::{FixedAdvance, TextMeasure};

    fn draw<F>(f: F) -> Vec<DrawOp>
    where
        F: FnOnce(&mut Canvas<'_>),
    {
        let metric = FixedAdvance::default();
        let mut canvas = Canvas::new(&metric, TextStyle::regular(8));
        f(&mut canvas);
        canvas.finish("t", PageGeometry::default(), None).pages()[0]
            .ops()
            .to_vec()
    }

    #[test]
    fn single_line_positions_label_underline_and_value() {
        let metric = FixedAdvance::default();
        let label_width = metric.text_width("Address:", FIELD_STYLE);

        let mut next = 0.0;
        let ops = draw(|canvas| {
            next = draw_single_line(canvas, &Field::new("Address", "1 Elm St"), 15.0, 195.0, 50.0);
        });

        assert_eq!(next, 58.0);
        assert_eq!(ops.len(), 3);
        let underline_start = 15.0 + label_width + LABEL_PAD;
        assert_eq!(
            ops[1],
            DrawOp::Rule {
                x1: underline_start,
                x2: 195.0,
                y: 51.0,
                thickness: UNDERLINE_THICKNESS,
            }
        );
        assert_eq!(
            ops[2],
            DrawOp::Text {
                x: underline_start + VALUE_INSET,
                y: 50.0,
                text: "1 Elm St".into(),
                style: FIELD_STYLE,
            }
        );
    }

    #[test]
    fn empty_value_keeps_underline_in_place() {
        let filled = draw(|canvas| {
            draw_single_line(canvas, &Field::new("Model", "X200"), 20.0, 80.0, 30.0);
        });
        let blank = draw(|canvas| {
            draw_single_line(canvas, &Field::blank("Model"), 20.0, 80.0, 30.0);
        });

        assert_eq!(blank.len(), 2);
        assert_eq!(filled[..2], blank[..]);
    }

    #[test]
    fn primitives_restore_canvas_style() {
        let metric = FixedAdvance::default();
        let mut canvas = Canvas::new(&metric, TextStyle::regular(8));
        draw_section_title(&mut canvas, "Equipment", 15.0, 195.0, 10.0);
        draw_single_line(&mut canvas, &Field::blank("Pump Brand"), 15.0, 195.0, 20.0);
        assert_eq!(canvas.style(), TextStyle::regular(8));
    }

    #[test]
    fn column_spans_cover_the_row_exactly() {
        for count in 1..=4 {
            let spans = column_spans(15.0, 195.0, count, COLUMN_GAP);
            let widths: f64 = spans.iter().map(|(start, end)| end - start).sum();
            let total = widths + COLUMN_GAP * (count - 1) as f64;
            assert!((total - 180.0).abs() < EPSILON, "count {count}: {total}");
            assert_eq!(spans.last().unwrap().1, 195.0);
            for pair in spans.windows(2) {
                assert!((pair[1].0 - pair[0].1 - COLUMN_GAP).abs() < EPSILON);
            }
        }
        assert!(column_spans(0.0, 10.0, 0, COLUMN_GAP).is_empty());
    }

    #[test]
    fn underline_stops_before_next_label() {
        let fields = [
            Field::new("Filter Brand", "Hayward"),
            Field::new("Model", "X200"),
            Field::new("Serial #", "F123"),
        ];
        let ops = draw(|canvas| {
            draw_multi_column_line(canvas, &fields, 15.0, 195.0, 100.0);
        });

        let labels: Vec<f64> = ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { x, text, .. } if text.ends_with(':') => Some(*x),
                _ => None,
            })
            .collect();
        let rules: Vec<(f64, f64)> = ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Rule { x1, x2, .. } => Some((*x1, *x2)),
                _ => None,
            })
            .collect();

        assert_eq!(labels.len(), 3);
        assert_eq!(rules.len(), 3);
        for index in 0..2 {
            assert!(rules[index].1 < labels[index + 1]);
            assert!(rules[index].1 > rules[index].0);
        }
        assert_eq!(rules[2].1, 195.0);
    }

    #[test]
    fn overlong_label_collapses_underline_at_the_column_end() {
        let ops = draw(|canvas| {
            draw_single_line(
                canvas,
                &Field::new("An extraordinarily long label for a tiny column", "X200"),
                15.0,
                30.0,
                40.0,
            );
        });
        assert_eq!(ops.len(), 2, "value has no room and is dropped");
        match ops[1] {
            DrawOp::Rule { x1, x2, .. } => {
                assert_eq!(x1, 30.0);
                assert_eq!(x2, 30.0);
            }
            ref other => panic!("expected underline, got {other:?}"),
        }
    }

    #[test]
    fn long_values_are_shortened_to_their_column() {
        let metric = FixedAdvance::default();
        let fields = [
            Field::new("Pool Cleaner Brand", "Polaris Vac-Sweep 280"),
            Field::new("Model", "280"),
            Field::new("Serial #", ""),
        ];
        let ops = draw(|canvas| {
            draw_multi_column_line(canvas, &fields, 15.0, 195.0, 100.0);
        });
        let spans = column_spans(15.0, 195.0, 3, COLUMN_GAP);

        let (value_x, value) = ops
            .iter()
            .find_map(|op| match op {
                DrawOp::Text { x, text, .. } if text.starts_with("Polaris") => Some((*x, text.clone())),
                _ => None,
            })
            .unwrap();
        assert!(value.ends_with(ELLIPSIS), "{value}");
        assert!(value.len() < "Polaris Vac-Sweep 280".len() + ELLIPSIS.len());
        assert!(value_x + metric.text_width(&value, FIELD_STYLE) <= spans[0].1 + EPSILON);

        let model_label = ops
            .iter()
            .find_map(|op| match op {
                DrawOp::Text { x, text, .. } if text == "Model:" => Some(*x),
                _ => None,
            })
            .unwrap();
        assert!(value_x + metric.text_width(&value, FIELD_STYLE) < model_label);
        assert!(ops.iter().any(|op| matches!(op, DrawOp::Text { text, .. } if text == "280")));
    }

    #[test]
    fn fit_text_keeps_short_text_and_gives_up_without_room() {
        let metric = FixedAdvance::default();
        let canvas = Canvas::new(&metric, FIELD_STYLE);
        let width = canvas.text_width("Hayward");

        assert_eq!(fit_text(&canvas, "Hayward", width).unwrap(), "Hayward");
        let shortened = fit_text(&canvas, "Hayward", width - 0.1).unwrap();
        assert_eq!(shortened, format!("Haywa{ELLIPSIS}"));
        assert_eq!(fit_text(&canvas, "Hayward", 0.5), None);
    }

    #[test]
    fn two_column_line_shares_the_row() {
        let mut next = 0.0;
        let ops = draw(|canvas| {
            next = draw_two_column_line(
                canvas,
                &Field::new("Homeowner's Name", "Jane Doe"),
                &Field::new("Phone", "5551234"),
                15.0,
                195.0,
                60.0,
            );
        });
        assert_eq!(next, 68.0);
        assert!(ops.iter().all(|op| match op {
            DrawOp::Text { y, .. } => *y == 60.0,
            DrawOp::Rule { y, .. } => *y == 61.0,
            DrawOp::Logo { .. } => false,
        }));
        let phone_label = ops
            .iter()
            .find_map(|op| match op {
                DrawOp::Text { x, text, .. } if text == "Phone:" => Some(*x),
                _ => None,
            })
            .unwrap();
        assert!((phone_label - (105.0 + COLUMN_GAP / 2.0)).abs() < EPSILON);
    }
}
