//! Document construction: letterhead, sections and footer for one record.

use log::debug;

use crate::assets::Asset;
use crate::composer::SectionComposer;
use crate::config::{CompanyHeader, ReportConfig};
use crate::document::{Canvas, Document, DrawOp};
use crate::error::ReportError;
use crate::layout::{PageGeometry, FIELD_STYLE};
use crate::metrics::{TextMeasure, TextStyle};
use crate::record::PoolRecord;
use crate::schema::{SectionSpec, POOL_SECTIONS};

/// Height reserved for the logo when one is available.
pub const LOGO_HEIGHT: f64 = 20.0;
pub const LOGO_MAX_WIDTH: f64 = 60.0;
/// Space between the logo and the letterhead.
pub const LOGO_GAP: f64 = 5.0;

const COMPANY_STYLE: TextStyle = TextStyle::bold(14);
const LETTERHEAD_STYLE: TextStyle = TextStyle::regular(10);
const FOOTER_STYLE: TextStyle = TextStyle::bold(9);

const COMPANY_ADVANCE: f64 = 6.0;
const LETTERHEAD_ADVANCE: f64 = 5.0;
const HEADER_RULE_THICKNESS: f64 = 0.5;
const HEADER_RULE_GAP: f64 = 8.0;
const FOOTER_GAP: f64 = 6.0;

/// Builds [`Document`]s for pool records with a fixed schema and page profile.
pub struct ReportBuilder<M> {
    measure: M,
    config: ReportConfig,
    sections: &'static [SectionSpec<'static>],
}

impl<M: TextMeasure> ReportBuilder<M> {
    /// Creates a builder with the default configuration.
    pub fn new(measure: M) -> Self {
        Self {
            measure,
            config: ReportConfig::default(),
            sections: POOL_SECTIONS,
        }
    }

    /// Replaces the whole configuration.
    pub fn with_config(mut self, config: ReportConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the page profile.
    pub fn with_page(mut self, page: PageGeometry) -> Self {
        self.config.page = page;
        self
    }

    /// Sets the letterhead printed above the first section.
    pub fn with_company(mut self, company: CompanyHeader) -> Self {
        self.config.company = company;
        self
    }

    /// Sets the footer line printed after the last section.
    pub fn with_footer(mut self, footer: impl Into<String>) -> Self {
        self.config.footer = footer.into();
        self
    }

    /// Replaces the section schema.
    pub fn with_sections(mut self, sections: &'static [SectionSpec<'static>]) -> Self {
        self.sections = sections;
        self
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Builds the document for `record`.
    ///
    /// `logo` is the already resolved logo outcome; without it the letterhead
    /// starts at the top margin.
    pub fn build(&self, record: &PoolRecord, logo: Option<&Asset>) -> Result<Document, ReportError> {
        let geometry = self.config.page;
        validate_geometry(&geometry)?;

        let mut canvas = Canvas::new(&self.measure, FIELD_STYLE);
        let mut top = geometry.content_top();

        if let Some(asset) = logo {
            let (width, height) = logo_box(asset);
            canvas.logo(geometry.content_left(), top, width, height);
            top += height + LOGO_GAP;
        }

        let mut composer = SectionComposer::new(&mut canvas, geometry, top);

        let company = &self.config.company;
        composer.text_line(&company.name, COMPANY_STYLE, COMPANY_ADVANCE);
        for line in &company.lines {
            composer.text_line(line, LETTERHEAD_STYLE, LETTERHEAD_ADVANCE);
        }
        composer.rule(HEADER_RULE_THICKNESS, HEADER_RULE_GAP);

        composer.render_sections(self.sections, record);

        composer.advance(FOOTER_GAP);
        composer.text_line(&self.config.footer, FOOTER_STYLE, 0.0);

        let title = format!("Pool Report - {}", record.owner_name());
        let document = canvas.finish(title, geometry, logo.cloned());
        ensure_finite(&document)?;

        debug!(
            "built '{}' with {} page(s)",
            document.title(),
            document.pages().len()
        );
        Ok(document)
    }
}

/// Logo size on the page: fixed height, width from the aspect ratio, capped.
pub fn logo_box(asset: &Asset) -> (f64, f64) {
    let ratio = asset.aspect_ratio();
    let width = LOGO_HEIGHT * ratio;
    if width > LOGO_MAX_WIDTH {
        (LOGO_MAX_WIDTH, LOGO_MAX_WIDTH / ratio)
    } else {
        (width, LOGO_HEIGHT)
    }
}

fn validate_geometry(geometry: &PageGeometry) -> Result<(), ReportError> {
    let usable = geometry.content_right() > geometry.content_left()
        && geometry.content_bottom() > geometry.content_top()
        && geometry.margin >= 0.0;
    if usable {
        Ok(())
    } else {
        Err(ReportError::build(format!(
            "page profile leaves no content area: {geometry:?}"
        )))
    }
}

fn ensure_finite(document: &Document) -> Result<(), ReportError> {
    for (index, page) in document.pages().iter().enumerate() {
        for op in page.ops() {
            let finite = match op {
                DrawOp::Text { x, y, .. } => x.is_finite() && y.is_finite(),
                DrawOp::Rule { x1, x2, y, .. } => x1.is_finite() && x2.is_finite() && y.is_finite(),
                DrawOp::Logo {
                    x,
                    y,
                    width,
                    height,
                } => x.is_finite() && y.is_finite() && width.is_finite() && height.is_finite(),
            };
            if !finite {
                return Err(ReportError::build(format!(
                    "non-finite coordinate on page {}: {op:?}",
                    index + 1
                )));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::metrics::FixedAdvance;

    struct BrokenMetric;

    impl TextMeasure for BrokenMetric {
        fn text_width(&self, _text: &str, _style: TextStyle) -> f64 {
            f64::NAN
        }
    }

    #[test]
    fn degenerate_page_is_a_build_failure() {
        let builder = ReportBuilder::new(FixedAdvance::default()).with_page(PageGeometry {
            page_width: 20.0,
            page_height: 297.0,
            margin: 15.0,
        });
        let err = builder.build(&PoolRecord::default(), None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BuildFailure);
    }

    #[test]
    fn broken_measurement_is_a_build_failure() {
        let err = ReportBuilder::new(BrokenMetric)
            .build(&PoolRecord::default(), None)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BuildFailure);
    }

    #[test]
    fn custom_letterhead_and_footer_are_printed() {
        let builder = ReportBuilder::new(FixedAdvance::default())
            .with_company(CompanyHeader {
                name: "Blue Lagoon Pools".into(),
                lines: vec!["1 Harbour Rd".into()],
            })
            .with_footer("Call us any time.");
        let document = builder.build(&PoolRecord::default(), None).unwrap();

        let (_, x, y) = document.find_text("Blue Lagoon Pools").unwrap();
        assert_eq!((x, y), (15.0, 15.0));
        assert!(document.find_text("1 Harbour Rd").is_some());
        assert!(document.find_text("Call us any time.").is_some());
        assert!(document.find_text("Adroit Swimming Limited").is_none());
    }
}
