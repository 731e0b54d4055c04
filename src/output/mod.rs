//! Output channels: saving the artifact or handing it to a print surface.
//!
//! Both channels go through [`ReportService::build_document`], so Save and
//! Print always deliver the same instruction sequence for the same record and
//! logo outcome.

mod device;
mod host;
mod print;

use std::sync::OnceLock;

use chrono::NaiveDate;
use log::{error, info, warn};
use regex::Regex;

pub use device::DeviceClass;
pub use host::{
    DirectorySaveTarget, FrameId, HostCallback, Notice, NoticeLevel, ObjectUrl, PrintHost,
    SaveTarget,
};
pub use print::{
    PrintStrategy, SurfaceCleanup, FRAME_FALLBACK_TIMEOUT, OBJECT_URL_LIFETIME, PDF_MIME_TYPE,
};

use crate::assets::{Asset, LogoLoader};
use crate::builder::ReportBuilder;
use crate::document::Document;
use crate::error::ReportError;
use crate::metrics::TextMeasure;
use crate::record::PoolRecord;
use crate::render::{DocumentWriter, WriteOptions};

/// Message shown to the user when a print request fails.
pub const PRINT_FAILURE_NOTICE: &str = "Error generating PDF. Please try again.";

fn whitespace_runs() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\s+").expect("whitespace pattern compiles"))
}

/// File name of a saved report: `pool_<owner>_<YYYY-MM-DD>.pdf`, with every
/// whitespace run in the owner name replaced by `_`.
pub fn artifact_name(owner: &str, date: NaiveDate) -> String {
    let owner = whitespace_runs().replace_all(owner, "_");
    format!("pool_{owner}_{}.pdf", date.format("%Y-%m-%d"))
}

/// Builds, serializes and delivers pool reports.
pub struct ReportService<M, W> {
    builder: ReportBuilder<M>,
    writer: W,
    logo_loader: Option<LogoLoader>,
}

impl<M: TextMeasure, W: DocumentWriter> ReportService<M, W> {
    pub fn new(builder: ReportBuilder<M>, writer: W) -> Self {
        Self {
            builder,
            writer,
            logo_loader: None,
        }
    }

    /// Enables logo loading. Without a loader every report is built without a logo.
    pub fn with_logo_loader(mut self, loader: LogoLoader) -> Self {
        self.logo_loader = Some(loader);
        self
    }

    pub fn builder(&self) -> &ReportBuilder<M> {
        &self.builder
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    /// Resolves the logo outcome for one build. Failures degrade to `None`.
    pub fn load_logo(&self) -> Option<Asset> {
        let loader = self.logo_loader.as_ref()?;
        let path = &self.builder.config().logo_path;
        match loader.load(path) {
            Ok(asset) => Some(asset),
            Err(err) => {
                warn!("{}; continuing without logo", ReportError::from(err));
                None
            }
        }
    }

    /// Builds the document for `record`, fetching the logo first.
    pub fn build_document(&self, record: &PoolRecord) -> Result<Document, ReportError> {
        let logo = self.load_logo();
        self.builder.build(record, logo.as_ref())
    }

    /// Builds the report and saves it under today's (UTC) artifact name.
    ///
    /// Returns the file name used.
    pub fn save(&self, record: &PoolRecord, target: &dyn SaveTarget) -> Result<String, ReportError> {
        self.save_dated(record, target, chrono::Utc::now().date_naive())
    }

    /// Like [`ReportService::save`] with an explicit date for the file name.
    pub fn save_dated(
        &self,
        record: &PoolRecord,
        target: &dyn SaveTarget,
        date: NaiveDate,
    ) -> Result<String, ReportError> {
        let document = self.build_document(record)?;
        let bytes = self
            .writer
            .write(&document, WriteOptions::default())
            .map_err(|err| ReportError::save(err.to_string()))?;
        let file_name = artifact_name(&record.owner_name(), date);
        target
            .save(&file_name, &bytes)
            .map_err(|err| ReportError::save(format!("{file_name}: {err}")))?;
        info!("saved report {file_name}");
        Ok(file_name)
    }

    /// Builds the report and hands it to the host's print surface.
    ///
    /// On failure the user is notified through [`PrintHost::notify`] and any
    /// surface created for this request is released.
    pub fn print(&self, record: &PoolRecord, host: &dyn PrintHost) -> Result<(), ReportError> {
        let strategy = PrintStrategy::for_user_agent(&host.user_agent());
        info!("printing report via {strategy:?}");

        let result = self.build_document(record).and_then(|document| {
            let options = strategy.write_options(self.writer.supports_auto_print());
            let bytes = self
                .writer
                .write(&document, options)
                .map_err(|err| ReportError::print(err.to_string()))?;
            strategy
                .deliver(host, &bytes)
                .map_err(|err| ReportError::print(err.to_string()))
        });

        if let Err(err) = &result {
            error!("print request failed: {err}");
            host.notify(Notice::error(PRINT_FAILURE_NOTICE));
        }
        result
    }
}
