//! Fixed-layout pool service reports.
//!
//! A [`PoolRecord`] is laid out into an engine-independent [`Document`] by the
//! [`ReportBuilder`], then serialized to PDF by a [`DocumentWriter`] and
//! delivered through one of the output channels in [`output`].

pub mod assets;
pub mod builder;
pub mod composer;
pub mod config;
pub mod document;
pub mod error;
pub mod fonts;
pub mod layout;
pub mod metrics;
pub mod output;
pub mod record;
pub mod render;
pub mod schema;

#[cfg(feature = "autoprint")]
pub mod autoprint;

pub use assets::{Asset, AssetFetcher, FsFetcher, ImageFormat, LogoLoader};
#[cfg(feature = "http")]
pub use assets::HttpFetcher;
pub use builder::ReportBuilder;
pub use config::{CompanyHeader, ReportConfig};
pub use document::{Document, DrawOp, Page};
pub use error::{AssetError, ErrorKind, HostError, ReportError};
pub use layout::PageGeometry;
pub use metrics::{FixedAdvance, FontMetrics, TextMeasure, TextStyle};
pub use output::{artifact_name, PrintHost, PrintStrategy, ReportService, SaveTarget};
pub use record::{FieldKey, FieldValue, PoolRecord};
pub use render::{DocumentWriter, PdfWriter, WriteOptions};
