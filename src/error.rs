//! Error types shared across the report pipeline.

use thiserror::Error;

/// Coarse classification of a [`ReportError`], suitable for user-facing messages.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// The logo could not be loaded. Recovered locally.
    AssetUnavailable,
    /// Drawing the document failed.
    BuildFailure,
    /// A writer could not serialize the document.
    RenderFailure,
    /// Serializing or saving the artifact failed.
    SaveFailure,
    /// Handing the document to the print surface failed.
    PrintFailure,
    /// The font family required for measurement and rendering is missing.
    FontLoad,
}

/// Errors surfaced by the report pipeline.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("logo unavailable: {0}")]
    AssetUnavailable(#[from] AssetError),

    #[error("failed to build report: {message}")]
    Build { message: String },

    #[error("failed to render report: {message}")]
    Render { message: String },

    #[error("failed to save report: {message}")]
    Save { message: String },

    #[error("failed to print report: {message}")]
    Print { message: String },

    #[error("failed to load fonts: {0}")]
    FontLoad(genpdf::error::Error),
}

impl ReportError {
    pub fn build(message: impl Into<String>) -> Self {
        Self::Build {
            message: message.into(),
        }
    }

    pub fn render(message: impl Into<String>) -> Self {
        Self::Render {
            message: message.into(),
        }
    }

    pub fn save(message: impl Into<String>) -> Self {
        Self::Save {
            message: message.into(),
        }
    }

    pub fn print(message: impl Into<String>) -> Self {
        Self::Print {
            message: message.into(),
        }
    }

    /// Returns the structured kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::AssetUnavailable(_) => ErrorKind::AssetUnavailable,
            Self::Build { .. } => ErrorKind::BuildFailure,
            Self::Render { .. } => ErrorKind::RenderFailure,
            Self::Save { .. } => ErrorKind::SaveFailure,
            Self::Print { .. } => ErrorKind::PrintFailure,
            Self::FontLoad(_) => ErrorKind::FontLoad,
        }
    }
}

/// Failures while fetching or decoding the logo asset.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to fetch {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("invalid asset location {url}: {message}")]
    InvalidUrl { url: String, message: String },

    #[error("{url} responded with status {status}")]
    Status { url: String, status: u16 },

    #[error("unsupported image format (content type {content_type:?})")]
    UnsupportedFormat { content_type: Option<String> },

    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
}

/// Failure reported by a host environment (save target or print surface).
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct HostError {
    message: String,
}

impl HostError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_variants() {
        assert_eq!(ReportError::build("x").kind(), ErrorKind::BuildFailure);
        assert_eq!(ReportError::render("x").kind(), ErrorKind::RenderFailure);
        assert_eq!(ReportError::save("x").kind(), ErrorKind::SaveFailure);
        assert_eq!(ReportError::print("x").kind(), ErrorKind::PrintFailure);
        let asset = AssetError::Status {
            url: "https://example.com/logo.png".into(),
            status: 404,
        };
        assert_eq!(
            ReportError::from(asset).kind(),
            ErrorKind::AssetUnavailable
        );
    }

    #[test]
    fn messages_carry_context() {
        let err = ReportError::save("disk full");
        assert_eq!(err.to_string(), "failed to save report: disk full");
    }
}
