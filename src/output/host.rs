//! Contracts with the environment that receives finished reports.
//!
//! A browser (wasm) host, a desktop shell or a test double implements these
//! traits; the report pipeline never talks to a window system directly.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::info;

use crate::error::HostError;

/// Receives a finished artifact under its file name.
pub trait SaveTarget {
    fn save(&self, file_name: &str, bytes: &[u8]) -> Result<(), HostError>;
}

impl<T: SaveTarget + ?Sized> SaveTarget for &T {
    fn save(&self, file_name: &str, bytes: &[u8]) -> Result<(), HostError> {
        (**self).save(file_name, bytes)
    }
}

/// Saves artifacts into a directory on the local filesystem.
#[derive(Clone, Debug)]
pub struct DirectorySaveTarget {
    directory: PathBuf,
}

impl DirectorySaveTarget {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

impl SaveTarget for DirectorySaveTarget {
    fn save(&self, file_name: &str, bytes: &[u8]) -> Result<(), HostError> {
        fs::create_dir_all(&self.directory).map_err(|err| {
            HostError::new(format!(
                "failed to create {}: {err}",
                self.directory.display()
            ))
        })?;
        let path = self.directory.join(file_name);
        fs::write(&path, bytes)
            .map_err(|err| HostError::new(format!("failed to write {}: {err}", path.display())))?;
        info!("saved {} ({} bytes)", path.display(), bytes.len());
        Ok(())
    }
}

/// Handle to a temporary in-memory URL created by the host.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ObjectUrl(pub String);

impl fmt::Display for ObjectUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Handle to a hidden print frame inserted by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// Non-blocking message shown to the user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Deferred work scheduled on the host.
pub type HostCallback = Box<dyn FnOnce(&dyn PrintHost)>;

/// The host's printable surface.
///
/// Callbacks registered through [`PrintHost::on_frame_load`],
/// [`PrintHost::on_after_print`] and [`PrintHost::set_timeout`] are invoked by
/// the host at most once each.
pub trait PrintHost {
    fn user_agent(&self) -> String;

    /// Wraps `bytes` in a temporary URL of the given MIME type.
    fn create_object_url(&self, bytes: &[u8], mime_type: &str) -> Result<ObjectUrl, HostError>;
    fn revoke_object_url(&self, url: &ObjectUrl);

    /// Opens `url` in a new viewing context. Returns `false` when blocked.
    fn open_window(&self, url: &ObjectUrl) -> bool;
    /// Navigates the current viewing context to `url`.
    fn navigate(&self, url: &ObjectUrl) -> Result<(), HostError>;

    /// Inserts a zero-size, invisible frame showing `url`.
    fn insert_hidden_frame(&self, url: &ObjectUrl) -> Result<FrameId, HostError>;
    fn on_frame_load(&self, frame: FrameId, callback: HostCallback);
    fn on_after_print(&self, frame: FrameId, callback: HostCallback);
    /// Focuses the frame and opens the print dialog for its content.
    fn print_frame(&self, frame: FrameId) -> Result<(), HostError>;
    fn remove_frame(&self, frame: FrameId);

    fn set_timeout(&self, delay: Duration, callback: HostCallback);
    fn notify(&self, notice: Notice);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directory_target_writes_named_file() {
        let directory = std::env::temp_dir().join(format!("pool_report_save_{}", std::process::id()));
        let target = DirectorySaveTarget::new(&directory);

        target.save("pool_Jane_2024-01-01.pdf", b"%PDF-1.7").unwrap();
        let written = fs::read(directory.join("pool_Jane_2024-01-01.pdf")).unwrap();
        assert_eq!(written, b"%PDF-1.7");

        fs::remove_dir_all(&directory).unwrap();
    }
}
