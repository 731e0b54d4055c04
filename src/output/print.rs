//! Print delivery strategies and the lifecycle of the print surface.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use log::{debug, error, info};

use super::device::DeviceClass;
use super::host::{FrameId, Notice, ObjectUrl, PrintHost};
use crate::error::HostError;
use crate::render::WriteOptions;

/// How long a mobile object URL stays valid after it was opened.
pub const OBJECT_URL_LIFETIME: Duration = Duration::from_secs(60);
/// Removal deadline for the hidden print frame if after-print never fires.
pub const FRAME_FALLBACK_TIMEOUT: Duration = Duration::from_secs(60);

pub const PDF_MIME_TYPE: &str = "application/pdf";

/// Delivery path for a print request, selected once per request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrintStrategy {
    /// Open the document in a new viewing context and let the user print it.
    MobileOpen,
    /// Load the document into a hidden frame and trigger the print dialog.
    DesktopPrint,
}

impl PrintStrategy {
    pub fn for_device(device: DeviceClass) -> Self {
        match device {
            DeviceClass::Mobile => Self::MobileOpen,
            DeviceClass::Desktop => Self::DesktopPrint,
        }
    }

    pub fn for_user_agent(user_agent: &str) -> Self {
        Self::for_device(DeviceClass::from_user_agent(user_agent))
    }

    /// Serialization options for this strategy.
    ///
    /// Only the desktop path embeds the auto-print directive, and only when the
    /// writer can honour it.
    pub fn write_options(self, writer_supports_auto_print: bool) -> WriteOptions {
        WriteOptions {
            auto_print: self == Self::DesktopPrint && writer_supports_auto_print,
        }
    }

    /// Hands `bytes` to the host.
    ///
    /// Resources created before a failure are released before the error is
    /// returned.
    pub fn deliver(self, host: &dyn PrintHost, bytes: &[u8]) -> Result<(), HostError> {
        match self {
            Self::MobileOpen => deliver_mobile(host, bytes),
            Self::DesktopPrint => deliver_desktop(host, bytes),
        }
    }
}

fn deliver_mobile(host: &dyn PrintHost, bytes: &[u8]) -> Result<(), HostError> {
    let url = host.create_object_url(bytes, PDF_MIME_TYPE)?;

    if host.open_window(&url) {
        info!("opened report in a new viewing context");
    } else {
        debug!("new viewing context blocked; navigating the current one");
        if let Err(err) = host.navigate(&url) {
            host.revoke_object_url(&url);
            return Err(err);
        }
    }

    host.set_timeout(
        OBJECT_URL_LIFETIME,
        Box::new(move |host: &dyn PrintHost| host.revoke_object_url(&url)),
    );
    Ok(())
}

fn deliver_desktop(host: &dyn PrintHost, bytes: &[u8]) -> Result<(), HostError> {
    let url = host.create_object_url(bytes, PDF_MIME_TYPE)?;
    let frame = match host.insert_hidden_frame(&url) {
        Ok(frame) => frame,
        Err(err) => {
            host.revoke_object_url(&url);
            return Err(err);
        }
    };
    let cleanup = SurfaceCleanup::new(frame, url);

    let on_load = cleanup.clone();
    host.on_frame_load(
        frame,
        Box::new(move |host: &dyn PrintHost| {
            if let Err(err) = host.print_frame(frame) {
                error!("print dialog failed: {err}");
                host.notify(Notice::error(format!("Could not open the print dialog: {err}")));
                on_load.run(host);
            }
        }),
    );

    let after_print = cleanup.clone();
    host.on_after_print(
        frame,
        Box::new(move |host: &dyn PrintHost| {
            after_print.run(host);
        }),
    );

    host.set_timeout(
        FRAME_FALLBACK_TIMEOUT,
        Box::new(move |host: &dyn PrintHost| {
            if cleanup.run(host) {
                debug!("print frame removed by fallback timeout");
            }
        }),
    );
    Ok(())
}

struct CleanupState {
    frame: FrameId,
    url: ObjectUrl,
    done: Cell<bool>,
}

/// Removes the hidden print frame and releases its URL exactly once.
///
/// Clones share state: whichever trigger runs first does the work, later
/// calls are no-ops.
#[derive(Clone)]
pub struct SurfaceCleanup {
    state: Rc<CleanupState>,
}

impl SurfaceCleanup {
    pub fn new(frame: FrameId, url: ObjectUrl) -> Self {
        Self {
            state: Rc::new(CleanupState {
                frame,
                url,
                done: Cell::new(false),
            }),
        }
    }

    /// Performs the cleanup. Returns `false` if it had already run.
    pub fn run(&self, host: &dyn PrintHost) -> bool {
        if self.state.done.replace(true) {
            return false;
        }
        host.remove_frame(self.state.frame);
        host.revoke_object_url(&self.state.url);
        debug!("removed print frame {:?}", self.state.frame);
        true
    }

    pub fn is_done(&self) -> bool {
        self.state.done.get()
    }
}
