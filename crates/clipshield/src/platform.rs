//! Collaborators backed by the platform crates.

use std::cell::RefCell;

use tracing::trace;

#[cfg(target_os = "linux")]
use clipshield_linux as native;
#[cfg(target_os = "macos")]
use clipshield_mac as native;

use crate::error::{Error, Result};
use crate::gateway::{ChangeTracker, ClipboardGateway};
use crate::notify::{LogNotifier, Notifier, NOTIFICATION_TITLE};
use crate::paste::{PasteSignalSource, PasteSink};

/// Name of the platform this build targets.
#[must_use]
pub fn platform_name() -> &'static str {
    native::platform_name()
}

/// Initialize platform components.
///
/// # Errors
///
/// Returns an error if the platform layer fails to initialize.
pub fn init() -> Result<()> {
    native::init().map_err(|e| Error::platform(e.to_string()))
}

/// The system clipboard with an emulated change counter.
#[derive(Debug)]
pub struct SystemClipboard {
    pasteboard: native::Pasteboard,
    tracker: RefCell<ChangeTracker>,
}

impl SystemClipboard {
    /// Connect to the system clipboard.
    ///
    /// # Errors
    ///
    /// Returns an error if the clipboard is unreachable.
    pub fn new() -> Result<Self> {
        let pasteboard = native::Pasteboard::new().map_err(|e| Error::clipboard(e.to_string()))?;
        Ok(Self {
            pasteboard,
            tracker: RefCell::new(ChangeTracker::new()),
        })
    }
}

impl ClipboardGateway for SystemClipboard {
    fn change_count(&self) -> u64 {
        match self.pasteboard.read_text() {
            Ok(text) => self.tracker.borrow_mut().observe(text.as_deref()),
            Err(e) => {
                trace!(error = %e, "Clipboard unreadable, change count unchanged");
                self.tracker.borrow().count()
            }
        }
    }

    fn read_text(&self) -> Result<Option<String>> {
        self.pasteboard
            .read_text()
            .map_err(|e| Error::clipboard(e.to_string()))
    }

    fn write_concealed(&self, text: &str) -> Result<()> {
        let result = self.pasteboard.write_concealed(text);
        self.tracker.borrow_mut().record_write(Some(text));
        result.map_err(|e| Error::clipboard(e.to_string()))
    }

    fn clear(&self) -> Result<()> {
        let result = self.pasteboard.clear();
        self.tracker.borrow_mut().record_write(None);
        result.map_err(|e| Error::clipboard(e.to_string()))
    }
}

/// Desktop notifications.
///
/// A message that cannot be delivered is still written to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemNotifier;

impl Notifier for SystemNotifier {
    fn notify(&self, message: &str) -> Result<()> {
        native::notify(NOTIFICATION_TITLE, message).map_err(|e| {
            let _ = LogNotifier.notify(message);
            Error::notification(e.to_string())
        })
    }
}

/// The system paste shortcut listener.
///
/// Only macOS has one. Elsewhere the source is never available and the
/// monitor runs with full-length countdowns.
#[derive(Debug, Default)]
pub struct SystemPasteSource {
    #[cfg(target_os = "macos")]
    listener: native::PasteListener,
}

impl SystemPasteSource {
    /// Create a detached paste source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Check that paste detection can run.
///
/// # Errors
///
/// Returns [`Error::PermissionMissing`] with instructions when the
/// accessibility permission is missing, or [`Error::Platform`] where paste
/// detection is not supported.
pub fn check_paste_permission() -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        native::require_accessibility().map_err(|_| {
            Error::permission_missing("Accessibility", native::get_permission_instructions())
        })
    }
    #[cfg(not(target_os = "macos"))]
    {
        Err(Error::platform(format!(
            "paste detection is not supported on {}",
            platform_name()
        )))
    }
}

/// Ask the user for the permission paste detection needs.
///
/// Shows the system prompt where one exists. Returns `true` if the
/// permission is already granted.
#[must_use]
pub fn request_paste_permission() -> bool {
    #[cfg(target_os = "macos")]
    {
        native::request_accessibility_permission()
    }
    #[cfg(not(target_os = "macos"))]
    {
        false
    }
}

#[cfg(target_os = "macos")]
impl PasteSignalSource for SystemPasteSource {
    fn is_available(&self) -> bool {
        native::PasteListener::is_available()
    }

    fn install(&mut self, sink: PasteSink) -> Result<()> {
        self.listener
            .install(move || sink.signal())
            .map_err(|e| Error::platform(e.to_string()))
    }

    fn remove(&mut self) {
        self.listener.remove();
    }
}

#[cfg(not(target_os = "macos"))]
impl PasteSignalSource for SystemPasteSource {
    fn is_available(&self) -> bool {
        false
    }

    fn install(&mut self, _sink: PasteSink) -> Result<()> {
        check_paste_permission()
    }

    fn remove(&mut self) {}
}
