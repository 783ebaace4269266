//! Paste signal sources.
//!
//! A paste signal source watches for the platform paste shortcut (Cmd+V on
//! macOS) and invokes a [`PasteSink`]. Sources typically run on their own
//! thread, so the sink must be thread-safe; the runtime's sink forwards the
//! signal into the monitor's event queue.

use std::fmt;
use std::sync::Arc;

use crate::error::Result;

/// Callback invoked whenever a paste keystroke is observed.
#[derive(Clone)]
pub struct PasteSink(Arc<dyn Fn() + Send + Sync>);

impl PasteSink {
    /// Wrap a callback.
    pub fn new(f: impl Fn() + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// Report a paste.
    pub fn signal(&self) {
        (self.0)();
    }
}

impl fmt::Debug for PasteSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasteSink").finish_non_exhaustive()
    }
}

/// Something that can observe the paste keystroke.
pub trait PasteSignalSource {
    /// Whether the source can currently be installed.
    ///
    /// On macOS this reflects the accessibility permission. When `false`
    /// the monitor runs without paste acceleration.
    fn is_available(&self) -> bool;

    /// Start delivering paste signals to `sink`.
    ///
    /// Installing an already installed source replaces its sink.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying listener cannot be started.
    fn install(&mut self, sink: PasteSink) -> Result<()>;

    /// Stop delivering paste signals. A no-op when not installed.
    fn remove(&mut self);
}
