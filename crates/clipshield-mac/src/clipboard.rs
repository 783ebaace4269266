//! Pasteboard access for macOS.
//!
//! Concealed writes add the `org.nspasteboard.ConcealedType` marker next to
//! the text. Clipboard managers that honour the nspasteboard.org conventions
//! skip or expire such entries.

use clipboard_rs::{Clipboard, ClipboardContent, ClipboardContext};
use thiserror::Error;
use tracing::trace;

/// Pasteboard type that marks content as concealed.
pub const CONCEALED_TYPE: &str = "org.nspasteboard.ConcealedType";

/// Errors that can occur while accessing the pasteboard.
#[derive(Debug, Error)]
pub enum ClipboardError {
    /// Failed to open the pasteboard.
    #[error("clipboard access failed: {0}")]
    AccessFailed(String),

    /// Failed to write to the pasteboard.
    #[error("clipboard write failed: {0}")]
    WriteFailed(String),
}

/// Result type for clipboard operations.
pub type Result<T> = std::result::Result<T, ClipboardError>;

/// The general pasteboard.
///
/// A fresh `ClipboardContext` is opened for every operation.
#[derive(Debug)]
pub struct Pasteboard {
    _private: (),
}

impl Pasteboard {
    /// Open the general pasteboard.
    ///
    /// # Errors
    ///
    /// Returns an error if the pasteboard cannot be reached.
    pub fn new() -> Result<Self> {
        Self::context()?;
        Ok(Self { _private: () })
    }

    /// Get the current text content.
    ///
    /// Empty or non-text content is `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns an error if pasteboard access fails.
    pub fn read_text(&self) -> Result<Option<String>> {
        let ctx = Self::context()?;
        match ctx.get_text() {
            Ok(text) if !text.is_empty() => Ok(Some(text)),
            // No text content or non-text pasteboard is not an error
            Ok(_) | Err(_) => Ok(None),
        }
    }

    /// Replace the pasteboard with `text` marked as concealed.
    ///
    /// # Errors
    ///
    /// Returns an error if the pasteboard cannot be written.
    pub fn write_concealed(&self, text: &str) -> Result<()> {
        let ctx = Self::context()?;
        ctx.set(vec![
            ClipboardContent::Text(text.to_string()),
            ClipboardContent::Other(CONCEALED_TYPE.to_string(), Vec::new()),
        ])
        .map_err(|e| ClipboardError::WriteFailed(e.to_string()))?;
        trace!(len = text.len(), "Wrote concealed text to pasteboard");
        Ok(())
    }

    /// Remove everything from the pasteboard.
    ///
    /// # Errors
    ///
    /// Returns an error if the pasteboard cannot be cleared.
    pub fn clear(&self) -> Result<()> {
        let ctx = Self::context()?;
        ctx.clear()
            .map_err(|e| ClipboardError::WriteFailed(e.to_string()))?;
        trace!("Cleared pasteboard");
        Ok(())
    }

    fn context() -> Result<ClipboardContext> {
        ClipboardContext::new().map_err(|e| ClipboardError::AccessFailed(e.to_string()))
    }
}
