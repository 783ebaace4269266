//! X11 clipboard access.
//!
//! Concealed writes add the `x-kde-passwordManagerHint` target with the value
//! `secret`, which Klipper and other history tools use to skip an entry.

use std::fmt;

use clipboard_rs::{Clipboard, ClipboardContent, ClipboardContext};
use thiserror::Error;
use tracing::trace;

/// Target that marks clipboard content as a secret.
pub const PASSWORD_HINT_TARGET: &str = "x-kde-passwordManagerHint";

/// Value of [`PASSWORD_HINT_TARGET`] for concealed content.
pub const PASSWORD_HINT_SECRET: &[u8] = b"secret";

/// Errors that can occur while accessing the clipboard.
#[derive(Debug, Error)]
pub enum ClipboardError {
    /// Failed to connect to the clipboard.
    #[error("clipboard access failed: {0}")]
    AccessFailed(String),

    /// Failed to write to the clipboard.
    #[error("clipboard write failed: {0}")]
    WriteFailed(String),
}

/// Result type for clipboard operations.
pub type Result<T> = std::result::Result<T, ClipboardError>;

/// The X11 `CLIPBOARD` selection.
///
/// The context is kept open for the lifetime of the value: X11 selections
/// are served by their owner, so content we write disappears when the
/// context is dropped.
pub struct Pasteboard {
    ctx: ClipboardContext,
}

impl Pasteboard {
    /// Connect to the clipboard.
    ///
    /// # Errors
    ///
    /// Returns an error if no X11 display is reachable.
    pub fn new() -> Result<Self> {
        let ctx =
            ClipboardContext::new().map_err(|e| ClipboardError::AccessFailed(e.to_string()))?;
        Ok(Self { ctx })
    }

    /// Get the current text content.
    ///
    /// Empty or non-text content is `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Currently infallible once connected.
    pub fn read_text(&self) -> Result<Option<String>> {
        match self.ctx.get_text() {
            Ok(text) if !text.is_empty() => Ok(Some(text)),
            // No text content or non-text clipboard is not an error
            Ok(_) | Err(_) => Ok(None),
        }
    }

    /// Replace the clipboard with `text` marked as a secret.
    ///
    /// # Errors
    ///
    /// Returns an error if the clipboard cannot be written.
    pub fn write_concealed(&self, text: &str) -> Result<()> {
        self.ctx
            .set(vec![
                ClipboardContent::Text(text.to_string()),
                ClipboardContent::Other(
                    PASSWORD_HINT_TARGET.to_string(),
                    PASSWORD_HINT_SECRET.to_vec(),
                ),
            ])
            .map_err(|e| ClipboardError::WriteFailed(e.to_string()))?;
        trace!(len = text.len(), "Wrote concealed text to clipboard");
        Ok(())
    }

    /// Remove everything from the clipboard.
    ///
    /// # Errors
    ///
    /// Returns an error if the clipboard cannot be cleared.
    pub fn clear(&self) -> Result<()> {
        self.ctx
            .clear()
            .map_err(|e| ClipboardError::WriteFailed(e.to_string()))?;
        trace!("Cleared clipboard");
        Ok(())
    }
}

impl fmt::Debug for Pasteboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pasteboard").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hint() {
        assert_eq!(PASSWORD_HINT_TARGET, "x-kde-passwordManagerHint");
        assert_eq!(PASSWORD_HINT_SECRET, b"secret");
    }

    #[test]
    fn test_clipboard_error_display() {
        let error = ClipboardError::AccessFailed("no display".to_string());
        assert_eq!(error.to_string(), "clipboard access failed: no display");
    }

    #[test]
    #[ignore = "requires an X11 display"]
    fn test_pasteboard_conceal_then_clear() {
        let pasteboard = Pasteboard::new().unwrap();
        pasteboard.write_concealed("clipshield test").unwrap();
        assert_eq!(
            pasteboard.read_text().unwrap().as_deref(),
            Some("clipshield test")
        );

        pasteboard.clear().unwrap();
        assert_eq!(pasteboard.read_text().unwrap(), None);
    }
}
