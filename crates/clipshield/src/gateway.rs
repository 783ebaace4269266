//! Clipboard gateway abstraction.
//!
//! The monitor talks to the clipboard exclusively through
//! [`ClipboardGateway`]. Platform clipboards that expose no change counter
//! of their own use a [`ChangeTracker`] to derive one from content hashes.

use crate::error::Result;

/// Access to the shared system clipboard.
pub trait ClipboardGateway {
    /// A counter that increases whenever anyone writes to the clipboard.
    fn change_count(&self) -> u64;

    /// Read the current text content, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the clipboard cannot be accessed. An empty or
    /// non-text clipboard is `Ok(None)`, not an error.
    fn read_text(&self) -> Result<Option<String>>;

    /// Rewrite `text` tagged so that clipboard history tools expire it.
    ///
    /// Must increase [`change_count`](Self::change_count).
    ///
    /// # Errors
    ///
    /// Returns an error if the clipboard cannot be written.
    fn write_concealed(&self, text: &str) -> Result<()>;

    /// Empty the clipboard.
    ///
    /// Must increase [`change_count`](Self::change_count).
    ///
    /// # Errors
    ///
    /// Returns an error if the clipboard cannot be written.
    fn clear(&self) -> Result<()>;
}

/// Derives a monotonic change counter from observed clipboard content.
///
/// Every time the observed content hash differs from the previous one the
/// counter is bumped. Our own writes bump it unconditionally and record the
/// written content so that reading it back is not seen as a new change.
#[derive(Debug, Default)]
pub struct ChangeTracker {
    count: u64,
    last_hash: Option<blake3::Hash>,
}

impl ChangeTracker {
    /// Create a new tracker with no observed content.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the content currently on the clipboard and return the counter.
    pub fn observe(&mut self, content: Option<&str>) -> u64 {
        let hash = content.map(Self::hash);
        if hash != self.last_hash {
            self.count += 1;
            self.last_hash = hash;
        }
        self.count
    }

    /// Record a write made by us and return the counter.
    pub fn record_write(&mut self, content: Option<&str>) -> u64 {
        self.count += 1;
        self.last_hash = content.map(Self::hash);
        self.count
    }

    /// The current counter value.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.count
    }

    fn hash(content: &str) -> blake3::Hash {
        blake3::hash(content.as_bytes())
    }
}
