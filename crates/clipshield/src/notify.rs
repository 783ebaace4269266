//! User notifications.

use tracing::info;

use crate::error::Result;

/// Title used for every notification.
pub const NOTIFICATION_TITLE: &str = "ClipShield";

/// Message shown after the clipboard has been cleared.
pub const CLEARED_MESSAGE: &str = "Sensitive data cleared from clipboard";

/// Delivers short user-facing messages.
pub trait Notifier {
    /// Show `message` to the user.
    ///
    /// # Errors
    ///
    /// Returns an error if the notification could not be delivered.
    fn notify(&self, message: &str) -> Result<()>;
}

/// A notifier that only writes to the log.
///
/// Used when no desktop notification mechanism is available.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, message: &str) -> Result<()> {
        info!(title = NOTIFICATION_TITLE, "{message}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_notifier_never_fails() {
        assert!(LogNotifier.notify(CLEARED_MESSAGE).is_ok());
    }
}
