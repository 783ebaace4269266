//! Desktop notifications via `notify-send`.

use std::process::Command;

use thiserror::Error;

/// Errors that can occur while posting a notification.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// `notify-send` could not be launched.
    #[error("failed to run notify-send: {0}")]
    Spawn(#[from] std::io::Error),

    /// `notify-send` ran but reported failure.
    #[error("notify-send exited with {0}")]
    Failed(String),
}

/// Post a desktop notification.
///
/// # Errors
///
/// Returns an error if `notify-send` is missing or fails.
pub fn notify(title: &str, message: &str) -> Result<(), NotifyError> {
    let status = Command::new("notify-send")
        .args(["--app-name=clipshield", "--", title, message])
        .status()?;

    if status.success() {
        Ok(())
    } else {
        Err(NotifyError::Failed(status.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notify_error_display() {
        let error = NotifyError::Failed("exit status: 1".to_string());
        assert_eq!(error.to_string(), "notify-send exited with exit status: 1");
    }

    #[test]
    #[ignore = "requires a notification daemon"]
    fn test_notify() {
        assert!(notify("ClipShield", "test notification").is_ok());
    }
}
