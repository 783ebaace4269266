//! Notification Center delivery via `osascript`.

use std::process::Command;

use thiserror::Error;

/// Errors that can occur while posting a notification.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// `osascript` could not be launched.
    #[error("failed to run osascript: {0}")]
    Spawn(#[from] std::io::Error),

    /// `osascript` ran but reported failure.
    #[error("osascript exited with {status}: {stderr}")]
    Failed {
        /// Exit status description.
        status: String,
        /// Captured standard error.
        stderr: String,
    },
}

/// Post a user notification.
///
/// # Errors
///
/// Returns an error if `osascript` cannot be run or fails.
pub fn notify(title: &str, message: &str) -> Result<(), NotifyError> {
    let script = format!(
        "display notification \"{}\" with title \"{}\"",
        escape(message),
        escape(title)
    );
    let output = Command::new("osascript").args(["-e", &script]).output()?;

    if output.status.success() {
        Ok(())
    } else {
        Err(NotifyError::Failed {
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}

/// Escape a string for use inside an AppleScript string literal.
fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}
