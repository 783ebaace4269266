//! Accessibility permission checks.
//!
//! Observing the paste shortcut system-wide needs the accessibility
//! permission. Without it the monitor still works, but countdowns are never
//! shortened by a paste.

use macos_accessibility_client::accessibility;
use thiserror::Error;

/// Errors related to accessibility permissions.
#[derive(Debug, Error)]
pub enum PermissionError {
    /// Accessibility permission is not granted.
    #[error("accessibility permission not granted")]
    NotGranted,
}

/// Information about the current accessibility permission status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionStatus {
    /// Whether accessibility permission is currently granted.
    pub is_granted: bool,

    /// Human-readable description of the status.
    pub description: String,
}

impl PermissionStatus {
    /// Create a new granted status.
    #[must_use]
    pub fn granted() -> Self {
        Self {
            is_granted: true,
            description: "Accessibility permission is granted".to_string(),
        }
    }

    /// Create a new not-granted status.
    #[must_use]
    pub fn not_granted() -> Self {
        Self {
            is_granted: false,
            description: "Accessibility permission is not granted; paste detection is off"
                .to_string(),
        }
    }
}

/// Check if the application has accessibility permissions.
///
/// Returns `true` if global key events may be observed.
#[must_use]
pub fn is_accessibility_enabled() -> bool {
    accessibility::application_is_trusted()
}

/// Check accessibility permission status.
#[must_use]
pub fn check_permission() -> PermissionStatus {
    if is_accessibility_enabled() {
        PermissionStatus::granted()
    } else {
        PermissionStatus::not_granted()
    }
}

/// Fail with [`PermissionError::NotGranted`] unless the permission is granted.
///
/// # Errors
///
/// Returns an error if accessibility permission is missing.
pub fn require_accessibility() -> Result<(), PermissionError> {
    if is_accessibility_enabled() {
        Ok(())
    } else {
        Err(PermissionError::NotGranted)
    }
}

/// Prompt the user to grant accessibility permissions.
///
/// Shows the system prompt that leads to Privacy & Security > Accessibility.
/// The user still has to enable the permission by hand.
///
/// Returns `true` if the permission is already granted.
#[must_use]
pub fn request_accessibility_permission() -> bool {
    accessibility::application_is_trusted_with_prompt()
}

/// Get instructions for how to grant accessibility permissions.
///
/// Returns a human-readable string with instructions for the user.
#[must_use]
pub fn get_permission_instructions() -> &'static str {
    r"To let clipshield shorten countdowns after a paste:

1. Open System Settings (System Preferences on older macOS)
2. Go to Privacy & Security > Accessibility
3. Enable the terminal or app that runs clipshield
4. If it is not listed, click the '+' button and add it

After granting permission, restart clipshield."
}
