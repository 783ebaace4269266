//! macOS-specific implementation for clipshield.
//!
//! This crate provides pasteboard access with the concealed-type marker, a
//! global Cmd+V listener, Notification Center delivery, and accessibility
//! permission checks.

#![cfg(target_os = "macos")]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod clipboard;
pub mod notify;
pub mod paste;
pub mod permissions;

pub use clipboard::{ClipboardError, Pasteboard, CONCEALED_TYPE};
pub use notify::{notify, NotifyError};
pub use paste::{PasteListener, PasteListenerError};
pub use permissions::{
    check_permission, get_permission_instructions, is_accessibility_enabled,
    request_accessibility_permission, require_accessibility, PermissionError, PermissionStatus,
};

/// Initialize macOS-specific components.
///
/// Logs whether paste detection will be possible.
///
/// # Errors
///
/// Returns an error if initialization fails.
pub fn init() -> Result<(), Box<dyn std::error::Error>> {
    let status = check_permission();
    tracing::info!(
        accessibility = status.is_granted,
        "Initializing macOS platform components"
    );
    Ok(())
}

/// Get the platform name.
#[must_use]
pub fn platform_name() -> &'static str {
    "macOS"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init() {
        assert!(init().is_ok());
    }

    #[test]
    fn test_platform_name() {
        assert_eq!(platform_name(), "macOS");
    }

    #[test]
    fn test_paste_exports() {
        let listener = PasteListener::new();
        assert!(!listener.is_installed());
    }

    #[test]
    fn test_permission_exports() {
        let status = check_permission();
        assert!(!status.description.is_empty());
    }
}
