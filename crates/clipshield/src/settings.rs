//! Settings as seen by the monitor.
//!
//! The monitor pulls a [`SettingsSnapshot`] by value at each decision point
//! and never writes through the provider.

use std::sync::{Arc, RwLock};

use serde::Serialize;

use crate::detection::PatternSet;

/// A read-only view of the settings the monitor depends on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettingsSnapshot {
    /// Whether monitoring is active.
    pub enabled: bool,
    /// Full countdown length in seconds.
    pub clear_delay_secs: u32,
    /// Countdown length once a paste has been observed.
    pub post_paste_delay_secs: u32,
    /// Which patterns to look for.
    pub enabled_patterns: PatternSet,
    /// Whether to emit a notification when the clipboard is cleared.
    pub notifications_enabled: bool,
}

impl Default for SettingsSnapshot {
    fn default() -> Self {
        Self {
            enabled: true,
            clear_delay_secs: 30,
            post_paste_delay_secs: 2,
            enabled_patterns: PatternSet::all(),
            notifications_enabled: true,
        }
    }
}

/// Source of settings snapshots.
pub trait SettingsProvider {
    /// Read the current settings.
    fn snapshot(&self) -> SettingsSnapshot;
}

/// Settings shared between the monitor and whoever edits them.
///
/// Clones share the same underlying value. Writers should notify the
/// monitor (see [`crate::runtime::MonitorHandle::settings_changed`]) after
/// changing the `enabled` flag.
#[derive(Debug, Clone, Default)]
pub struct SharedSettings {
    inner: Arc<RwLock<SettingsSnapshot>>,
}

impl SharedSettings {
    /// Create shared settings from an initial snapshot.
    #[must_use]
    pub fn new(snapshot: SettingsSnapshot) -> Self {
        Self {
            inner: Arc::new(RwLock::new(snapshot)),
        }
    }

    /// Apply a change to the settings.
    pub fn update(&self, f: impl FnOnce(&mut SettingsSnapshot)) {
        let mut guard = self
            .inner
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        f(&mut guard);
    }

    /// Flip the `enabled` flag and return the new value.
    pub fn toggle_enabled(&self) -> bool {
        let mut enabled = false;
        self.update(|s| {
            s.enabled = !s.enabled;
            enabled = s.enabled;
        });
        enabled
    }
}

impl SettingsProvider for SharedSettings {
    fn snapshot(&self) -> SettingsSnapshot {
        self.inner
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}
