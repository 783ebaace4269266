//! Observable monitor state.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// What the monitor is currently doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum MonitorState {
    /// Watching the clipboard, nothing flagged.
    #[default]
    Idle,

    /// Sensitive data is on the clipboard and will be cleared.
    Counting {
        /// Seconds until the clipboard is cleared.
        seconds_left: u32,
        /// Whether the countdown was shortened by a paste.
        accelerated: bool,
    },

    /// The clipboard was cleared and nothing new has been flagged since.
    Cleared,
}

impl MonitorState {
    /// Whether a countdown is in progress.
    #[must_use]
    pub fn is_counting(&self) -> bool {
        matches!(self, Self::Counting { .. })
    }

    /// Seconds remaining, if counting down.
    #[must_use]
    pub fn seconds_left(&self) -> Option<u32> {
        match self {
            Self::Counting { seconds_left, .. } => Some(*seconds_left),
            _ => None,
        }
    }
}

impl fmt::Display for MonitorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Counting {
                seconds_left,
                accelerated: false,
            } => write!(f, "clearing in {seconds_left}s"),
            Self::Counting {
                seconds_left,
                accelerated: true,
            } => write!(f, "clearing in {seconds_left}s (pasted)"),
            Self::Cleared => write!(f, "cleared"),
        }
    }
}

/// Snapshot of the monitor published after every transition.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct MonitorStatus {
    /// Current state.
    #[serde(flatten)]
    pub state: MonitorState,

    /// Whether monitoring is running.
    pub enabled: bool,

    /// Number of times the clipboard has been cleared.
    pub detection_count: u64,

    /// Label of the most recent primary detection.
    pub last_detection_label: Option<&'static str>,

    /// When the clipboard was last cleared.
    pub last_cleared_at: Option<DateTime<Utc>>,
}

impl fmt::Display for MonitorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.enabled {
            return write!(f, "paused ({} cleared)", self.detection_count);
        }
        write!(f, "{}", self.state)?;
        if let (MonitorState::Counting { .. }, Some(label)) =
            (self.state, self.last_detection_label)
        {
            write!(f, ": {label}")?;
        }
        write!(f, " ({} cleared)", self.detection_count)
    }
}
