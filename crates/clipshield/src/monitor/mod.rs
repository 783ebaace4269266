//! Clipboard monitoring.
//!
//! The [`Monitor`] watches the clipboard change counter, conceals content
//! that matches an enabled detection pattern, and clears it once a countdown
//! expires. A paste observed during the countdown shortens it.
//!
//! ```text
//! Idle ── sensitive copy ──▶ Counting ── countdown ends ──▶ Cleared
//!  ▲                          │    ▲                           │
//!  └──────── clean copy ──────┘    └────── sensitive copy ─────┘
//! ```

mod machine;
mod state;

pub use machine::{Monitor, MonitorOptions};
pub use state::{MonitorState, MonitorStatus};
