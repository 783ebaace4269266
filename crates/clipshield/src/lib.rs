//! `clipshield` - Keep sensitive numbers off the clipboard
//!
//! This library watches the system clipboard for payment card numbers, US
//! Social Security Numbers and Canadian Social Insurance Numbers. Matching
//! content is re-tagged so clipboard history tools skip it, and cleared
//! after a countdown that a paste shortens.
//!
//! The [`monitor::Monitor`] state machine talks to the outside world only
//! through the collaborator traits in [`gateway`], [`scheduler`], [`notify`],
//! [`paste`] and [`settings`]; [`runtime::run`] drives it from a tokio event
//! loop.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod detection;
pub mod error;
pub mod gateway;
pub mod logging;
pub mod monitor;
pub mod notify;
pub mod paste;
#[cfg(any(target_os = "linux", target_os = "macos"))]
pub mod platform;
pub mod runtime;
pub mod scan;
pub mod scheduler;
pub mod settings;

#[cfg(test)]
pub(crate) mod testing;

pub use config::Config;
pub use detection::{detect, Detection, PatternSet, PatternType};
pub use error::{Error, Result};
pub use logging::init_logging;
pub use monitor::{Monitor, MonitorOptions, MonitorState, MonitorStatus};
pub use scan::{scan, ScanOutcome};
pub use settings::{SettingsProvider, SettingsSnapshot, SharedSettings};
