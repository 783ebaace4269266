//! Configuration management for clipshield.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::detection::{PatternSet, PatternType};
use crate::error::{Error, Result};
use crate::settings::SettingsSnapshot;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default configuration directory name.
const CONFIG_DIR_NAME: &str = "clipshield";

/// Prefix for environment variable overrides.
const ENV_PREFIX: &str = "CLIPSHIELD_";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `CLIPSHIELD_`, sections split on `__`,
///    e.g. `CLIPSHIELD_MONITOR__CLEAR_DELAY_SECS=10`)
/// 2. TOML config file at `~/.config/clipshield/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Monitor configuration.
    pub monitor: MonitorConfig,
    /// Which patterns to detect.
    pub patterns: PatternsConfig,
    /// Notification configuration.
    pub notifications: NotificationsConfig,
}

/// Monitor-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Whether monitoring is active at startup.
    pub enabled: bool,
    /// Seconds between detection and automatic clearing.
    pub clear_delay_secs: u32,
    /// Seconds left on the countdown once a paste is observed.
    pub post_paste_delay_secs: u32,
    /// Interval between clipboard polls in milliseconds.
    pub poll_interval_ms: u64,
    /// Window after our own clipboard writes during which changes are ignored.
    pub debounce_ms: u64,
    /// Listen for paste keystrokes to shorten the countdown.
    pub paste_detection: bool,
}

/// Pattern toggles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternsConfig {
    /// Detect payment card numbers.
    pub credit_card: bool,
    /// Detect US Social Security Numbers.
    pub ssn: bool,
    /// Detect Canadian Social Insurance Numbers.
    pub sin: bool,
}

/// Notification configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationsConfig {
    /// Show a desktop notification when the clipboard is cleared.
    pub enabled: bool,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            clear_delay_secs: 30,
            post_paste_delay_secs: 2,
            poll_interval_ms: 500,
            debounce_ms: 300,
            paste_detection: true,
        }
    }
}

impl Default for PatternsConfig {
    fn default() -> Self {
        Self {
            credit_card: true,
            ssn: true,
            sin: true,
        }
    }
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl PatternsConfig {
    /// The set of enabled pattern types.
    #[must_use]
    pub fn enabled(&self) -> PatternSet {
        [
            (PatternType::CreditCard, self.credit_card),
            (PatternType::Ssn, self.ssn),
            (PatternType::Sin, self.sin),
        ]
        .into_iter()
        .filter_map(|(pattern, on)| on.then_some(pattern))
        .collect()
    }
}

impl Config {
    /// Load configuration from `config_path`, or the default location.
    ///
    /// Configuration is loaded in this order (later sources override earlier):
    /// 1. Default values
    /// 2. TOML config file (if exists)
    /// 3. Environment variables (prefixed with `CLIPSHIELD_`)
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.monitor.clear_delay_secs == 0 {
            return Err(Error::ConfigValidation {
                message: "clear_delay_secs must be at least 1".to_string(),
            });
        }

        if self.monitor.post_paste_delay_secs == 0 {
            return Err(Error::ConfigValidation {
                message: "post_paste_delay_secs must be at least 1".to_string(),
            });
        }

        if self.monitor.poll_interval_ms == 0 {
            return Err(Error::ConfigValidation {
                message: "poll_interval_ms must be greater than 0".to_string(),
            });
        }

        Ok(())
    }

    /// Get the poll interval as a Duration.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.monitor.poll_interval_ms)
    }

    /// Get the self-write debounce window as a Duration.
    #[must_use]
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.monitor.debounce_ms)
    }

    /// The read-only view the monitor consumes.
    #[must_use]
    pub fn settings_snapshot(&self) -> SettingsSnapshot {
        SettingsSnapshot {
            enabled: self.monitor.enabled,
            clear_delay_secs: self.monitor.clear_delay_secs,
            post_paste_delay_secs: self.monitor.post_paste_delay_secs,
            enabled_patterns: self.patterns.enabled(),
            notifications_enabled: self.notifications.enabled,
        }
    }
}
