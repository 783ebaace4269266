//! One-shot clipboard scan.

use std::fmt;

use serde::Serialize;
use tracing::info;

use crate::detection::{detect, distinct_labels, PatternSet};
use crate::error::Result;
use crate::gateway::ClipboardGateway;

/// Result of [`scan`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ScanOutcome {
    /// The clipboard holds no text.
    Empty,
    /// The clipboard text contains nothing sensitive.
    Clean,
    /// Sensitive data was found and, unless this was a dry run, cleared.
    Cleared {
        /// Distinct labels of what was found, in detection order.
        labels: Vec<&'static str>,
        /// Whether the clipboard was left untouched.
        dry_run: bool,
    },
}

impl fmt::Display for ScanOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "Clipboard is empty"),
            Self::Clean => write!(f, "Clipboard is clean"),
            Self::Cleared {
                labels,
                dry_run: false,
            } => write!(f, "Cleared {} from clipboard", labels.join(", ")),
            Self::Cleared {
                labels,
                dry_run: true,
            } => write!(f, "Found {} on clipboard (not cleared)", labels.join(", ")),
        }
    }
}

/// Check the clipboard once and clear it if it holds sensitive data.
///
/// # Errors
///
/// Returns an error if the clipboard cannot be read or cleared.
pub fn scan(
    gateway: &dyn ClipboardGateway,
    patterns: &PatternSet,
    dry_run: bool,
) -> Result<ScanOutcome> {
    let Some(text) = gateway.read_text()?.filter(|text| !text.is_empty()) else {
        return Ok(ScanOutcome::Empty);
    };

    let detections = detect(&text, patterns);
    if detections.is_empty() {
        return Ok(ScanOutcome::Clean);
    }

    let labels = distinct_labels(&detections);
    if !dry_run {
        gateway.clear()?;
    }
    info!(
        found = detections.len(),
        dry_run,
        "Sensitive data found during scan"
    );
    Ok(ScanOutcome::Cleared { labels, dry_run })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::PatternType;
    use crate::testing::FakeClipboard;

    #[test]
    fn test_scan_empty_clipboard() {
        let clipboard = FakeClipboard::default();
        let outcome = scan(&clipboard, &PatternSet::all(), false).unwrap();
        assert_eq!(outcome, ScanOutcome::Empty);
        assert_eq!(outcome.to_string(), "Clipboard is empty");
    }

    #[test]
    fn test_scan_empty_string_is_empty() {
        let clipboard = FakeClipboard::default();
        clipboard.copy("");
        let outcome = scan(&clipboard, &PatternSet::all(), false).unwrap();
        assert_eq!(outcome, ScanOutcome::Empty);
    }

    #[test]
    fn test_scan_clean_clipboard() {
        let clipboard = FakeClipboard::default();
        clipboard.copy("meeting notes");
        let outcome = scan(&clipboard, &PatternSet::all(), false).unwrap();
        assert_eq!(outcome, ScanOutcome::Clean);
        assert_eq!(outcome.to_string(), "Clipboard is clean");
        assert_eq!(clipboard.clears(), 0);
    }

    #[test]
    fn test_scan_clears_sensitive_data() {
        let clipboard = FakeClipboard::default();
        clipboard.copy("card 4111 1111 1111 1111, ssn 123-45-6789 and 987-65-4321");
        let outcome = scan(&clipboard, &PatternSet::all(), false).unwrap();

        assert_eq!(
            outcome,
            ScanOutcome::Cleared {
                labels: vec!["Credit Card", "SSN (US)"],
                dry_run: false,
            }
        );
        assert_eq!(
            outcome.to_string(),
            "Cleared Credit Card, SSN (US) from clipboard"
        );
        assert_eq!(clipboard.clears(), 1);
        assert_eq!(clipboard.content(), None);
    }

    #[test]
    fn test_scan_dry_run_leaves_clipboard() {
        let clipboard = FakeClipboard::default();
        clipboard.copy("046 454 286");
        let outcome = scan(&clipboard, &PatternSet::all(), true).unwrap();

        assert_eq!(
            outcome,
            ScanOutcome::Cleared {
                labels: vec!["SIN (CA)"],
                dry_run: true,
            }
        );
        assert!(outcome.to_string().contains("not cleared"));
        assert_eq!(clipboard.clears(), 0);
        assert_eq!(clipboard.content().as_deref(), Some("046 454 286"));
    }

    #[test]
    fn test_scan_respects_enabled_patterns() {
        let clipboard = FakeClipboard::default();
        clipboard.copy("123-45-6789");
        let patterns: PatternSet = [PatternType::CreditCard].into_iter().collect();
        let outcome = scan(&clipboard, &patterns, false).unwrap();
        assert_eq!(outcome, ScanOutcome::Clean);
    }

    #[test]
    fn test_scan_read_error_propagates() {
        let clipboard = FakeClipboard::default();
        clipboard.set_fail_reads(true);
        assert!(scan(&clipboard, &PatternSet::all(), false).is_err());
    }

    #[test]
    fn test_scan_clear_error_propagates() {
        let clipboard = FakeClipboard::default();
        clipboard.copy("4111111111111111");
        clipboard.set_fail_writes(true);
        assert!(scan(&clipboard, &PatternSet::all(), false).is_err());
    }

    #[test]
    fn test_scan_outcome_serialize() {
        let json = serde_json::to_value(ScanOutcome::Cleared {
            labels: vec!["SSN (US)"],
            dry_run: false,
        })
        .unwrap();
        assert_eq!(json["outcome"], "cleared");
        assert_eq!(json["labels"][0], "SSN (US)");

        let json = serde_json::to_value(ScanOutcome::Clean).unwrap();
        assert_eq!(json["outcome"], "clean");
    }
}
