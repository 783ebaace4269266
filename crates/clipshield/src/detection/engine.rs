//! The detection engine.

use serde::Serialize;

use super::patterns::{builtin_patterns, PatternSet, PatternType};

/// A single piece of sensitive data found in a text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Detection {
    /// The kind of data that matched.
    #[serde(rename = "type")]
    pub pattern_type: PatternType,

    /// Human-readable label of the pattern.
    pub label: &'static str,

    /// The matched substring.
    #[serde(rename = "match")]
    pub matched: String,
}

impl Detection {
    fn new(pattern_type: PatternType, matched: &str) -> Self {
        Self {
            pattern_type,
            label: pattern_type.label(),
            matched: matched.to_string(),
        }
    }

    /// The matched text with every digit except the last four replaced by `•`.
    #[must_use]
    pub fn masked(&self) -> String {
        let total = self.matched.chars().filter(char::is_ascii_digit).count();
        let keep_from = total.saturating_sub(4);
        let mut seen = 0;
        self.matched
            .chars()
            .map(|c| {
                if c.is_ascii_digit() {
                    seen += 1;
                    if seen <= keep_from {
                        return '•';
                    }
                }
                c
            })
            .collect()
    }
}

/// Scan `text` for every enabled pattern.
///
/// Results are grouped by pattern in registration order (credit card, SSN,
/// SIN) and, within a pattern, ordered by position. The first element is
/// the primary detection callers display.
#[must_use]
pub fn detect(text: &str, enabled: &PatternSet) -> Vec<Detection> {
    builtin_patterns()
        .iter()
        .filter(|pattern| enabled.contains(pattern.pattern_type))
        .flat_map(|pattern| {
            pattern
                .find_valid(text)
                .map(move |matched| Detection::new(pattern.pattern_type, matched))
        })
        .collect()
}

/// The distinct labels of a detection list, in first-seen order.
#[must_use]
pub fn distinct_labels(detections: &[Detection]) -> Vec<&'static str> {
    let mut labels = Vec::new();
    for detection in detections {
        if !labels.contains(&detection.label) {
            labels.push(detection.label);
        }
    }
    labels
}
