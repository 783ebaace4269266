//! Human-readable and JSON output for CLI commands.
//!
//! Matched text is only ever shown masked.

use std::fmt::Write;
use std::io::Read;

use serde::Serialize;

use crate::config::Config;
use crate::detection::{Detection, PatternType};
use crate::error::Result;

/// A detection with its match masked, for output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MaskedDetection {
    /// The kind of data that matched.
    #[serde(rename = "type")]
    pub pattern_type: PatternType,
    /// Human-readable label of the pattern.
    pub label: &'static str,
    /// The match with all but the last four digits hidden.
    #[serde(rename = "match")]
    pub masked: String,
}

impl From<&Detection> for MaskedDetection {
    fn from(detection: &Detection) -> Self {
        Self {
            pattern_type: detection.pattern_type,
            label: detection.label,
            masked: detection.masked(),
        }
    }
}

/// The text to check: `text` if given, otherwise everything on `input`.
///
/// # Errors
///
/// Returns [`Error::Io`](crate::Error::Io) if `input` cannot be read or is
/// not UTF-8.
pub fn read_input(text: Option<String>, mut input: impl Read) -> Result<String> {
    if let Some(text) = text {
        return Ok(text);
    }
    let mut buf = String::new();
    input.read_to_string(&mut buf)?;
    Ok(buf)
}

/// Pretty-printed JSON for `--json` output.
///
/// # Errors
///
/// Returns [`Error::Json`](crate::Error::Json) if `value` has no JSON form.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Render detections as one line per match.
#[must_use]
pub fn render_detections(detections: &[Detection]) -> String {
    if detections.is_empty() {
        return "No sensitive data found".to_string();
    }

    let width = detections
        .iter()
        .map(|d| d.label.len())
        .max()
        .unwrap_or_default();
    let mut out = String::new();
    for detection in detections {
        let _ = writeln!(
            out,
            "{:<width$}  {}",
            detection.label,
            detection.masked()
        );
    }
    out.truncate(out.trim_end().len());
    out
}

/// Render the configuration as a readable summary.
#[must_use]
pub fn render_config(config: &Config) -> String {
    let on_off = |enabled: bool| if enabled { "on" } else { "off" };
    let mut out = String::new();

    let _ = writeln!(out, "Current Configuration");
    let _ = writeln!(out, "=====================");
    let _ = writeln!(out);
    let _ = writeln!(out, "[Monitor]");
    let _ = writeln!(out, "  Enabled:            {}", on_off(config.monitor.enabled));
    let _ = writeln!(
        out,
        "  Clear delay:        {}s",
        config.monitor.clear_delay_secs
    );
    let _ = writeln!(
        out,
        "  Post-paste delay:   {}s",
        config.monitor.post_paste_delay_secs
    );
    let _ = writeln!(
        out,
        "  Poll interval:      {}ms",
        config.monitor.poll_interval_ms
    );
    let _ = writeln!(out, "  Debounce:           {}ms", config.monitor.debounce_ms);
    let _ = writeln!(
        out,
        "  Paste detection:    {}",
        on_off(config.monitor.paste_detection)
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "[Patterns]");
    let _ = writeln!(
        out,
        "  Credit card:        {}",
        on_off(config.patterns.credit_card)
    );
    let _ = writeln!(out, "  SSN (US):           {}", on_off(config.patterns.ssn));
    let _ = writeln!(out, "  SIN (CA):           {}", on_off(config.patterns.sin));
    let _ = writeln!(out);
    let _ = writeln!(out, "[Notifications]");
    let _ = write!(
        out,
        "  Enabled:            {}",
        on_off(config.notifications.enabled)
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::{detect, PatternSet};

    #[test]
    fn test_render_no_detections() {
        assert_eq!(render_detections(&[]), "No sensitive data found");
    }

    #[test]
    fn test_render_detections_masks_matches() {
        let detections = detect("4111 1111 1111 1111 and 123-45-6789", &PatternSet::all());
        let out = render_detections(&detections);

        assert!(out.contains("Credit Card  •••• •••• •••• 1111"));
        assert!(out.contains("SSN (US)     •••-••-6789"));
        assert!(!out.contains("4111"));
        assert!(!out.ends_with('\n'));
    }

    #[test]
    fn test_masked_detection_serialize() {
        let detections = detect("046-454-286", &PatternSet::all());
        let masked: Vec<MaskedDetection> = detections.iter().map(MaskedDetection::from).collect();
        let json = serde_json::to_value(&masked).unwrap();

        assert_eq!(json[0]["type"], "sin");
        assert_eq!(json[0]["label"], "SIN (CA)");
        assert_eq!(json[0]["match"], "•••-••4-286");
    }

    #[test]
    fn test_read_input_prefers_argument() {
        let text = read_input(Some("123-45-6789".to_string()), &b"ignored"[..]).unwrap();
        assert_eq!(text, "123-45-6789");
    }

    #[test]
    fn test_read_input_from_reader() {
        let text = read_input(None, &b"card 4111111111111111\n"[..]).unwrap();
        assert_eq!(text, "card 4111111111111111\n");
    }

    #[test]
    fn test_read_input_invalid_utf8() {
        let err = read_input(None, &b"f\xff\xfe"[..]).unwrap_err();
        assert!(matches!(err, crate::Error::Io(_)));
    }

    #[test]
    fn test_to_json() {
        let json = to_json(&crate::ScanOutcome::Empty).unwrap();
        assert!(json.contains("\"outcome\": \"empty\""));
    }

    #[test]
    fn test_to_json_rejects_non_string_keys() {
        let mut map = std::collections::BTreeMap::new();
        map.insert((1, 2), "pair");
        let err = to_json(&map).unwrap_err();
        assert!(matches!(err, crate::Error::Json(_)));
        assert!(err.to_string().starts_with("JSON error"));
    }

    #[test]
    fn test_render_config() {
        let mut config = Config::default();
        config.patterns.sin = false;
        let out = render_config(&config);

        assert!(out.contains("Clear delay:        30s"));
        assert!(out.contains("Post-paste delay:   2s"));
        assert!(out.contains("SIN (CA):           off"));
        assert!(out.contains("Credit card:        on"));
    }
}
