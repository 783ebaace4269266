//! Sensitive data detection.
//!
//! This module recognises a small, fixed set of personal data formats in
//! clipboard text:
//!
//! - **Credit cards**: 13-19 digit runs (optionally grouped with spaces or
//!   dashes) that pass the Luhn checksum.
//!
//! - **SSN (US)**: `DDD-DD-DDDD`.
//!
//! - **SIN (CA)**: three groups of three digits separated by spaces or dashes.
//!
//! Detection is a pure function of the text and the enabled pattern set.
//!
//! # Example
//!
//! ```
//! use clipshield::detection::{detect, PatternSet};
//!
//! let detections = detect("card: 4111 1111 1111 1111", &PatternSet::all());
//! assert_eq!(detections[0].label, "Credit Card");
//! ```

mod engine;
mod patterns;

pub use engine::{detect, distinct_labels, Detection};
pub use patterns::{builtin_patterns, luhn, DetectionPattern, PatternSet, PatternType};
