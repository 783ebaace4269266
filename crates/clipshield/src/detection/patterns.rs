//! Built-in detection patterns.
//!
//! This module defines the closed set of sensitive-data patterns that the
//! detection engine knows about, along with the Luhn checksum used to
//! validate payment card candidates.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// The kind of sensitive data a pattern recognises.
///
/// Variants are declared in registration order; detection results are
/// produced in this order regardless of where matches sit in the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternType {
    /// Payment card numbers (13-19 digits, Luhn-valid).
    CreditCard,
    /// US Social Security Numbers (`DDD-DD-DDDD`).
    Ssn,
    /// Canadian Social Insurance Numbers (`DDD DDD DDD`).
    Sin,
}

impl PatternType {
    /// All pattern types in registration order.
    pub const ALL: [PatternType; 3] = [Self::CreditCard, Self::Ssn, Self::Sin];

    /// Human-readable label shown to the user.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::CreditCard => "Credit Card",
            Self::Ssn => "SSN (US)",
            Self::Sin => "SIN (CA)",
        }
    }
}

impl std::fmt::Display for PatternType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CreditCard => write!(f, "credit_card"),
            Self::Ssn => write!(f, "ssn"),
            Self::Sin => write!(f, "sin"),
        }
    }
}

/// A set of enabled pattern types.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatternSet(BTreeSet<PatternType>);

impl PatternSet {
    /// A set with every built-in pattern enabled.
    #[must_use]
    pub fn all() -> Self {
        PatternType::ALL.into_iter().collect()
    }

    /// Check whether a pattern type is enabled.
    #[must_use]
    pub fn contains(&self, pattern: PatternType) -> bool {
        self.0.contains(&pattern)
    }

    /// Check whether no pattern is enabled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<PatternType> for PatternSet {
    fn from_iter<I: IntoIterator<Item = PatternType>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A compiled detection pattern with an optional validator.
#[derive(Debug)]
pub struct DetectionPattern {
    /// Which kind of data this pattern detects.
    pub pattern_type: PatternType,

    regex: Regex,
    validate: Option<fn(&str) -> bool>,
}

impl DetectionPattern {
    /// Create a new detection pattern.
    ///
    /// # Panics
    ///
    /// Panics if the regex pattern is invalid. Built-in patterns are fixed,
    /// so this can only happen through a programming error.
    #[must_use]
    pub fn new(
        pattern_type: PatternType,
        pattern: &str,
        validate: Option<fn(&str) -> bool>,
    ) -> Self {
        Self {
            pattern_type,
            regex: Regex::new(pattern).expect("Invalid regex pattern"),
            validate,
        }
    }

    /// Find every non-overlapping candidate that also passes the validator.
    pub fn find_valid<'a>(&'a self, content: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.regex
            .find_iter(content)
            .map(|m| m.as_str())
            .filter(move |candidate| self.validate.map_or(true, |validate| validate(candidate)))
    }
}

static BUILTIN_PATTERNS: LazyLock<Vec<DetectionPattern>> = LazyLock::new(|| {
    vec![
        DetectionPattern::new(
            PatternType::CreditCard,
            r"\b(?:[0-9][ -]*?){13,19}\b",
            Some(validate_card_number),
        ),
        DetectionPattern::new(PatternType::Ssn, r"\b[0-9]{3}-[0-9]{2}-[0-9]{4}\b", None),
        DetectionPattern::new(
            PatternType::Sin,
            r"\b[0-9]{3}[ -][0-9]{3}[ -][0-9]{3}\b",
            None,
        ),
    ]
});

/// Get the built-in patterns in registration order.
#[must_use]
pub fn builtin_patterns() -> &'static [DetectionPattern] {
    &BUILTIN_PATTERNS
}

/// Validate the Luhn (mod 10) check digit of a string of ASCII digits.
///
/// Any non-digit character makes the string invalid.
#[must_use]
pub fn luhn(digits: &str) -> bool {
    let mut sum = 0u32;
    for (i, c) in digits.chars().rev().enumerate() {
        let Some(mut n) = c.to_digit(10) else {
            return false;
        };
        if i % 2 == 1 {
            n *= 2;
            if n > 9 {
                n -= 9;
            }
        }
        sum += n;
    }
    sum % 10 == 0
}

fn validate_card_number(candidate: &str) -> bool {
    let digits: String = candidate
        .chars()
        .filter(|c| !matches!(c, ' ' | '-'))
        .collect();
    (13..=19).contains(&digits.len()) && luhn(&digits)
}
