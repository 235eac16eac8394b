//! Analysis service payload
//!
//! The service owns every number in here; the client only checks the two
//! invariants it relies on (a verdict is present and entropy is a
//! non-negative number) and passes everything else through for display.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Overall strength verdict assigned by the analysis service.
///
/// Ordered from weakest to strongest. The reference service spells the
/// outer tiers with a space (`"VERY WEAK"`), so both spellings are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Verdict {
    #[serde(rename = "VERY_WEAK", alias = "VERY WEAK")]
    VeryWeak,
    #[serde(rename = "WEAK")]
    Weak,
    #[serde(rename = "MODERATE")]
    Moderate,
    #[serde(rename = "STRONG")]
    Strong,
    #[serde(rename = "VERY_STRONG", alias = "VERY STRONG")]
    VeryStrong,
}

impl Verdict {
    /// Every verdict, weakest first
    pub const ALL: [Self; 5] = [
        Self::VeryWeak,
        Self::Weak,
        Self::Moderate,
        Self::Strong,
        Self::VeryStrong,
    ];

    /// Canonical wire tag
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::VeryWeak => "VERY_WEAK",
            Self::Weak => "WEAK",
            Self::Moderate => "MODERATE",
            Self::Strong => "STRONG",
            Self::VeryStrong => "VERY_STRONG",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Character classes the service reports as present
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CharClass {
    Lower,
    Upper,
    Digit,
    Symbol,
}

impl CharClass {
    /// Display order used by the character types list
    pub const ALL: [Self; 4] = [Self::Lower, Self::Upper, Self::Digit, Self::Symbol];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Lower => "Lowercase",
            Self::Upper => "Uppercase",
            Self::Digit => "Numbers",
            Self::Symbol => "Symbols",
        }
    }
}

/// One strength assessment as returned by the analysis service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Estimated entropy in bits
    pub entropy: f64,
    /// Overall verdict
    pub verdict: Verdict,
    #[serde(default)]
    pub length: usize,
    /// Human readable crack time estimate, e.g. "3 seconds" or "> centuries"
    #[serde(default)]
    pub crack_time: String,
    #[serde(default)]
    pub breached: bool,
    #[serde(default)]
    pub char_sets: Vec<CharClass>,
    #[serde(default)]
    pub penalties: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub has_leetspeak: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique_char_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_repetition: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_sequences: Option<bool>,
}

impl AnalysisResult {
    /// Minimal result with empty pass-through fields
    pub fn new(entropy: f64, verdict: Verdict, crack_time: impl Into<String>) -> Self {
        Self {
            entropy,
            verdict,
            length: 0,
            crack_time: crack_time.into(),
            breached: false,
            char_sets: Vec::new(),
            penalties: Vec::new(),
            recommendations: Vec::new(),
            has_leetspeak: false,
            unique_char_count: None,
            has_repetition: None,
            has_sequences: None,
        }
    }

    /// Check the payload invariants the client depends on
    pub fn validate(&self) -> Result<(), String> {
        if !self.entropy.is_finite() {
            return Err(format!("entropy is not a finite number: {}", self.entropy));
        }
        if self.entropy < 0.0 {
            return Err(format!("entropy must be non-negative, got {}", self.entropy));
        }
        Ok(())
    }

    pub fn has_char_class(&self, class: CharClass) -> bool {
        self.char_sets.contains(&class)
    }
}
