//! Derived metrics resolver
//!
//! Pure functions from an [`AnalysisResult`] (or its absence) to the values
//! the presentation layer draws: normalized score, verdict label and color,
//! input border risk band and the fast-crack flag. Nothing here holds state.

use serde::Serialize;

use crate::constants::{EntropyThresholds, Palette};
use crate::models::{AnalysisResult, CharClass, Verdict};

/// Severity tier used to color verdict-driven text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorToken {
    Alert,
    Caution,
    Neutral,
}

impl ColorToken {
    pub const fn hex(self) -> &'static str {
        match self {
            Self::Alert => Palette::RED,
            Self::Caution => Palette::AMBER,
            Self::Neutral => Palette::TEXT,
        }
    }
}

/// Entropy band driving the input border color
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskBand {
    Critical,
    Low,
    Medium,
    Strong,
}

impl RiskBand {
    pub const fn hex(self) -> &'static str {
        match self {
            Self::Critical => Palette::BAND_CRITICAL,
            Self::Low => Palette::BAND_LOW,
            Self::Medium => Palette::BAND_MEDIUM,
            Self::Strong => Palette::BAND_STRONG,
        }
    }

    /// Border color for an optional band; no result means the neutral border
    pub fn border_hex(band: Option<Self>) -> &'static str {
        band.map_or(Palette::BORDER, Self::hex)
    }
}

/// Normalize entropy to 0..=100 against the 128-bit ceiling
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn score(entropy: f64) -> u8 {
    let scaled = (entropy / EntropyThresholds::REFERENCE_CEILING_BITS * 100.0).round();
    // entropy is validated non-negative before it gets here
    scaled.clamp(0.0, f64::from(EntropyThresholds::MAX_SCORE)) as u8
}

pub const fn verdict_color(verdict: Option<Verdict>) -> ColorToken {
    match verdict {
        Some(Verdict::VeryWeak | Verdict::Weak) => ColorToken::Alert,
        Some(Verdict::Moderate) => ColorToken::Caution,
        Some(Verdict::Strong | Verdict::VeryStrong) | None => ColorToken::Neutral,
    }
}

pub fn risk_band(entropy: f64) -> RiskBand {
    if entropy < EntropyThresholds::CRITICAL_BELOW {
        RiskBand::Critical
    } else if entropy < EntropyThresholds::LOW_BELOW {
        RiskBand::Low
    } else if entropy < EntropyThresholds::MEDIUM_BELOW {
        RiskBand::Medium
    } else {
        RiskBand::Strong
    }
}

/// Sentence-cased verdict, empty when there is no result yet
pub const fn verdict_label(verdict: Option<Verdict>) -> &'static str {
    match verdict {
        Some(Verdict::VeryWeak) => "Very weak",
        Some(Verdict::Weak) => "Weak",
        Some(Verdict::Moderate) => "Moderate",
        Some(Verdict::Strong) => "Strong",
        Some(Verdict::VeryStrong) => "Very strong",
        None => "",
    }
}

/// Whether a crack time estimate is short enough to flag.
///
/// Matches the service's phrasing only: seconds, minutes, hours, or a
/// leading "<". Anything unrecognized is treated as slow.
pub fn is_fast_crack(crack_time: &str) -> bool {
    let text = crack_time.trim();
    if text.starts_with('<') {
        return true;
    }
    let lowered = text.to_lowercase();
    ["second", "minute", "hour"]
        .iter()
        .any(|unit| lowered.contains(unit))
}

/// Display-ready values derived from one result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DerivedMetrics {
    pub score: u8,
    pub verdict_label: &'static str,
    pub verdict_color: ColorToken,
    /// `None` when there is no result, which draws the default border
    pub risk_band: Option<RiskBand>,
    pub fast_crack: bool,
}

impl DerivedMetrics {
    pub fn resolve(result: Option<&AnalysisResult>) -> Self {
        let verdict = result.map(|r| r.verdict);
        Self {
            score: result.map_or(0, |r| score(r.entropy)),
            verdict_label: verdict_label(verdict),
            verdict_color: verdict_color(verdict),
            risk_band: result.map(|r| risk_band(r.entropy)),
            fast_crack: result.is_some_and(|r| is_fast_crack(&r.crack_time)),
        }
    }

    pub fn border_hex(&self) -> &'static str {
        RiskBand::border_hex(self.risk_band)
    }
}

/// Issues list: service penalties, then leetspeak and breach findings
pub fn issues(result: &AnalysisResult) -> Vec<String> {
    let mut issues = result.penalties.clone();
    if result.has_leetspeak {
        issues.push("Predictable leetspeak".to_string());
    }
    if result.breached {
        issues.push("Found in data breach".to_string());
    }
    issues
}

/// Character type rows in display order with their presence flag
pub fn char_class_rows(result: &AnalysisResult) -> Vec<(CharClass, bool)> {
    CharClass::ALL
        .iter()
        .map(|class| (*class, result.has_char_class(*class)))
        .collect()
}

/// Breach card value and subtitle
pub const fn breach_summary(breached: bool) -> (&'static str, &'static str) {
    if breached {
        ("Found", "In known breach DB")
    } else {
        ("Clean", "Not in breach DB")
    }
}
