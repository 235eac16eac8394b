//! Entropy thresholds, display palette and timing defaults
//!
//! The score is a linear normalization against a fixed 128-bit ceiling, not
//! a percentile. The risk bands are independent of the service's verdict
//! tiers and the two may disagree for the same payload.

use serde::{Deserialize, Serialize};

/// Entropy boundaries in bits
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EntropyThresholds;

impl EntropyThresholds {
    /// Entropy that maps to a score of 100
    pub const REFERENCE_CEILING_BITS: f64 = 128.0;

    /// Below this the input border is critical
    pub const CRITICAL_BELOW: f64 = 30.0;
    /// Below this (and at least critical) the border is low
    pub const LOW_BELOW: f64 = 60.0;
    /// Below this (and at least low) the border is medium; at or above, strong
    pub const MEDIUM_BELOW: f64 = 90.0;

    /// Upper bound of the normalized score
    pub const MAX_SCORE: u8 = 100;
}

/// Hex colors the display tokens resolve to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette;

impl Palette {
    pub const BACKGROUND: &'static str = "#fafaff";
    pub const BORDER: &'static str = "#daddd8";
    pub const MUTED: &'static str = "#9a9d9a";
    pub const TEXT: &'static str = "#1c1c1c";
    pub const RED: &'static str = "#ef233c";
    pub const AMBER: &'static str = "#b8860b";

    pub const BAND_CRITICAL: &'static str = Self::RED;
    pub const BAND_LOW: &'static str = "#ff8c00";
    pub const BAND_MEDIUM: &'static str = "#ffd700";
    pub const BAND_STRONG: &'static str = "#22c55e";

    /// Parse `#rrggbb` into its components
    pub fn rgb(hex: &str) -> Option<(u8, u8, u8)> {
        let digits = hex.strip_prefix('#')?;
        if digits.len() != 6 {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| {
            digits.get(range).and_then(|s| u8::from_str_radix(s, 16).ok())
        };
        Some((channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

/// Timing defaults for the orchestrator and service client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingDefaults;

impl TimingDefaults {
    /// Quiescence window before an analysis request fires
    pub const DEBOUNCE_MS: u64 = 400;
    /// Per-request timeout for the analysis service
    pub const REQUEST_TIMEOUT_SECS: u64 = 10;
}
