//! Thresholds, palette and timing constants used by the live analysis pipeline

pub mod strength_thresholds;

pub use strength_thresholds::{EntropyThresholds, Palette, TimingDefaults};
