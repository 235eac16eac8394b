//! Data models for the live analysis pipeline
//!
//! `analysis_result` mirrors the analysis service payload; `snapshot` is what
//! the orchestrator publishes to the presentation layer.

pub mod analysis_result;
pub mod snapshot;

pub use analysis_result::{AnalysisResult, CharClass, Verdict};
pub use snapshot::{AnalysisSnapshot, AnalysisStatus};
