use chrono::{DateTime, Utc};
use serde::Serialize;

use super::AnalysisResult;

/// Orchestrator lifecycle state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "message", rename_all = "snake_case")]
pub enum AnalysisStatus {
    /// No input, nothing scheduled
    Idle,
    /// Input changed, waiting for the quiescence window to elapse
    Debouncing,
    /// Request in flight for the latest generation
    Loading,
    /// Latest generation answered; the payload is in [`AnalysisSnapshot::result`]
    Success,
    /// Latest generation failed; carries the user-facing message
    Error(String),
}

impl AnalysisStatus {
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Error(message) => Some(message),
            _ => None,
        }
    }
}

/// What the presentation layer sees.
///
/// `result` is the latest accepted payload. It survives `Debouncing` and
/// `Loading` so the display does not blank out between keystrokes, is always
/// present in `Success`, and is always absent in `Idle` and `Error`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisSnapshot {
    pub generation: u64,
    pub status: AnalysisStatus,
    pub result: Option<AnalysisResult>,
    pub updated_at: DateTime<Utc>,
}

impl AnalysisSnapshot {
    pub fn idle(generation: u64) -> Self {
        Self {
            generation,
            status: AnalysisStatus::Idle,
            result: None,
            updated_at: Utc::now(),
        }
    }
}
