//! Locksmith Core - Live Analysis Pipeline
//!
//! This crate provides the part of Locksmith with real ordering concerns:
//! - [`LiveOrchestrator`]: debounced, cancellation-safe requests against
//!   the analysis service, with stale responses discarded by generation
//! - [`resolver`]: pure mapping from a service payload to display metrics
//! - [`client`]: the analysis service boundary and its HTTP implementation
//!
//! How strength is actually computed is the service's business; nothing
//! here estimates entropy or checks breaches.

#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod constants;
pub mod models;
pub mod orchestrator;
pub mod resolver;

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub use client::{
    AnalysisError, AnalysisOutcome, AnalysisService, HttpAnalysisClient,
    CONNECTIVITY_ERROR_MESSAGE,
};
pub use constants::{EntropyThresholds, Palette, TimingDefaults};
pub use models::{AnalysisResult, AnalysisSnapshot, AnalysisStatus, CharClass, Verdict};
pub use orchestrator::LiveOrchestrator;
pub use resolver::{ColorToken, DerivedMetrics, RiskBand};

/// Result type used throughout Locksmith core
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Locksmith core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Utility error
    #[error("Utility error: {0}")]
    Util(#[from] locksmith_utils::UtilError),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// File picked up from the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "locksmith.toml";

/// Analysis service connection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Full URL of the analyze endpoint
    pub endpoint: String,
    /// Per-request timeout; `0` or `None` waits for the transport to give up
    pub request_timeout_secs: Option<u64>,
    pub user_agent: String,
}

impl ServiceConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:5000/analyze".to_string(),
            request_timeout_secs: Some(TimingDefaults::REQUEST_TIMEOUT_SECS),
            user_agent: format!("locksmith/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Debounce settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// Quiescence window before a request fires (milliseconds)
    pub debounce_ms: u64,
}

impl OrchestratorConfig {
    pub const fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            debounce_ms: TimingDefaults::DEBOUNCE_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// debug, info, warning, error or critical
    pub level: String,
    /// Log file; the terminal front end needs one to keep logs off screen
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

/// Global configuration for Locksmith
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocksmithConfig {
    pub service: ServiceConfig,
    pub orchestrator: OrchestratorConfig,
    pub logging: LoggingConfig,
}

impl LocksmithConfig {
    /// Load configuration layered over the defaults.
    ///
    /// An explicit path must exist; without one, [`DEFAULT_CONFIG_FILE`] in
    /// the working directory is used if present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let builder = locksmith_utils::ConfigBuilder::<Self>::new();
        let builder = match path {
            Some(path) => builder.load_file(path)?,
            None => builder.load_optional_file(Path::new(DEFAULT_CONFIG_FILE))?,
        };
        let config = builder.build();
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let endpoint = self.service.endpoint.as_str();
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(Error::Config(format!(
                "service.endpoint must be an http(s) URL, got '{endpoint}'"
            )));
        }
        self.log_level()?;
        Ok(())
    }

    pub fn log_level(&self) -> Result<locksmith_utils::LogLevel> {
        Ok(self.logging.level.parse()?)
    }
}
