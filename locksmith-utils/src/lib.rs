//! Locksmith Utilities
//!
//! Configuration file loading and logging initialization shared by the
//! core pipeline and the terminal front end.

#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

pub mod config;
pub mod logging;

pub use config::ConfigBuilder;
pub use logging::{get_logger, init_logging, LogLevel, Logger, LoggerConfig};

/// Result type used throughout the Locksmith utilities
pub type Result<T> = std::result::Result<T, UtilError>;

/// Error types for utility operations
#[derive(Debug, thiserror::Error)]
pub enum UtilError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Logging could not be initialized
    #[error("Logging error: {0}")]
    Logging(String),
}
