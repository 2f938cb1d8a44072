//! Common error types for services

use thiserror::Error;

/// Service error types
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Configuration could not be loaded or deserialized
    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    /// Configuration loaded but failed validation
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Logging could not be initialised
    #[error("Telemetry error: {0}")]
    Telemetry(String),
}
