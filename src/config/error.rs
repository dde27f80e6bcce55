//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid AI request timeout")]
    InvalidTimeout,

    #[error("Invalid AI base URL")]
    InvalidBaseUrl,

    #[error("AI max_tokens must be positive")]
    InvalidMaxTokens,

    #[error("Retry count exceeds maximum allowed (10)")]
    TooManyRetries,

    #[error("Minimum response length must be between 1 and 1000")]
    InvalidMinResponseLength,

    #[error("Data directory must not be empty")]
    EmptyDataDir,
}
