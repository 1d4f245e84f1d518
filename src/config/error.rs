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

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid socket address: {0}")]
    InvalidSocketAddress(String),

    #[error("Invalid timeout for {0}")]
    InvalidTimeout(&'static str),

    #[error("Invalid URL for {0}: must start with http:// or https://")]
    InvalidUrl(&'static str),

    #[error("Temperature must be between 0.0 and 2.0")]
    InvalidTemperature,

    #[error("max_tool_rounds must be between 1 and {max}")]
    InvalidToolRounds { max: u32 },

    #[error("Default namespace must not be empty")]
    EmptyNamespace,

    #[error("TLS verification cannot be disabled in production")]
    InsecureTlsInProduction,

    #[error("At least one document file extension is required")]
    NoFileExtensions,
}
