//! Core error types

use thiserror::Error;

/// Result type alias for keyroute operations
pub type RouteResult<T> = Result<T, RouteError>;

/// Main error type for the routing engine
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    /// Sourcing produced no candidate and no fallback secret is configured
    #[error("No credentials available")]
    NoCredentialsAvailable,

    /// Every (credential, model) pair was attempted without success
    #[error("All {attempts} generation attempts failed; last error: {last_error}")]
    AggregateFailure { attempts: usize, last_error: String },

    /// Credential store errors
    #[error("Storage error: {message}")]
    Storage {
        message: String,
        context: Option<String>,
    },

    /// Configuration related errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        context: Option<String>,
    },

    /// Invalid input errors
    #[error("Invalid input: {message}")]
    InvalidInput {
        message: String,
        field: Option<String>,
    },

    /// Resource not found
    #[error("Not found: {message}")]
    NotFound { message: String },
}

impl RouteError {
    /// Short machine-readable code for the error
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NoCredentialsAvailable => "NO_CREDENTIALS",
            Self::AggregateFailure { .. } => "AGGREGATE_FAILURE",
            Self::Storage { .. } => "STORAGE_ERROR",
            Self::Config { .. } => "CONFIG_ERROR",
            Self::InvalidInput { .. } => "INVALID_INPUT",
            Self::NotFound { .. } => "NOT_FOUND",
        }
    }
}
