//! Error types for securecheck.
//!
//! Every operation of the dashboard ends in one of these errors or succeeds.
//! Errors are terminal to the single operation that raised them; the handler
//! layer turns them into user-visible notices.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for securecheck operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Store Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database statement failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to create the directory holding the database.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Input Errors ===
    /// A form field was rejected before reaching the store.
    #[error("invalid {field}: {message}")]
    InvalidInput {
        /// Name of the offending field.
        field: &'static str,
        /// Why the value was rejected.
        message: String,
    },

    /// No catalog entry matches the requested analysis.
    #[error("unknown analysis: {0}")]
    UnknownAnalysis(String),

    // === Serialization Errors ===
    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for securecheck operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create an input validation error for `field`.
    #[must_use]
    pub fn invalid_input(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            message: message.into(),
        }
    }

    /// Create a configuration validation error.
    #[must_use]
    pub fn config_validation(message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            message: message.into(),
        }
    }

    /// Check if this error came from opening the store (connection failure).
    #[must_use]
    pub fn is_connection_error(&self) -> bool {
        matches!(self, Self::DatabaseOpen { .. } | Self::DirectoryCreate { .. })
    }

    /// Check if this error is an input rejection.
    #[must_use]
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::InvalidInput { .. } | Self::UnknownAnalysis(_))
    }
}
