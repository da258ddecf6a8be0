//! Error types for epiboard-core
//!
//! API failures keep their own closed taxonomy (`ApiError`); this type covers
//! the local concerns around it: configuration and durable state.

use epiboard_types::{ApiError, StorageError};
use std::path::PathBuf;
use thiserror::Error;

/// Core error type for epiboard operations
#[derive(Error, Debug)]
pub enum CoreError {
    // ===================
    // IO Errors
    // ===================
    #[error("Failed to read file: {path}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ===================
    // Parse Errors
    // ===================
    #[error("Failed to parse JSON in {path}")]
    JsonParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to parse config in {path}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    // ===================
    // Config Errors
    // ===================
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Could not determine a configuration directory")]
    ConfigDirNotFound,

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    // ===================
    // Session Errors
    // ===================
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Not logged in")]
    NotAuthenticated,

    // ===================
    // API Errors
    // ===================
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl CoreError {
    /// The underlying API error, if any
    pub fn as_api(&self) -> Option<&ApiError> {
        match self {
            CoreError::Api(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use epiboard_types::ApiErrorKind;

    #[test]
    fn test_api_error_is_transparent() {
        let err: CoreError = ApiError::from_status(403, r#"{"detail":"Forbidden"}"#).into();
        assert_eq!(err.to_string(), "Forbidden");
        assert_eq!(err.as_api().map(|e| e.kind), Some(ApiErrorKind::Auth));
    }
}
