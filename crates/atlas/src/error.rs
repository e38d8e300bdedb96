//! Error types for atlas
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

/// Main error type for atlas
#[derive(Error, Debug)]
pub enum AtlasError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<std::io::Error> for AtlasError {
    fn from(e: std::io::Error) -> Self {
        AtlasError::Storage(e.to_string())
    }
}

impl From<serde_json::Error> for AtlasError {
    fn from(e: serde_json::Error) -> Self {
        AtlasError::Parse(e.to_string())
    }
}

/// Result type alias for atlas
pub type Result<T> = std::result::Result<T, AtlasError>;
