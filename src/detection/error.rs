//! Error types for detection message conversion.

use thiserror::Error;

/// Errors that can occur when parsing detection messages or label maps.
#[derive(Error, Debug)]
pub enum ConverterError {
    /// JSON parsing or serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Label map has the wrong shape
    #[error("Invalid object labels: {message}")]
    InvalidLabels {
        /// Description of the problem
        message: String,
    },
}

impl ConverterError {
    /// Create an invalid labels error with a message.
    pub fn invalid_labels(message: impl Into<String>) -> Self {
        Self::InvalidLabels {
            message: message.into(),
        }
    }
}
