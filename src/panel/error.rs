//! Error types for panel settings updates.

use thiserror::Error;

/// Errors that can occur when applying a settings update.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// Update path is empty or does not name a settings field
    #[error("Unknown settings path: {path}")]
    UnknownPath {
        /// Dotted form of the rejected path
        path: String,
    },

    /// Path names a group of fields rather than a single field
    #[error("Settings path {path} is a group, not a field")]
    NotAField {
        /// Dotted form of the rejected path
        path: String,
    },

    /// Value does not fit the field type
    #[error("Invalid value for {path}: {source}")]
    InvalidValue {
        /// Dotted form of the path
        path: String,
        /// Underlying deserialization error
        source: serde_json::Error,
    },

    /// State could not be serialized
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SettingsError {
    /// Create an unknown path error.
    pub fn unknown_path(path: &[String]) -> Self {
        Self::UnknownPath {
            path: path.join("."),
        }
    }

    /// Create a not-a-field error.
    pub fn not_a_field(path: &[String]) -> Self {
        Self::NotAField {
            path: path.join("."),
        }
    }

    /// Create an invalid value error.
    pub fn invalid_value(path: &[String], source: serde_json::Error) -> Self {
        Self::InvalidValue {
            path: path.join("."),
            source,
        }
    }
}
