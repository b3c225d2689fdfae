//! Error types for Anoma Studio.

use thiserror::Error;

/// Main error type for studio operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StudioError {
    /// Intent failed structural validation. Carries every accumulated error.
    #[error("Intent validation failed: {}", errors.join("; "))]
    IntentInvalid { errors: Vec<String> },

    /// The signature provider rejected key generation, import, or signing.
    #[error("{0}")]
    Provider(String),

    /// A hex string had odd length or non-hex characters.
    #[error("Malformed hex input: {0}")]
    MalformedHex(String),

    /// An imported key-pair document lacked required fields.
    #[error("{0}")]
    ImportFormat(String),

    /// Operation timed out.
    #[error("Operation timed out after {duration_ms}ms: {message}")]
    Timeout { duration_ms: u64, message: String },

    /// Local storage could not be read or written.
    #[error("Storage error: {0}")]
    Storage(String),

    /// An export sink refused or failed to deliver a file.
    #[error("Export failed: {0}")]
    Export(String),

    /// The clipboard provider failed.
    #[error("Clipboard error: {0}")]
    Clipboard(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Internal error (should not happen).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl StudioError {
    /// Returns true if retrying the same call may succeed.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            StudioError::Timeout { .. } | StudioError::Storage(_) | StudioError::Clipboard(_)
        )
    }

    /// The message shown to a user: the first validation error, or the display text.
    pub fn user_message(&self) -> String {
        match self {
            StudioError::IntentInvalid { errors } => errors
                .first()
                .cloned()
                .unwrap_or_else(|| "Invalid intent".to_string()),
            other => other.to_string(),
        }
    }
}

/// Convenience Result type for studio operations.
pub type Result<T> = std::result::Result<T, StudioError>;

impl From<serde_json::Error> for StudioError {
    fn from(err: serde_json::Error) -> Self {
        StudioError::SerializationError(err.to_string())
    }
}

impl From<std::io::Error> for StudioError {
    fn from(err: std::io::Error) -> Self {
        StudioError::Storage(err.to_string())
    }
}
