use std::path::PathBuf;
use thiserror::Error;

/// Type alias for Result with ResponderError
pub type Result<T> = std::result::Result<T, ResponderError>;

/// Error types for the email classification and reply system
#[derive(Error, Debug)]
pub enum ResponderError {
    /// A model artifact is missing, unreadable or malformed
    #[error("Failed to load model artifact {path:?}: {reason}")]
    LoadError { path: PathBuf, reason: String },

    /// Input text could not be turned into something the model accepts
    #[error("Inference error: {0}")]
    InferenceError(String),

    /// A model produced a label outside the known label set
    #[error("Unknown label: '{0}'")]
    UnknownLabel(String),

    /// The reply generator was given a category it has no template for
    #[error("Unknown category: '{0}'")]
    UnknownCategory(String),

    /// Caller-level validation failed (empty subject or body)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Interactive prompt failed or was cancelled
    #[error("Prompt error: {0}")]
    PromptError(String),

    /// IO error (file operations, etc.)
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl ResponderError {
    /// Build a load error for the given artifact path
    pub fn load(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        ResponderError::LoadError {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Check if the error should abort startup
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ResponderError::LoadError { .. } | ResponderError::ConfigError(_)
        )
    }
}

impl From<inquire::InquireError> for ResponderError {
    fn from(error: inquire::InquireError) -> Self {
        ResponderError::PromptError(error.to_string())
    }
}
