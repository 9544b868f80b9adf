//! Error types for calboard.

use thiserror::Error;

/// Errors that can occur in calboard operations.
#[derive(Error, Debug)]
pub enum EventError {
    /// A required field is missing or malformed.
    #[error("{0}")]
    Validation(String),

    #[error("Event not found: {0}")]
    NotFound(String),

    /// The persistence engine failed or is unavailable.
    #[error("Store error: {0}")]
    Store(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl EventError {
    pub fn validation(msg: impl Into<String>) -> Self {
        EventError::Validation(msg.into())
    }
}

impl From<serde_json::Error> for EventError {
    fn from(err: serde_json::Error) -> Self {
        EventError::Serialization(err.to_string())
    }
}

/// Result type alias for calboard operations.
pub type EventResult<T> = Result<T, EventError>;
