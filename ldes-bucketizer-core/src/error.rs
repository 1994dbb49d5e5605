//! Error types for the bucketizing engine

use thiserror::Error;

/// Result type alias using [`BucketizerError`]
pub type Result<T> = std::result::Result<T, BucketizerError>;

/// Bucketizer errors
///
/// Only `Config`, `PropertyPath`, `UnknownType` and `State` reach callers in
/// normal operation. `Strategy` errors raised while selecting buckets are
/// caught by the engine and turned into fallback placement.
#[derive(Error, Debug)]
pub enum BucketizerError {
    /// Required configuration missing or invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// Property path expression could not be parsed
    #[error("Invalid property path: {0}")]
    PropertyPath(String),

    /// Strategy failed to select a bucket for a member
    #[error("Strategy error: {0}")]
    Strategy(String),

    /// No factory registered for a strategy type
    #[error("No bucketizer registered for type '{0}'")]
    UnknownType(String),

    /// State snapshot does not match the bucketizer it is imported into
    #[error("Invalid state: {0}")]
    State(String),

    /// Bucketizer output lacks the membership record for a member
    #[error("No membership record for member {0}")]
    MissingRecord(String),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl BucketizerError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        BucketizerError::Config(msg.into())
    }

    /// Create a strategy error
    pub fn strategy(msg: impl Into<String>) -> Self {
        BucketizerError::Strategy(msg.into())
    }

    /// Create a state error
    pub fn state(msg: impl Into<String>) -> Self {
        BucketizerError::State(msg.into())
    }
}
