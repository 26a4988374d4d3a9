//! Error types for the serving platform.

use thiserror::Error;

/// Result type alias for serving platform operations.
pub type ServingResult<T> = Result<T, ServingError>;

/// Errors returned by a [`crate::ServingPlatform`].
#[derive(Debug, Error)]
pub enum ServingError {
    #[error("failed to open database: {0}")]
    Open(String),

    #[error("transaction error: {0}")]
    Transaction(String),

    #[error("table error: {0}")]
    Table(String),

    #[error("read error: {0}")]
    Read(String),

    #[error("write error: {0}")]
    Write(String),

    #[error("serialization error: {0}")]
    Serialize(String),

    #[error("deserialization error: {0}")]
    Deserialize(String),

    #[error("{kind} \"{name}\" not found")]
    NotFound { kind: &'static str, name: String },

    #[error("{kind} \"{name}\" already exists")]
    AlreadyExists { kind: &'static str, name: String },

    #[error("invalid resource: {0}")]
    Invalid(String),
}

impl ServingError {
    /// Whether this error reports an absent resource.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ServingError::NotFound { .. })
    }

    /// Whether this error reports a create conflict.
    pub fn is_already_exists(&self) -> bool {
        matches!(self, ServingError::AlreadyExists { .. })
    }
}
