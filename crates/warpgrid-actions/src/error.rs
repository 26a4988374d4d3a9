//! Error taxonomy for action operations.

use thiserror::Error;
use warpgrid_serving::ServingError;

/// Result type alias for action operations.
pub type ActionResult<T> = Result<T, ActionError>;

/// The two ways an action operation can fail.
///
/// Both carry a single human-readable message; there are no finer codes.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ActionError {
    /// A platform resource backing the action is absent.
    #[error("{0}")]
    NotFound(String),

    /// Anything else: platform failures, gateway transport errors,
    /// non-200 init/run responses, malformed results.
    #[error("{0}")]
    Internal(String),
}

impl ActionError {
    pub fn internal(msg: impl Into<String>) -> Self {
        ActionError::Internal(msg.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ActionError::NotFound(_))
    }

    /// Downgrade to `Internal`, keeping the message.
    pub fn into_internal(self) -> Self {
        match self {
            ActionError::NotFound(msg) => ActionError::Internal(msg),
            other => other,
        }
    }
}

impl From<ServingError> for ActionError {
    fn from(err: ServingError) -> Self {
        if err.is_not_found() {
            ActionError::NotFound(err.to_string())
        } else {
            ActionError::Internal(err.to_string())
        }
    }
}
