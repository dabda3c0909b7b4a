//! Remote access error types.

use thiserror::Error;

/// Errors that can occur while reading or mutating remote state.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// The remote side refused a request.
    #[error("{operation} was rejected: {status} {reason}")]
    Rejected {
        /// What was attempted (e.g. "create group '/a'").
        operation: String,
        /// HTTP status code.
        status: u16,
        /// Reason reported by the remote side.
        reason: String,
    },

    /// An entity addressed by identifier does not exist.
    #[error("{entity_type} not found: {id}")]
    NotFound {
        /// Type of entity.
        entity_type: &'static str,
        /// Identifier that was addressed.
        id: String,
    },

    /// Obtaining or using an access token failed.
    #[error("authentication error: {0}")]
    Auth(String),

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The remote side answered with something unusable.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl RemoteError {
    /// Creates a rejection error.
    #[must_use]
    pub fn rejected(operation: impl Into<String>, status: u16, reason: impl Into<String>) -> Self {
        Self::Rejected {
            operation: operation.into(),
            status,
            reason: reason.into(),
        }
    }

    /// Creates a not found error.
    #[must_use]
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Checks if the remote side refused the request.
    #[must_use]
    pub const fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }

    /// Checks if this is a not found error.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Result type for remote operations.
pub type RemoteResult<T> = Result<T, RemoteError>;
