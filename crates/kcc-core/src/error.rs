//! Import error types.

use kcc_remote::RemoteError;
use thiserror::Error;

/// Errors that abort the import of a realm.
#[derive(Debug, Error)]
pub enum ImportError {
    /// A declared name cannot be resolved against remote state.
    #[error("{kind} '{name}' not found in realm '{realm}'")]
    Reference {
        /// Kind of entity (e.g. "realm role", "client").
        kind: &'static str,
        /// Name that failed to resolve.
        name: String,
        /// Realm being imported.
        realm: String,
    },

    /// The remote side refused a mutation.
    #[error("{operation} was rejected: {status} {reason}")]
    Rejected {
        /// What was attempted.
        operation: String,
        /// HTTP status code.
        status: u16,
        /// Reason reported by the remote side.
        reason: String,
    },

    /// The import document itself is unusable.
    #[error("invalid import: {0}")]
    InvalidImport(String),

    /// Transport, authentication or decoding failure.
    #[error(transparent)]
    Remote(RemoteError),
}

impl ImportError {
    /// Creates a reference error.
    #[must_use]
    pub fn reference(kind: &'static str, name: impl Into<String>, realm: impl Into<String>) -> Self {
        Self::Reference {
            kind,
            name: name.into(),
            realm: realm.into(),
        }
    }

    /// Checks if a declared name failed to resolve.
    #[must_use]
    pub const fn is_reference(&self) -> bool {
        matches!(self, Self::Reference { .. })
    }

    /// Checks if the remote side refused a mutation.
    #[must_use]
    pub const fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }
}

impl From<RemoteError> for ImportError {
    fn from(err: RemoteError) -> Self {
        match err {
            RemoteError::Rejected {
                operation,
                status,
                reason,
            } => Self::Rejected {
                operation,
                status,
                reason,
            },
            other => Self::Remote(other),
        }
    }
}

/// Result type for import operations.
pub type ImportResult<T> = Result<T, ImportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_rejection_becomes_import_rejection() {
        let err: ImportError = RemoteError::rejected("create group 'a'", 409, "Conflict").into();

        assert!(err.is_rejected());
        assert_eq!(err.to_string(), "create group 'a' was rejected: 409 Conflict");
    }

    #[test]
    fn other_remote_errors_are_wrapped() {
        let err: ImportError = RemoteError::Auth("bad credentials".to_string()).into();

        assert!(matches!(err, ImportError::Remote(_)));
        assert!(!err.is_reference());
    }

    #[test]
    fn reference_error_names_entity() {
        let err = ImportError::reference("realm role", "role_x", "master");

        assert!(err.is_reference());
        assert_eq!(err.to_string(), "realm role 'role_x' not found in realm 'master'");
    }
}
