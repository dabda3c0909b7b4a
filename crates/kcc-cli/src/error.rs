//! CLI error types.

use std::path::PathBuf;

use kcc_core::ImportError;
use kcc_remote::RemoteError;
use thiserror::Error;

/// CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Invalid argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// An import document could not be parsed.
    #[error("invalid import document {}: {source}", path.display())]
    Document {
        /// File the document was read from.
        path: PathBuf,
        /// Parse error.
        #[source]
        source: serde_json::Error,
    },

    /// Connecting or authenticating to the server failed.
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// A realm import failed.
    #[error("import failed: {0}")]
    Import(#[from] ImportError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// CLI result type.
pub type CliResult<T> = Result<T, CliError>;
