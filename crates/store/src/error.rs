//! Storage error types.

use std::path::PathBuf;

use smokeduty_shared::AppError;
use thiserror::Error;

/// Errors raised while reading or writing local files.
#[derive(Debug, Error)]
pub enum StoreError {
    /// File could not be read or written.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// File exists but is not valid JSON for its schema.
    #[error("Malformed file {path}: {source}")]
    Malformed {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },

    /// In-memory value could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        Self::Storage(err.to_string())
    }
}
