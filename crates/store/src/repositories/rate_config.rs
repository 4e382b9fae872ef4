//! Tax rate file repository.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use smokeduty_core::tax::RateConfig;
use tracing::{debug, error};

use crate::error::StoreError;

/// Reads the jurisdiction rate file.
///
/// The file is read on every call so edits take effect on the next
/// calculation without a restart.
#[derive(Debug, Clone)]
pub struct RateConfigRepository {
    path: PathBuf,
}

impl RateConfigRepository {
    /// Creates a repository for the given file.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the rate file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the current rates, falling back to built-in defaults when the
    /// file does not exist.
    pub async fn load(&self) -> Result<RateConfig, StoreError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "Rate file not found, using defaults");
                return Ok(RateConfig::default());
            }
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        serde_json::from_str(&raw).map_err(|source| {
            error!(path = %self.path.display(), error = %source, "Malformed rate file");
            StoreError::Malformed {
                path: self.path.clone(),
                source,
            }
        })
    }
}
