//! Persistence for the artifact record
//!
//! The only durable state is the id of the status message being maintained,
//! kept as a small JSON file (`{"embedId": ...}`). The record is read fully at
//! the start of each tick and rewritten fully whenever the id changes.

mod artifact;

pub use artifact::ArtifactStore;

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur while saving the artifact record
#[derive(Error, Debug)]
pub enum StoreError {
    /// Filesystem error
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }
}
