//! File-backed artifact record store
//!
//! # Example
//!
//! ```no_run
//! use beacon::models::ArtifactRecord;
//! use beacon::storage::ArtifactStore;
//!
//! # fn example() -> Result<(), beacon::storage::StoreError> {
//! let store = ArtifactStore::new("embed.json");
//!
//! let mut record = store.load();
//! record.embed_id = Some("1187654321".to_string());
//! store.save(&record)?;
//! # Ok(())
//! # }
//! ```

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use super::{StoreError, StoreResult};
use crate::models::ArtifactRecord;

/// Reads and writes the single [`ArtifactRecord`]
///
/// Access is single-threaded by construction: only the reconciler touches the
/// store, inside its tick lock.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    path: PathBuf,
}

impl ArtifactStore {
    /// Create a store backed by `path`; the file need not exist yet
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the record
    ///
    /// Never fails: a missing file yields an empty record, and an unreadable
    /// or corrupt file is logged and also treated as empty, so the next tick
    /// creates a fresh message.
    pub fn load(&self) -> ArtifactRecord {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "No artifact record yet");
                return ArtifactRecord::default();
            }
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Failed to read artifact record; starting without one"
                );
                return ArtifactRecord::default();
            }
        };

        if content.trim().is_empty() {
            return ArtifactRecord::default();
        }

        match serde_json::from_str(&content) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Artifact record is corrupt; starting without one"
                );
                ArtifactRecord::default()
            }
        }
    }

    /// Save the record
    ///
    /// Writes to a temp file next to the target, then renames it into place,
    /// so a concurrent or subsequent load sees either the old or the new
    /// record, never a partial one.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the directory, temp file or rename fails.
    pub fn save(&self, record: &ArtifactRecord) -> StoreResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }

        let temp_path = self.temp_path();

        let file = File::create(&temp_path).map_err(|e| StoreError::io(&temp_path, e))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, record)?;
        writer
            .flush()
            .map_err(|e| StoreError::io(&temp_path, e))?;
        drop(writer);

        fs::rename(&temp_path, &self.path).map_err(|e| StoreError::io(&self.path, e))?;

        tracing::debug!(
            path = %self.path.display(),
            embed_id = ?record.embed_id,
            "Artifact record saved"
        );
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "artifact".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
