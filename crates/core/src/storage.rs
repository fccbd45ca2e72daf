// crates/core/src/storage.rs
//! Working directories for uploads and finished subtitle files.
//!
//! Single source of truth for on-disk locations; route handlers and the
//! pipeline never join paths themselves.

use std::path::{Component, Path, PathBuf};

use thiserror::Error;

use crate::job::JobId;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("cannot create {what} directory {path}: {source}")]
    CreateDir {
        what: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid artifact name: {0:?}")]
    InvalidName(String),
}

/// Resolved locations of the two working directories.
#[derive(Debug, Clone)]
pub struct StoragePaths {
    uploads: PathBuf,
    outputs: PathBuf,
}

impl StoragePaths {
    /// Resolve the directories, creating them if missing.
    pub fn new(
        uploads: impl Into<PathBuf>,
        outputs: impl Into<PathBuf>,
    ) -> Result<Self, StorageError> {
        let uploads = uploads.into();
        let outputs = outputs.into();
        std::fs::create_dir_all(&uploads).map_err(|source| StorageError::CreateDir {
            what: "uploads",
            path: uploads.clone(),
            source,
        })?;
        std::fs::create_dir_all(&outputs).map_err(|source| StorageError::CreateDir {
            what: "outputs",
            path: outputs.clone(),
            source,
        })?;
        Ok(Self { uploads, outputs })
    }

    pub fn uploads_dir(&self) -> &Path {
        &self.uploads
    }

    pub fn outputs_dir(&self) -> &Path {
        &self.outputs
    }

    /// File name of a job's subtitle artifact.
    pub fn artifact_name(id: &JobId) -> String {
        format!("{id}.srt")
    }

    /// Full path where a job's subtitle artifact is written.
    pub fn artifact_path(&self, id: &JobId) -> PathBuf {
        self.outputs.join(Self::artifact_name(id))
    }

    /// Resolve a caller-supplied artifact name strictly inside the outputs
    /// directory. Only a single plain path component is accepted, so a
    /// crafted download request cannot escape the directory. Backslashes are
    /// opaque bytes to the component walk here but separators on other
    /// platforms, so they are rejected outright.
    pub fn resolve_artifact(&self, name: &str) -> Result<PathBuf, StorageError> {
        if name.is_empty() || name.contains('\\') {
            return Err(StorageError::InvalidName(name.to_string()));
        }
        let mut components = Path::new(name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Ok(self.outputs.join(name)),
            _ => Err(StorageError::InvalidName(name.to_string())),
        }
    }
}
