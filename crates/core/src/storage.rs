//! File storage backend abstraction and the local-disk implementation.
//!
//! Paths handed to a backend are relative storage keys such as
//! `projects/3f2a….png`. They are what gets persisted in the database.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

/// Errors from a storage backend.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Nothing is stored under the key.
    #[error("File not found: {0}")]
    NotFound(String),

    /// The key is absolute or escapes the storage root.
    #[error("Invalid storage path: {0}")]
    InvalidPath(String),

    #[error("Storage I/O error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// A place to put uploaded files.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Write `data` under `path`, creating parent directories as needed.
    async fn put(&self, path: &str, data: &[u8]) -> Result<(), StorageError>;

    /// Remove the file under `path`. Returns [`StorageError::NotFound`] if absent.
    async fn delete(&self, path: &str) -> Result<(), StorageError>;

    async fn exists(&self, path: &str) -> Result<bool, StorageError>;
}

/// Stores files below a root directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct LocalDisk {
    root: PathBuf,
}

impl LocalDisk {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, path: &str) -> Result<PathBuf, StorageError> {
        let relative = Path::new(path);
        let safe = !path.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        if !safe {
            return Err(StorageError::InvalidPath(path.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl StorageBackend for LocalDisk {
    async fn put(&self, path: &str, data: &[u8]) -> Result<(), StorageError> {
        let full_path = self.resolve(path)?;
        let io_err = |source| StorageError::Io {
            path: path.to_string(),
            source,
        };

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).await.map_err(io_err)?;
        }
        fs::write(&full_path, data).await.map_err(io_err)?;

        tracing::debug!(storage_path = %path, size = data.len(), "Stored file");
        Ok(())
    }

    async fn delete(&self, path: &str) -> Result<(), StorageError> {
        let full_path = self.resolve(path)?;
        match fs::remove_file(&full_path).await {
            Ok(()) => {
                tracing::debug!(storage_path = %path, "Deleted file");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(path.to_string()))
            }
            Err(source) => Err(StorageError::Io {
                path: path.to_string(),
                source,
            }),
        }
    }

    async fn exists(&self, path: &str) -> Result<bool, StorageError> {
        let full_path = self.resolve(path)?;
        fs::try_exists(&full_path)
            .await
            .map_err(|source| StorageError::Io {
                path: path.to_string(),
                source,
            })
    }
}

/// Delete `path`, treating a missing file as success.
///
/// Returns `true` if a file was actually removed.
pub async fn delete_if_present(
    storage: &dyn StorageBackend,
    path: &str,
) -> Result<bool, StorageError> {
    match storage.delete(path).await {
        Ok(()) => Ok(true),
        Err(StorageError::NotFound(_)) => Ok(false),
        Err(e) => Err(e),
    }
}
