//! Filesystem-backed image storage.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{debug, info, warn};

use super::backend::ImageStorage;
use super::validation::validate_file_name;
use crate::error::StorageError;

/// Stores uploads as flat files under one directory.
///
/// `FilesystemStorage` is `Clone` and holds no open handles, so it can be
/// shared freely across tasks.
#[derive(Debug, Clone)]
pub struct FilesystemStorage {
    base_dir: PathBuf,
}

impl FilesystemStorage {
    /// Opens the storage rooted at `base_dir`, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();

        if base_dir.is_dir() {
            info!(dir = %base_dir.display(), "Upload directory found");
        } else {
            std::fs::create_dir_all(&base_dir).with_context(|| {
                format!("Failed to create upload directory: {}", base_dir.display())
            })?;
            info!(dir = %base_dir.display(), "Upload directory created");
        }

        Ok(Self { base_dir })
    }

    /// Root directory of stored files.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Deletes every regular file in the upload directory.
    ///
    /// Nothing survives a restart, so files left by a previous process are
    /// unreachable. Returns the number of files removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be listed. Individual delete
    /// failures are logged and skipped.
    pub async fn sweep(&self) -> Result<usize> {
        let mut entries = tokio::fs::read_dir(&self.base_dir)
            .await
            .with_context(|| format!("Failed to list {}", self.base_dir.display()))?;

        let mut removed = 0;
        while let Some(entry) = entries
            .next_entry()
            .await
            .context("Failed to read upload directory entry")?
        {
            let is_file = entry.file_type().await.is_ok_and(|t| t.is_file());
            if !is_file {
                continue;
            }
            match tokio::fs::remove_file(entry.path()).await {
                Ok(()) => removed += 1,
                Err(e) => warn!(path = %entry.path().display(), error = %e, "Failed to sweep file"),
            }
        }

        Ok(removed)
    }
}

#[async_trait]
impl ImageStorage for FilesystemStorage {
    async fn persist(&self, file_name: &str, data: &[u8]) -> Result<PathBuf, StorageError> {
        let path = self.base_dir.join(validate_file_name(file_name)?);
        tokio::fs::write(&path, data)
            .await
            .map_err(|e| StorageError::io(format!("write {}", path.display()), e))?;
        debug!(path = %path.display(), size_bytes = data.len(), "Stored upload");
        Ok(path)
    }

    async fn read(&self, file_name: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let path = self.base_dir.join(validate_file_name(file_name)?);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::io(format!("read {}", path.display()), e)),
        }
    }

    async fn delete(&self, path: &Path) -> Result<(), StorageError> {
        match tokio::fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(StorageError::NotFound(path.to_path_buf()))
            },
            Err(e) => Err(StorageError::io(format!("delete {}", path.display()), e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_open_creates_directory() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("nested").join("uploads");

        let storage = FilesystemStorage::open(&dir).unwrap();
        assert!(dir.is_dir());
        assert_eq!(storage.base_dir(), dir.as_path());
    }

    #[tokio::test]
    async fn test_persist_read_delete() {
        let tmp = TempDir::new().unwrap();
        let storage = FilesystemStorage::open(tmp.path()).unwrap();

        let path = storage.persist("a.png", b"png-bytes").await.unwrap();
        assert_eq!(path, tmp.path().join("a.png"));
        assert_eq!(storage.read("a.png").await.unwrap(), Some(b"png-bytes".to_vec()));

        storage.delete(&path).await.unwrap();
        assert!(!path.exists());
        assert_eq!(storage.read("a.png").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete_missing_reports_not_found() {
        let tmp = TempDir::new().unwrap();
        let storage = FilesystemStorage::open(tmp.path()).unwrap();

        let err = storage.delete(&tmp.path().join("gone.png")).await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_persist_rejects_traversal() {
        let tmp = TempDir::new().unwrap();
        let storage = FilesystemStorage::open(tmp.path().join("uploads")).unwrap();

        let err = storage.persist("../escape.png", b"x").await.unwrap_err();
        assert!(matches!(err, StorageError::InvalidName(_)));
        assert!(!tmp.path().join("escape.png").exists());
    }

    #[tokio::test]
    async fn test_sweep_removes_only_files() {
        let tmp = TempDir::new().unwrap();
        let storage = FilesystemStorage::open(tmp.path()).unwrap();

        storage.persist("a.png", b"a").await.unwrap();
        storage.persist("b.jpg", b"b").await.unwrap();
        std::fs::create_dir(tmp.path().join("keep")).unwrap();

        assert_eq!(storage.sweep().await.unwrap(), 2);
        assert!(tmp.path().join("keep").is_dir());
        assert!(!tmp.path().join("a.png").exists());
    }
}
