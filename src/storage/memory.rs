//! In-memory image storage.
//!
//! Non-persistent storage using DashMap. Used by tests and for embedding the
//! store without a filesystem. Deletes can be forced to fail to exercise
//! eviction when physical cleanup breaks.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;

use super::backend::ImageStorage;
use super::validation::validate_file_name;
use crate::error::StorageError;

/// Virtual root prefixed to every stored name.
const MEMORY_ROOT: &str = "memory";

#[derive(Default)]
struct Inner {
    files: DashMap<PathBuf, Vec<u8>>,
    fail_deletes: AtomicBool,
    delete_calls: AtomicUsize,
}

/// In-memory storage backend.
///
/// `MemoryStorage` is `Clone`; clones share the same files, so a test can
/// keep a handle while the service owns another.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    inner: Arc<Inner>,
}

impl MemoryStorage {
    /// Creates an empty in-memory backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent `delete` fail with an IO error.
    pub fn fail_deletes(&self, fail: bool) {
        self.inner.fail_deletes.store(fail, Ordering::SeqCst);
    }

    /// Number of `delete` calls received, successful or not.
    pub fn delete_calls(&self) -> usize {
        self.inner.delete_calls.load(Ordering::SeqCst)
    }

    /// Returns true if something is stored at `path`.
    pub fn contains(&self, path: &Path) -> bool {
        self.inner.files.contains_key(path)
    }

    /// Number of stored files.
    pub fn len(&self) -> usize {
        self.inner.files.len()
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.inner.files.is_empty()
    }

    fn path_for(file_name: &str) -> Result<PathBuf, StorageError> {
        Ok(Path::new(MEMORY_ROOT).join(validate_file_name(file_name)?))
    }
}

#[async_trait]
impl ImageStorage for MemoryStorage {
    async fn persist(&self, file_name: &str, data: &[u8]) -> Result<PathBuf, StorageError> {
        let path = Self::path_for(file_name)?;
        self.inner.files.insert(path.clone(), data.to_vec());
        Ok(path)
    }

    async fn read(&self, file_name: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let path = Self::path_for(file_name)?;
        Ok(self.inner.files.get(&path).map(|entry| entry.value().clone()))
    }

    async fn delete(&self, path: &Path) -> Result<(), StorageError> {
        self.inner.delete_calls.fetch_add(1, Ordering::SeqCst);

        if self.inner.fail_deletes.load(Ordering::SeqCst) {
            return Err(StorageError::io(
                format!("delete {}", path.display()),
                std::io::Error::new(std::io::ErrorKind::PermissionDenied, "simulated failure"),
            ));
        }

        match self.inner.files.remove(path) {
            Some(_) => Ok(()),
            None => Err(StorageError::NotFound(path.to_path_buf())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_persist_and_delete() {
        let storage = MemoryStorage::new();
        let path = storage.persist("a.png", b"data").await.unwrap();

        assert!(storage.contains(&path));
        assert_eq!(storage.read("a.png").await.unwrap(), Some(b"data".to_vec()));

        storage.delete(&path).await.unwrap();
        assert!(storage.is_empty());
        assert_eq!(storage.delete_calls(), 1);
    }

    #[tokio::test]
    async fn test_second_delete_is_not_found() {
        let storage = MemoryStorage::new();
        let path = storage.persist("a.png", b"data").await.unwrap();

        storage.delete(&path).await.unwrap();
        let err = storage.delete(&path).await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_fail_deletes_keeps_file() {
        let storage = MemoryStorage::new();
        let path = storage.persist("a.png", b"data").await.unwrap();

        storage.fail_deletes(true);
        assert!(matches!(
            storage.delete(&path).await.unwrap_err(),
            StorageError::Io { .. }
        ));
        assert!(storage.contains(&path));
        assert_eq!(storage.len(), 1);
    }
}
