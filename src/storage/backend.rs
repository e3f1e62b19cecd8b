//! Backend trait for image byte storage.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::StorageError;

/// Backend trait for persisting and deleting uploaded bytes.
///
/// All backends must be thread-safe (`Send + Sync`) for use with tokio.
/// `delete` is called from eviction timers with no caller waiting on the
/// result, so implementations should report failures rather than retry.
#[async_trait]
pub trait ImageStorage: Send + Sync + 'static {
    /// Stores `data` under `file_name` and returns the resulting path.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is invalid or the write fails.
    async fn persist(&self, file_name: &str, data: &[u8]) -> Result<PathBuf, StorageError>;

    /// Reads the bytes stored under `file_name`.
    ///
    /// Returns `Ok(None)` if nothing is stored under that name.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is invalid or the read fails.
    async fn read(&self, file_name: &str) -> Result<Option<Vec<u8>>, StorageError>;

    /// Deletes the bytes at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotFound`] if nothing is stored at `path`, or
    /// an IO error if the delete itself fails.
    async fn delete(&self, path: &Path) -> Result<(), StorageError>;
}
