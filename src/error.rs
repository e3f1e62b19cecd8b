//! Error types for the image store and its storage backends.
//!
//! Index outcomes (`DuplicateId`, `NotFound`) are ordinary result values.
//! Storage failures at eviction time are reported, never propagated to a
//! caller, since no caller is waiting when a timer fires.

use std::path::PathBuf;

use crate::store::ImageId;

/// Result type for index and service operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors returned by the object index and the eviction scheduler.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// An identifier was inserted (or armed) twice.
    ///
    /// Identifiers are generated upstream and must be unique, so this points
    /// at a generation defect. The existing entry is left untouched.
    #[error("duplicate image id: {0}")]
    DuplicateId(ImageId),

    /// No live entry for the identifier: expired, purged, or never existed.
    #[error("image not found or expired: {0}")]
    NotFound(ImageId),
}

impl StoreError {
    /// Returns true for the expected "absent" outcome.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Errors returned by storage backends.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Filesystem error with context.
    #[error("IO error in {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// File name rejected (empty, separators, traversal).
    #[error("invalid file name: {0:?}")]
    InvalidName(String),

    /// Nothing stored at the path.
    #[error("no stored file at {}", .0.display())]
    NotFound(PathBuf),
}

impl StorageError {
    /// Create an IO error with context.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create an invalid file name error.
    pub fn invalid_name(name: impl Into<String>) -> Self {
        Self::InvalidName(name.into())
    }
}
