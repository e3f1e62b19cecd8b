//! Record and identifier types for the image store.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque identifier of one stored image.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageId(String);

impl ImageId {
    /// Generates a fresh 128-bit random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ImageId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ImageId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Metadata handed to the service by the upload path, after the bytes
/// have been persisted.
#[derive(Debug, Clone)]
pub struct NewImage {
    pub id: ImageId,
    pub storage_path: PathBuf,
    pub file_name: String,
    pub original_name: String,
    pub mime_type: String,
    pub size_bytes: u64,
}

/// Metadata for one live image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageRecord {
    pub id: ImageId,
    pub storage_path: PathBuf,
    /// Name of the stored file, used for the public `/uploads/` URL.
    pub file_name: String,
    pub original_name: String,
    pub mime_type: String,
    pub size_bytes: u64,
    pub uploaded_at: DateTime<Utc>,
    /// `uploaded_at + ttl`, fixed at construction.
    pub expires_at: DateTime<Utc>,
}

impl ImageRecord {
    /// Builds a record uploaded at `uploaded_at` that expires `ttl` later.
    pub fn new(image: NewImage, uploaded_at: DateTime<Utc>, ttl: Duration) -> Self {
        let ttl = chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::MAX);
        let expires_at = uploaded_at
            .checked_add_signed(ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        Self {
            id: image.id,
            storage_path: image.storage_path,
            file_name: image.file_name,
            original_name: image.original_name,
            mime_type: image.mime_type,
            size_bytes: image.size_bytes,
            uploaded_at,
            expires_at,
        }
    }

    /// Time left until the nominal expiry, saturating at zero.
    ///
    /// Display only. Liveness is index membership.
    pub fn remaining(&self, now: DateTime<Utc>) -> Duration {
        (self.expires_at - now).to_std().unwrap_or(Duration::ZERO)
    }
}

/// Why an image was evicted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EvictionCause {
    /// The armed timer fired.
    Expired,
    /// Removed early by an administrative purge.
    Purged,
}

impl fmt::Display for EvictionCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expired => f.write_str("expired"),
            Self::Purged => f.write_str("purged"),
        }
    }
}

/// Outcome of one eviction.
///
/// Also broadcast to subscribers as the eviction notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvictionReport {
    pub id: ImageId,
    pub storage_path: PathBuf,
    pub cause: EvictionCause,
    /// Whether the index still held the entry. `false` on a repeated eviction.
    pub was_indexed: bool,
    /// Storage delete outcome; `Err` carries the failure text.
    pub storage: std::result::Result<(), String>,
}

impl EvictionReport {
    pub fn storage_deleted(&self) -> bool {
        self.storage.is_ok()
    }
}

/// Eviction notification delivered to subscribers.
pub type EvictionEvent = EvictionReport;
