//! Ephemeral image store with time-based eviction.
//!
//! Two pieces cooperate:
//!
//! - **ImageIndex**: concurrent id → record map, the single source of truth
//!   for whether an image is live
//! - **EvictionScheduler**: one timer per image that deletes the stored
//!   bytes and removes the index entry exactly once after the TTL
//!
//! [`ImageService`] ties them together behind one cloneable handle, built
//! once at startup and shared with every request handler.
//!
//! # Example
//!
//! ```ignore
//! use tempshot::storage::MemoryStorage;
//! use tempshot::store::{ImageService, NewImage};
//!
//! let service = ImageService::new(MemoryStorage::new(), Duration::from_secs(600));
//! let record = service.register(new_image)?;
//! let same = service.lookup(&record.id)?;
//! ```

mod index;
mod scheduler;
mod types;


use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::broadcast;
use tracing::{debug, error, info};

use crate::error::{Result, StoreError};
use crate::storage::ImageStorage;

pub use index::ImageIndex;
pub use scheduler::EvictionScheduler;
pub use types::{EvictionCause, EvictionEvent, EvictionReport, ImageId, ImageRecord, NewImage};

/// Handle to the image store.
///
/// `ImageService` is `Clone`; clones share the same index, timers and
/// storage backend.
#[derive(Clone)]
pub struct ImageService {
    index: Arc<ImageIndex>,
    scheduler: EvictionScheduler,
    storage: Arc<dyn ImageStorage>,
    ttl: Duration,
}

impl ImageService {
    /// Creates a service evicting every image `ttl` after upload.
    pub fn new<S: ImageStorage>(storage: S, ttl: Duration) -> Self {
        Self::from_arc(Arc::new(storage), ttl)
    }

    /// Creates a service from a shared storage backend.
    pub fn from_arc(storage: Arc<dyn ImageStorage>, ttl: Duration) -> Self {
        let index = Arc::new(ImageIndex::new());
        let scheduler = EvictionScheduler::new(Arc::clone(&index), Arc::clone(&storage));
        Self {
            index,
            scheduler,
            storage,
            ttl,
        }
    }

    /// Indexes a freshly persisted image and arms its eviction.
    ///
    /// The record is visible to [`lookup`](Self::lookup) as soon as this
    /// returns.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateId`](crate::error::StoreError::DuplicateId)
    /// if the id is already live. Nothing is armed in that case.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    pub fn register(&self, image: NewImage) -> Result<ImageRecord> {
        let record = ImageRecord::new(image, Utc::now(), self.ttl);

        if let Err(e) = self.index.insert(record.clone()) {
            error!(image_id = %record.id, "Rejected duplicate image id");
            return Err(e);
        }

        if let Err(e) = self
            .scheduler
            .arm(record.id.clone(), record.storage_path.clone(), self.ttl)
        {
            self.index.remove(&record.id);
            error!(image_id = %record.id, "Eviction already armed for image id");
            return Err(e);
        }

        info!(
            image_id = %record.id,
            original_name = %record.original_name,
            size_bytes = record.size_bytes,
            expires_at = %record.expires_at.to_rfc3339(),
            active_images = self.index.count(),
            "Image stored"
        );
        Ok(record)
    }

    /// Returns a copy of the live record for `id`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`](crate::error::StoreError::NotFound)
    /// if the image expired, was purged, or never existed.
    pub fn lookup(&self, id: &ImageId) -> Result<ImageRecord> {
        self.index.get(id)
    }

    /// Number of live images.
    pub fn count(&self) -> usize {
        self.index.count()
    }

    /// Evicts `id` immediately instead of waiting for its timer.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`](crate::error::StoreError::NotFound)
    /// if `id` is not live or its timer has already started evicting it.
    pub async fn purge(&self, id: &ImageId) -> Result<EvictionReport> {
        let record = self.index.get(id)?;
        if !self.scheduler.disarm(id) {
            debug!(image_id = %id, "Purge lost to a firing timer");
            return Err(StoreError::NotFound(id.clone()));
        }
        Ok(self
            .scheduler
            .evict(id, &record.storage_path, EvictionCause::Purged)
            .await)
    }

    /// Retention window applied to every image.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Armed timers that have not fired.
    pub fn pending_evictions(&self) -> usize {
        self.scheduler.pending()
    }

    /// Subscribes to eviction notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<EvictionEvent> {
        self.scheduler.subscribe()
    }

    /// Storage backend holding the image bytes.
    pub fn storage(&self) -> &Arc<dyn ImageStorage> {
        &self.storage
    }

    /// Drops all pending timers.
    pub fn shutdown(&self) {
        self.scheduler.shutdown();
    }

    /// Returns true if `id` is live.
    pub fn contains(&self, id: &ImageId) -> bool {
        self.index.contains(id)
    }
}
