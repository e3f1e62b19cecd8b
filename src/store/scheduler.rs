//! Eviction scheduler.
//!
//! Every armed image gets its own tokio task sleeping for the TTL. The only
//! state shared between timers is the pending map, touched for one short
//! critical section at arm time and one at fire time. Whoever removes an
//! id from that map owns its eviction, which makes a fire and a concurrent
//! [`EvictionScheduler::disarm`] resolve to exactly one winner.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tokio::sync::{broadcast, oneshot};
use tracing::{debug, info, warn};

use super::index::ImageIndex;
use super::types::{EvictionCause, EvictionEvent, EvictionReport, ImageId};
use crate::constants::EVICTION_CHANNEL_CAPACITY;
use crate::error::{Result, StoreError};
use crate::storage::ImageStorage;

struct SchedulerInner {
    index: Arc<ImageIndex>,
    storage: Arc<dyn ImageStorage>,
    /// Cancel handles of armed, not-yet-fired timers.
    pending: DashMap<ImageId, oneshot::Sender<()>>,
    events: broadcast::Sender<EvictionEvent>,
}

/// Owns all armed eviction timers.
///
/// `EvictionScheduler` is `Clone`; clones share the same timers. It holds
/// only `(id, path)` per timer and removes records through
/// [`ImageIndex::remove`].
#[derive(Clone)]
pub struct EvictionScheduler {
    inner: Arc<SchedulerInner>,
}

impl EvictionScheduler {
    /// Creates a scheduler that evicts from `index` and deletes through `storage`.
    pub fn new(index: Arc<ImageIndex>, storage: Arc<dyn ImageStorage>) -> Self {
        let (events, _) = broadcast::channel(EVICTION_CHANNEL_CAPACITY);
        Self {
            inner: Arc::new(SchedulerInner {
                index,
                storage,
                pending: DashMap::new(),
                events,
            }),
        }
    }

    /// Arms a one-shot eviction of `id` after `ttl`.
    ///
    /// Returns immediately. The eviction always runs on a separate task,
    /// even for a zero TTL.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateId`] if `id` already has a pending timer.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    pub fn arm(&self, id: ImageId, storage_path: PathBuf, ttl: Duration) -> Result<()> {
        let (cancel_tx, cancel_rx) = oneshot::channel();
        match self.inner.pending.entry(id.clone()) {
            Entry::Occupied(_) => return Err(StoreError::DuplicateId(id)),
            Entry::Vacant(slot) => {
                slot.insert(cancel_tx);
            },
        }

        debug!(image_id = %id, ?ttl, "Eviction armed");

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            tokio::select! {
                () = tokio::time::sleep(ttl) => {},
                // Fires on disarm, and on sender drop during shutdown.
                _ = cancel_rx => return,
            }

            if inner.pending.remove(&id).is_none() {
                // Disarmed between wake-up and claim.
                return;
            }
            inner.evict(&id, &storage_path, EvictionCause::Expired).await;
        });

        Ok(())
    }

    /// Cancels the pending timer for `id`.
    ///
    /// Returns `false` if nothing was pending, including when the timer has
    /// already started firing.
    pub fn disarm(&self, id: &ImageId) -> bool {
        match self.inner.pending.remove(id) {
            Some((_, cancel)) => {
                let _ = cancel.send(());
                debug!(image_id = %id, "Eviction disarmed");
                true
            },
            None => false,
        }
    }

    /// Evicts `id` now: removes the index entry, deletes `storage_path` and
    /// publishes the outcome once the delete settles.
    ///
    /// Does not touch the pending timer. Repeating it for the same id leaves
    /// the index as it was and reports `was_indexed == false`.
    pub async fn evict(
        &self,
        id: &ImageId,
        storage_path: &Path,
        cause: EvictionCause,
    ) -> EvictionReport {
        self.inner.evict(id, storage_path, cause).await
    }

    /// Number of armed timers that have not fired.
    pub fn pending(&self) -> usize {
        self.inner.pending.len()
    }

    /// Subscribes to eviction notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<EvictionEvent> {
        self.inner.events.subscribe()
    }

    /// Drops every pending timer. Timers already firing run to completion.
    pub fn shutdown(&self) {
        let dropped = self.inner.pending.len();
        self.inner.pending.clear();
        if dropped > 0 {
            info!(dropped, "Eviction scheduler stopped with pending timers");
        }
    }
}

impl SchedulerInner {
    async fn evict(&self, id: &ImageId, storage_path: &Path, cause: EvictionCause) -> EvictionReport {
        // Discoverability ends here, whatever the delete below does.
        let was_indexed = self.index.remove(id);
        debug!(image_id = %id, %cause, was_indexed, "Image unlisted");

        let storage = Arc::clone(&self.storage);
        let path = storage_path.to_path_buf();
        let deleted = tokio::spawn(async move { storage.delete(&path).await }).await;
        let storage_result = match deleted {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(e.to_string()),
            Err(e) => Err(format!("storage delete task failed: {e}")),
        };

        match &storage_result {
            Ok(()) => info!(
                image_id = %id,
                %cause,
                was_indexed,
                active_images = self.index.count(),
                "Image evicted"
            ),
            Err(reason) => warn!(
                image_id = %id,
                %cause,
                was_indexed,
                path = %storage_path.display(),
                %reason,
                "Image evicted but storage delete failed"
            ),
        }

        let report = EvictionReport {
            id: id.clone(),
            storage_path: storage_path.to_path_buf(),
            cause,
            was_indexed,
            storage: storage_result,
        };
        // No subscribers is fine.
        let _ = self.events.send(report.clone());
        report
    }
}
