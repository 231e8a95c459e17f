//! TTL cache for aggregated collections
//!
//! An explicit cache object owned by the host: no process-wide state. The
//! host passes `now` in, which keeps expiry decisions deterministic under
//! test. Expiry triggers a full re-run of the refresh future, never an
//! incremental update; explicit invalidation clears the slot so the next
//! read refreshes.

use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{debug, info};

use newsdesk_core::NewsCollection;

struct CacheSlot {
    stored_at: DateTime<Utc>,
    collection: NewsCollection,
}

/// Memoized aggregation result with a fixed time-to-live
pub struct NewsCache {
    ttl: Duration,
    slot: RwLock<Option<CacheSlot>>,
}

impl NewsCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slot: RwLock::new(None),
        }
    }

    /// Return the cached collection if it is still fresh at `now`,
    /// otherwise run `refresh`, store its result, and return it.
    pub async fn get_or_refresh<F, Fut>(&self, now: DateTime<Utc>, refresh: F) -> NewsCollection
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = NewsCollection>,
    {
        {
            let slot = self.slot.read().await;
            if let Some(cached) = slot.as_ref() {
                if self.fresh_at(cached.stored_at, now) {
                    debug!("Serving cached collection from {}", cached.stored_at);
                    return cached.collection.clone();
                }
            }
        }

        info!("Cache stale or empty, refreshing collection");
        let collection = refresh().await;

        let mut slot = self.slot.write().await;
        *slot = Some(CacheSlot {
            stored_at: now,
            collection: collection.clone(),
        });
        collection
    }

    /// Drop the cached collection so the next read refreshes
    /// (user-triggered refresh).
    pub async fn invalidate(&self) {
        let mut slot = self.slot.write().await;
        *slot = None;
        debug!("Cache invalidated");
    }

    /// Whether a cached collection exists and is fresh at `now`.
    pub async fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        let slot = self.slot.read().await;
        slot.as_ref()
            .map(|cached| self.fresh_at(cached.stored_at, now))
            .unwrap_or(false)
    }

    fn fresh_at(&self, stored_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        let age = now.signed_duration_since(stored_at);
        age >= chrono::Duration::zero()
            && age.to_std().map(|age| age < self.ttl).unwrap_or(false)
    }
}
