use ferrous_watchlist_domain::CacheKey;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Cached payload with its expiry instant and recency stamp
#[derive(Debug)]
pub struct CacheEntry<V> {
    pub key: CacheKey,

    /// Shared with every reader, never copied
    pub payload: Arc<V>,

    /// Past this instant the entry is treated as absent (lazy expiration)
    pub expires_at: Instant,

    pub inserted_at: Instant,

    /// Approximate footprint counted against the cost ceiling
    pub cost: usize,

    /// Recency stamp from the owning cache's access clock
    last_access: AtomicU64,
}

impl<V> CacheEntry<V> {
    pub fn new(key: CacheKey, payload: Arc<V>, ttl: Duration, cost: usize, stamp: u64) -> Self {
        let now = Instant::now();
        Self {
            key,
            payload,
            expires_at: now + ttl,
            inserted_at: now,
            cost,
            last_access: AtomicU64::new(stamp),
        }
    }

    #[inline]
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now >= self.expires_at
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    pub fn remaining_ttl(&self) -> Duration {
        self.expires_at.saturating_duration_since(Instant::now())
    }

    #[inline]
    pub fn touch(&self, stamp: u64) {
        self.last_access.store(stamp, AtomicOrdering::Relaxed);
    }

    #[inline]
    pub fn last_access(&self) -> u64 {
        self.last_access.load(AtomicOrdering::Relaxed)
    }
}
