use super::{CacheEntry, CacheMetrics, CacheWeight, EvictionEntry};
use dashmap::DashMap;
use ferrous_watchlist_domain::{CacheKey, CacheStats};
use rustc_hash::FxBuildHasher;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering as AtomicOrdering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info};

const SHARD_AMOUNT: usize = 64;

/// Fixed per-entry bookkeeping counted on top of the payload weight.
const ENTRY_OVERHEAD: usize = 64;

/// Concurrency-safe `CacheKey -> CacheEntry` store.
///
/// Reads and writes lock a single shard. The sweep mutex is only taken by
/// eviction, active expiry and bulk clear, so lookups never wait on it.
pub struct ResponseCache<V> {
    entries: DashMap<CacheKey, CacheEntry<V>, FxBuildHasher>,
    max_entries: usize,
    max_cost: usize,
    total_cost: AtomicUsize,
    access_clock: AtomicU64,
    sweep_lock: Mutex<()>,
    metrics: Arc<CacheMetrics>,
}

impl<V: CacheWeight> ResponseCache<V> {
    pub fn new(max_entries: usize, max_cost: usize) -> Self {
        info!(
            max_entries = max_entries,
            max_cost_bytes = max_cost,
            shards = SHARD_AMOUNT,
            "Initializing response cache"
        );

        let entries: DashMap<CacheKey, CacheEntry<V>, FxBuildHasher> =
            DashMap::with_capacity_and_hasher_and_shard_amount(
                max_entries.min(4096),
                FxBuildHasher,
                SHARD_AMOUNT,
            );

        Self {
            entries,
            max_entries: max_entries.max(1),
            max_cost: max_cost.max(1),
            total_cost: AtomicUsize::new(0),
            access_clock: AtomicU64::new(0),
            sweep_lock: Mutex::new(()),
            metrics: Arc::new(CacheMetrics::default()),
        }
    }

    /// Fresh payload for `key`, or `None` if absent or expired.
    pub fn get(&self, key: &CacheKey) -> Option<Arc<V>> {
        let now = Instant::now();

        let Some(entry) = self.entries.get(key) else {
            self.metrics.misses.fetch_add(1, AtomicOrdering::Relaxed);
            return None;
        };

        if entry.is_expired_at(now) {
            drop(entry);
            if self.remove_where(key, |e| e.is_expired_at(now)) {
                self.metrics
                    .expirations
                    .fetch_add(1, AtomicOrdering::Relaxed);
            }
            self.metrics.misses.fetch_add(1, AtomicOrdering::Relaxed);
            debug!(key = %key, "Cache entry expired (lazy)");
            return None;
        }

        entry.touch(self.next_stamp());
        self.metrics.hits.fetch_add(1, AtomicOrdering::Relaxed);
        debug!(key = %key, "Cache hit");

        Some(Arc::clone(&entry.payload))
    }

    /// Like `get`, but leaves metrics and recency untouched. Expired entries
    /// are reported as absent and left for the sweep.
    pub fn peek(&self, key: &CacheKey) -> Option<Arc<V>> {
        self.entries
            .get(key)
            .filter(|entry| !entry.is_expired())
            .map(|entry| Arc::clone(&entry.payload))
    }

    /// Insert or replace. Returns `false` when the payload alone exceeds the
    /// cost ceiling and was not stored.
    pub fn put(&self, key: CacheKey, payload: V, ttl: Duration) -> bool {
        self.put_shared(key, Arc::new(payload), ttl)
    }

    pub fn put_shared(&self, key: CacheKey, payload: Arc<V>, ttl: Duration) -> bool {
        let cost = payload.weight() + key.as_str().len() + ENTRY_OVERHEAD;
        if cost > self.max_cost {
            debug!(
                key = %key,
                cost = cost,
                max_cost = self.max_cost,
                "Payload exceeds cost ceiling, not cached"
            );
            return false;
        }

        let entry = CacheEntry::new(key.clone(), payload, ttl, cost, self.next_stamp());

        // Counted before it becomes visible so removals never underflow.
        self.total_cost.fetch_add(cost, AtomicOrdering::Relaxed);
        if let Some(previous) = self.entries.insert(key.clone(), entry) {
            self.total_cost
                .fetch_sub(previous.cost, AtomicOrdering::Relaxed);
        }
        self.metrics
            .insertions
            .fetch_add(1, AtomicOrdering::Relaxed);

        debug!(
            key = %key,
            ttl_secs = ttl.as_secs(),
            cache_size = self.entries.len(),
            "Inserted into cache"
        );

        if self.over_capacity() {
            self.evict();
        }

        true
    }

    /// Remove the given keys. Returns how many were present.
    pub fn invalidate(&self, keys: &[CacheKey]) -> usize {
        let removed = keys
            .iter()
            .filter(|key| self.remove_where(key, |_| true))
            .count();
        self.record_invalidations(removed);
        removed
    }

    /// Remove every key for which `predicate` holds.
    pub fn invalidate_matching<P>(&self, predicate: P) -> usize
    where
        P: Fn(&CacheKey) -> bool,
    {
        let mut removed = 0;
        self.entries.retain(|key, entry| {
            if predicate(key) {
                self.total_cost
                    .fetch_sub(entry.cost, AtomicOrdering::Relaxed);
                removed += 1;
                false
            } else {
                true
            }
        });
        self.record_invalidations(removed);
        removed
    }

    pub fn clear(&self) -> usize {
        let _sweep = self.sweep_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let removed = self.invalidate_matching(|_| true);
        info!(removed = removed, "Cache cleared");
        removed
    }

    /// Active expiry sweep. Returns the number of entries removed.
    pub fn purge_expired(&self) -> usize {
        let _sweep = self.sweep_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let removed = self.purge_expired_at(Instant::now());

        if removed > 0 {
            debug!(
                removed = removed,
                cache_size = self.entries.len(),
                "Expired entries purged"
            );
        }

        removed
    }

    pub fn remaining_ttl(&self, key: &CacheKey) -> Option<Duration> {
        self.entries
            .get(key)
            .filter(|entry| !entry.is_expired())
            .map(|entry| entry.remaining_ttl())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_cost(&self) -> usize {
        self.total_cost.load(AtomicOrdering::Relaxed)
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    pub fn max_cost(&self) -> usize {
        self.max_cost
    }

    pub fn metrics(&self) -> Arc<CacheMetrics> {
        Arc::clone(&self.metrics)
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.len(),
            approximate_cost_bytes: self.total_cost(),
            hits: self.metrics.hits.load(AtomicOrdering::Relaxed),
            misses: self.metrics.misses.load(AtomicOrdering::Relaxed),
            insertions: self.metrics.insertions.load(AtomicOrdering::Relaxed),
            evictions: self.metrics.evictions.load(AtomicOrdering::Relaxed),
            expirations: self.metrics.expirations.load(AtomicOrdering::Relaxed),
            invalidations: self.metrics.invalidations.load(AtomicOrdering::Relaxed),
            hit_rate: self.metrics.hit_rate(),
        }
    }

    #[inline]
    fn next_stamp(&self) -> u64 {
        self.access_clock.fetch_add(1, AtomicOrdering::Relaxed) + 1
    }

    fn over_capacity(&self) -> bool {
        self.entries.len() > self.max_entries || self.total_cost() > self.max_cost
    }

    fn remove_where<P>(&self, key: &CacheKey, predicate: P) -> bool
    where
        P: FnOnce(&CacheEntry<V>) -> bool,
    {
        match self.entries.remove_if(key, |_, entry| predicate(entry)) {
            Some((_, entry)) => {
                self.total_cost
                    .fetch_sub(entry.cost, AtomicOrdering::Relaxed);
                true
            }
            None => false,
        }
    }

    fn record_invalidations(&self, removed: usize) {
        if removed > 0 {
            self.metrics
                .invalidations
                .fetch_add(removed as u64, AtomicOrdering::Relaxed);
        }
    }

    fn purge_expired_at(&self, now: Instant) -> usize {
        let mut removed = 0;
        self.entries.retain(|_, entry| {
            if entry.is_expired_at(now) {
                self.total_cost
                    .fetch_sub(entry.cost, AtomicOrdering::Relaxed);
                removed += 1;
                false
            } else {
                true
            }
        });

        if removed > 0 {
            self.metrics
                .expirations
                .fetch_add(removed as u64, AtomicOrdering::Relaxed);
        }
        removed
    }

    /// Drop expired entries, then least recently used ones, until both
    /// ceilings hold.
    fn evict(&self) {
        let _sweep = self.sweep_lock.lock().unwrap_or_else(PoisonError::into_inner);
        if !self.over_capacity() {
            return;
        }

        let expired = self.purge_expired_at(Instant::now());
        let mut evicted = 0u64;

        if self.over_capacity() {
            for candidate in self.collect_eviction_candidates() {
                if !self.over_capacity() {
                    break;
                }
                // An entry touched since the snapshot is no longer the
                // least recent one; leave it.
                let stamp = candidate.last_access;
                if self.remove_where(&candidate.key, |e| e.last_access() == stamp) {
                    evicted += 1;
                }
            }
        }

        if evicted > 0 {
            self.metrics
                .evictions
                .fetch_add(evicted, AtomicOrdering::Relaxed);
        }

        debug!(
            expired = expired,
            evicted = evicted,
            cache_size = self.entries.len(),
            total_cost = self.total_cost(),
            "Eviction sweep completed"
        );
    }

    fn collect_eviction_candidates(&self) -> Vec<EvictionEntry> {
        let mut candidates: Vec<EvictionEntry> = self
            .entries
            .iter()
            .map(|entry| EvictionEntry {
                key: entry.key().clone(),
                last_access: entry.value().last_access(),
            })
            .collect();

        candidates.sort_unstable();
        candidates
    }
}
