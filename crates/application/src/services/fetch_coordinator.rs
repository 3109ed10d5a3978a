use crate::cache::{CacheWeight, ResponseCache};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use ferrous_watchlist_domain::{CacheKey, DomainError};
use futures::future::{BoxFuture, FutureExt, Shared};
use rustc_hash::FxBuildHasher;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::{debug, warn};

type SharedFetch<V> = Shared<BoxFuture<'static, Result<Arc<V>, DomainError>>>;

struct InFlight<V> {
    id: u64,
    fetch: SharedFetch<V>,
}

type InFlightMap<V> = DashMap<CacheKey, InFlight<V>, FxBuildHasher>;

/// Cache-then-network access with at most one backend call in flight per key.
///
/// Loaders run on their own task, so a caller that stops waiting does not
/// abort the call. Every waiter for the same key receives a clone of the
/// same result. Failures are handed to the waiters and never cached.
///
/// A load only populates the cache while its own in-flight entry is still
/// registered. Invalidation drops matching entries under the populate gate,
/// so a load it overtook completes for its waiters but never writes to the
/// cache. Loads of other keys are unaffected.
pub struct FetchCoordinator<V> {
    cache: Arc<ResponseCache<V>>,
    in_flight: Arc<InFlightMap<V>>,
    next_flight_id: AtomicU64,
    populate_gate: Arc<Mutex<()>>,
}

impl<V> FetchCoordinator<V>
where
    V: CacheWeight + Send + Sync + 'static,
{
    pub fn new(cache: Arc<ResponseCache<V>>) -> Self {
        Self {
            cache,
            in_flight: Arc::new(DashMap::with_hasher(FxBuildHasher)),
            next_flight_id: AtomicU64::new(0),
            populate_gate: Arc::new(Mutex::new(())),
        }
    }

    /// Returns the cached payload for `key`, joins a fetch already in flight,
    /// or runs `loader` and caches its success for `ttl`.
    pub async fn fetch<F, Fut>(
        &self,
        key: CacheKey,
        ttl: Duration,
        loader: F,
    ) -> Result<Arc<V>, DomainError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, DomainError>> + Send + 'static,
    {
        if let Some(hit) = self.cache.get(&key) {
            return Ok(hit);
        }

        let fetch = match self.in_flight.entry(key.clone()) {
            Entry::Occupied(flight) => {
                debug!(key = %key, "Joining in-flight fetch");
                flight.get().fetch.clone()
            }
            Entry::Vacant(slot) => {
                // Another load may have populated the key after the first lookup.
                if let Some(hit) = self.cache.peek(&key) {
                    return Ok(hit);
                }

                let id = self.next_flight_id.fetch_add(1, AtomicOrdering::Relaxed);
                let fetch = self.spawn_load(key.clone(), id, ttl, loader());
                slot.insert(InFlight {
                    id,
                    fetch: fetch.clone(),
                });
                fetch
            }
        };

        fetch.await
    }

    fn spawn_load<Fut>(&self, key: CacheKey, id: u64, ttl: Duration, load: Fut) -> SharedFetch<V>
    where
        Fut: Future<Output = Result<V, DomainError>> + Send + 'static,
    {
        let cache = Arc::clone(&self.cache);
        let in_flight = Arc::clone(&self.in_flight);
        let gate = Arc::clone(&self.populate_gate);
        let task_key = key.clone();

        debug!(key = %key, flight = id, "Starting backend fetch");

        let handle = tokio::spawn(async move {
            let outcome = load.await.map(Arc::new);

            match &outcome {
                Ok(payload) => {
                    let _gate = gate.lock().unwrap_or_else(PoisonError::into_inner);
                    let registered = in_flight
                        .get(&task_key)
                        .is_some_and(|flight| flight.id == id);

                    // Store before deregistering so a caller arriving in
                    // between finds the payload instead of starting a load.
                    if registered {
                        cache.put_shared(task_key.clone(), Arc::clone(payload), ttl);
                        in_flight.remove_if(&task_key, |_, flight| flight.id == id);
                    } else {
                        debug!(key = %task_key, "Invalidated during fetch, result not cached");
                    }
                }
                Err(e) => {
                    warn!(key = %task_key, error = %e, "Backend fetch failed");
                    in_flight.remove_if(&task_key, |_, flight| flight.id == id);
                }
            }

            outcome
        });

        let in_flight = Arc::clone(&self.in_flight);
        async move {
            match handle.await {
                Ok(outcome) => outcome,
                Err(join_error) => {
                    warn!(key = %key, error = %join_error, "Fetch task did not complete");
                    in_flight.remove_if(&key, |_, flight| flight.id == id);
                    if join_error.is_panic() {
                        Err(DomainError::BackendRejected(format!(
                            "loader for {} panicked",
                            key
                        )))
                    } else {
                        Err(DomainError::Cancelled)
                    }
                }
            }
        }
        .boxed()
        .shared()
    }

    /// Drops the given keys from the cache and from the in-flight table.
    pub fn invalidate_keys(&self, keys: &[CacheKey]) -> usize {
        let _gate = self.lock_gate();
        self.in_flight.retain(|key, _| !keys.contains(key));
        let removed = self.cache.invalidate(keys);
        debug!(keys = keys.len(), removed = removed, "Invalidated keys");
        removed
    }

    pub fn invalidate_matching<P>(&self, predicate: P) -> usize
    where
        P: Fn(&CacheKey) -> bool,
    {
        let _gate = self.lock_gate();
        self.in_flight.retain(|key, _| !predicate(key));
        self.cache.invalidate_matching(&predicate)
    }

    /// Drops every key produced by `operation`.
    pub fn invalidate_prefix(&self, operation: &str) -> usize {
        let removed = self.invalidate_matching(|key| key.belongs_to(operation));
        debug!(operation = operation, removed = removed, "Invalidated operation");
        removed
    }

    pub fn clear(&self) -> usize {
        let _gate = self.lock_gate();
        self.in_flight.clear();
        self.cache.clear()
    }

    pub fn in_flight_count(&self) -> usize {
        self.in_flight.len()
    }

    pub fn is_in_flight(&self, key: &CacheKey) -> bool {
        self.in_flight.contains_key(key)
    }

    pub fn cache(&self) -> &Arc<ResponseCache<V>> {
        &self.cache
    }

    fn lock_gate(&self) -> MutexGuard<'_, ()> {
        self.populate_gate
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
