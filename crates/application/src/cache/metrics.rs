use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

#[derive(Debug, Default)]
pub struct CacheMetrics {
    pub hits: AtomicU64,
    pub misses: AtomicU64,
    pub insertions: AtomicU64,
    pub evictions: AtomicU64,
    pub expirations: AtomicU64,
    pub invalidations: AtomicU64,
}

impl CacheMetrics {
    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits.load(AtomicOrdering::Relaxed) as f64;
        let total = hits + self.misses.load(AtomicOrdering::Relaxed) as f64;

        if total > 0.0 {
            (hits / total) * 100.0
        } else {
            0.0
        }
    }

    pub fn reset(&self) {
        self.hits.store(0, AtomicOrdering::Relaxed);
        self.misses.store(0, AtomicOrdering::Relaxed);
        self.insertions.store(0, AtomicOrdering::Relaxed);
        self.evictions.store(0, AtomicOrdering::Relaxed);
        self.expirations.store(0, AtomicOrdering::Relaxed);
        self.invalidations.store(0, AtomicOrdering::Relaxed);
    }
}
