// Response cache - sharded storage, recency eviction, per-entry TTL

pub mod entry;
pub mod eviction;
pub mod metrics;
pub mod storage;
pub mod weight;

pub use entry::CacheEntry;
pub use eviction::EvictionEntry;
pub use metrics::CacheMetrics;
pub use storage::ResponseCache;
pub use weight::CacheWeight;
