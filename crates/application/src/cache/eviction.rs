use ferrous_watchlist_domain::CacheKey;
use std::cmp::Ordering;

/// Eviction candidate. Orders least recently used first, ties broken by key
/// so a fixed access sequence always evicts the same entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvictionEntry {
    pub key: CacheKey,
    pub last_access: u64,
}

impl PartialOrd for EvictionEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EvictionEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.last_access
            .cmp(&other.last_access)
            .then_with(|| self.key.cmp(&other.key))
    }
}
