use crate::cache_key::CacheKey;
use crate::operation::{EntityKind, Operation};

/// What to drop from the response cache after a mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidationScope {
    Keys(Vec<CacheKey>),
    Operation(Operation),
    /// Every operation that reads this entity kind.
    Entity(EntityKind),
    All,
}

impl InvalidationScope {
    pub fn key(key: CacheKey) -> Self {
        InvalidationScope::Keys(vec![key])
    }
}
