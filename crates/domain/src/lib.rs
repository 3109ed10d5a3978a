//! Ferrous Watchlist Domain Layer
pub mod aggregate;
pub mod cache_key;
pub mod cache_stats;
pub mod config;
pub mod errors;
pub mod invalidation;
pub mod operation;
pub mod page;
pub mod watchlist;

pub use aggregate::{
    AggregateQuery, AggregateResult, FirstOccurrence, GoalItem, GoalList, ListItemStatus,
    ListSummary, PageWindow, ReverseMapping,
};
pub use cache_key::{CacheKey, ParamValue};
pub use cache_stats::CacheStats;
pub use config::{CliOverrides, Config, ConfigError};
pub use errors::DomainError;
pub use invalidation::InvalidationScope;
pub use operation::{EntityKind, Operation};
pub use page::Page;
pub use watchlist::{ListCategory, NewList, NewListItem, NewWatchEvent};
