//! Configuration module for Ferrous Watchlist
//!
//! - `root`: Main configuration, loading and CLI overrides
//! - `database`: SQLite backend connection settings
//! - `backend`: Aggregation call timeout
//! - `cache`: Response cache ceilings and the per-operation TTL table
//! - `pagination`: Incremental loading defaults
//! - `logging`: Logging settings
//! - `errors`: Configuration errors

pub mod backend;
pub mod cache;
pub mod database;
pub mod errors;
pub mod logging;
pub mod pagination;
pub mod root;

pub use backend::BackendConfig;
pub use cache::{CacheConfig, TtlTable};
pub use database::DatabaseConfig;
pub use errors::ConfigError;
pub use logging::LoggingConfig;
pub use pagination::PaginationConfig;
pub use root::{CliOverrides, Config};
