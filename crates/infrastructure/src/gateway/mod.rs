pub mod rows;
pub mod sqlite;

pub use sqlite::SqliteAggregationGateway;
