pub mod aggregation_gateway;
pub mod watchlist_repository;

pub use aggregation_gateway::AggregationGateway;
pub use watchlist_repository::WatchlistRepository;
