pub mod aggregate_service;
pub mod fetch_coordinator;

pub use aggregate_service::AggregateService;
pub use fetch_coordinator::FetchCoordinator;
