#![allow(dead_code)]
#![allow(unused_imports)]

pub mod mock_gateway;
pub mod mock_page_loader;
pub mod mock_repository;

pub use mock_gateway::*;
pub use mock_page_loader::*;
pub use mock_repository::*;

use std::time::Duration;

/// Yields until `probe` holds. Panics after a generous bound so a broken
/// test fails instead of hanging.
pub async fn wait_until<F: Fn() -> bool>(probe: F) {
    for _ in 0..10_000 {
        if probe() {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("condition not reached");
}

pub const LONG_TTL: Duration = Duration::from_secs(3600);
