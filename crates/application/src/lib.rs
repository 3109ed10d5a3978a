//! Ferrous Watchlist Application Layer
pub mod cache;
pub mod pagination;
pub mod ports;
pub mod services;
pub mod use_cases;
