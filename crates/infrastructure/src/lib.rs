//! Ferrous Watchlist Infrastructure Layer
pub mod database;
pub mod gateway;
pub mod repositories;
