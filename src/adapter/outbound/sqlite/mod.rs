//! SQLite persistence adapter.
//!
//! Provides the SQLite-backed cache store using Diesel ORM.

pub mod database;
pub mod store;

pub use store::{CacheStore, StoreOptions, DEFAULT_ROUTE_TTL_SECS};
