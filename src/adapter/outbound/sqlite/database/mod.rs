//! SQLite database modules.
//!
//! Provides connection management, schema definitions, and Diesel model
//! types for the cache store.

pub mod connection;
pub mod model;
pub mod schema;
