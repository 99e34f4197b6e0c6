//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`clock`] - [`ManualClock`](clock::ManualClock) for expiry tests.
//! - [`config`] - Canonical test configurations and temp-dir stores.
//! - [`graph`] - Loaded chain graphs backed by inert collaborators.
//! - [`provider`] - Counting stub providers for decorator tests.

pub mod clock;
pub mod config;
pub mod graph;
pub mod provider;
