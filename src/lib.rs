//! Routekeeper - persistent route cache and per-chain provider container for
//! a local swap routing service.
//!
//! # Architecture
//!
//! The crate follows a hexagonal layout:
//!
//! - **`domain`** - Chain ids, pool and token snapshots, cache records, and
//!   the immutable tuning table
//! - **`port`** - Traits between the container and its collaborators, plus
//!   the operator surface the CLI drives
//! - **`adapter`** - SQLite cache store and facades, EVM providers, in-memory
//!   ttl decorators, token lists, and the CLI
//! - **`application`** - The chain container and request-time resolver
//! - **`infrastructure`** - Configuration, the concurrent container builder,
//!   store maintenance, and the operator implementation
//!
//! # Example
//!
//! ```no_run
//! use routekeeper::infrastructure::builder::ContainerBuilder;
//! use routekeeper::infrastructure::config::settings::Config;
//!
//! # async fn run() -> routekeeper::error::Result<()> {
//! let config = Config::load_or_default("config.toml")?;
//! let container = ContainerBuilder::new(config).build().await?;
//! println!("loaded chains: {:?}", container.loaded_chains());
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
