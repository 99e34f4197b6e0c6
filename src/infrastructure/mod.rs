//! Infrastructure layer.
//!
//! Provides technical concerns that support the application without containing
//! business logic: configuration, container assembly, store maintenance, and
//! the operator surface the CLI drives.
//!
//! # Submodules
//!
//! - [`builder`] - Concurrent per-chain container builder
//! - [`config`] - Configuration loading and validation
//! - [`maintenance`] - Periodic cache store cleanup
//! - [`operator`] - CLI operator interface

pub mod builder;
pub mod config;
pub mod maintenance;
pub mod operator;
