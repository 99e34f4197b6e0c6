//! Operator implementations for inbound adapters.

pub mod entry;
pub mod maintenance;
pub mod runtime;
pub mod status;

mod shared;
