//! Outbound adapters (driven side).

pub mod cache;
pub mod evm;
pub mod memory;
pub mod sqlite;
pub mod subgraph;
pub mod tokenlist;
