//! Infrastructure configuration modules.

pub mod cache;
pub mod logging;
pub mod resolver;
pub mod rpc;
pub mod settings;
pub mod store;
pub mod subgraph;
pub mod token;
