//! Outbound ports (driven side): interfaces implemented by outbound adapters.
//!
//! These contracts describe the collaborators a chain dependency graph is
//! assembled from, plus the cache ports the routing engine consumes.

pub mod cache;
pub mod clock;
pub mod gas;
pub mod pool;
pub mod quote;
pub mod rpc;
pub mod token;
