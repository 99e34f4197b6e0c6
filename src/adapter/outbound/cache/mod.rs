//! Cache provider facades over the persistent cache store.
//!
//! Each facade computes namespaced keys and applies its domain TTL. Store
//! failures are logged and reported as misses; they never reach the caller.

pub mod key;
pub mod pool;
pub mod route;
pub mod token;

pub use pool::{V2PairCache, V3PoolCache, POOL_TTL_SECS};
pub use route::{RouteCache, ROUTE_TTL_SECS};
pub use token::{TokenPropertiesCache, TOKEN_PROPERTIES_TTL_SECS};
