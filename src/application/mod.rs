//! Application services (use cases).
//!
//! The chain container and the request-time resolver that reads it. Both
//! depend only on ports and domain types.

pub mod container;
pub mod resolver;
