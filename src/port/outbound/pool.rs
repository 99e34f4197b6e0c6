//! Pool and subgraph provider ports.

use async_trait::async_trait;
use alloy_primitives::Address;

use crate::domain::{PoolKeyed, Protocol, SubgraphPool};
use crate::error::Result;

/// Fetches pool state snapshots for one protocol version.
#[async_trait]
pub trait PoolProvider<P: PoolKeyed>: Send + Sync {
    /// Fetch the pools identified by `keys`, optionally pinned to a block.
    ///
    /// Pools that do not exist or cannot be decoded are left out of the result.
    async fn get_pools(&self, keys: &[P::Key], block_number: Option<u64>) -> Result<Vec<P>>;
}

/// Serves candidate pools for route search.
#[async_trait]
pub trait SubgraphProvider: Send + Sync {
    fn protocol(&self) -> Protocol;

    /// Candidate pools, narrowed to those touching either token when given.
    async fn get_pools(
        &self,
        token_in: Option<Address>,
        token_out: Option<Address>,
    ) -> Result<Vec<SubgraphPool>>;
}
