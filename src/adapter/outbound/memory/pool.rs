//! Caching decorator for pool providers.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::ttl::TtlCache;
use crate::domain::{ChainId, PoolKeyed};
use crate::error::Result;
use crate::port::{Clock, PoolProvider};

/// Serves pool snapshots from memory and fetches only the misses.
///
/// Entries are keyed by pool and requested block, so a pinned-block read never
/// returns a snapshot taken at another height.
pub struct CachingPoolProvider<P: PoolKeyed> {
    chain_id: ChainId,
    inner: Arc<dyn PoolProvider<P>>,
    cache: TtlCache<(P::Key, Option<u64>), P>,
}

impl<P: PoolKeyed> CachingPoolProvider<P> {
    pub fn new(
        chain_id: ChainId,
        inner: Arc<dyn PoolProvider<P>>,
        ttl_secs: u64,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            chain_id,
            inner,
            cache: TtlCache::new(ttl_secs, clock),
        }
    }

    /// Snapshots currently held in memory, including expired ones not yet swept.
    #[must_use]
    pub fn cached_entries(&self) -> usize {
        self.cache.len()
    }
}

#[async_trait]
impl<P: PoolKeyed> PoolProvider<P> for CachingPoolProvider<P> {
    async fn get_pools(&self, keys: &[P::Key], block_number: Option<u64>) -> Result<Vec<P>> {
        let cache_keys: Vec<_> = keys.iter().map(|k| (k.clone(), block_number)).collect();
        let (mut pools, misses) = self.cache.get_many(&cache_keys);

        debug!(
            chain_id = %self.chain_id,
            hits = pools.len(),
            misses = misses.len(),
            entries = self.cache.len(),
            "Pool cache lookup"
        );
        if misses.is_empty() {
            return Ok(pools);
        }

        let missing: Vec<P::Key> = misses.into_iter().map(|(key, _)| key).collect();
        let fetched = self.inner.get_pools(&missing, block_number).await?;
        for pool in &fetched {
            self.cache
                .insert((pool.pool_key(), block_number), pool.clone());
        }
        pools.extend(fetched);
        Ok(pools)
    }
}
