//! Caching decorator for gas price providers.

use std::sync::Arc;

use async_trait::async_trait;

use super::ttl::TtlCache;
use crate::domain::GasPrice;
use crate::error::Result;
use crate::port::{Clock, GasPriceProvider};

/// Serves the last gas price per requested block for a short ttl.
pub struct CachingGasPriceProvider {
    inner: Arc<dyn GasPriceProvider>,
    cache: TtlCache<Option<u64>, GasPrice>,
}

impl CachingGasPriceProvider {
    pub fn new(inner: Arc<dyn GasPriceProvider>, ttl_secs: u64, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner,
            cache: TtlCache::new(ttl_secs, clock),
        }
    }
}

#[async_trait]
impl GasPriceProvider for CachingGasPriceProvider {
    async fn gas_price(&self, block_number: Option<u64>) -> Result<GasPrice> {
        if let Some(price) = self.cache.get(&block_number) {
            return Ok(price);
        }
        let price = self.inner.gas_price(block_number).await?;
        self.cache.insert(block_number, price);
        Ok(price)
    }
}
