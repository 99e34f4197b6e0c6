//! Token properties cache facade.

use std::sync::Arc;

use alloy_primitives::Address;
use async_trait::async_trait;
use tracing::error;

use super::key::token_properties_key;
use crate::adapter::outbound::sqlite::CacheStore;
use crate::domain::{ChainId, TokenProperties};
use crate::port::TokenPropertiesCacheProvider;

/// Default lifetime of cached token properties.
pub const TOKEN_PROPERTIES_TTL_SECS: i64 = 3600;

pub struct TokenPropertiesCache {
    store: Arc<CacheStore>,
    ttl_secs: i64,
}

impl TokenPropertiesCache {
    pub fn new(store: Arc<CacheStore>) -> Self {
        Self {
            store,
            ttl_secs: TOKEN_PROPERTIES_TTL_SECS,
        }
    }
}

#[async_trait]
impl TokenPropertiesCacheProvider for TokenPropertiesCache {
    async fn get_token_properties(
        &self,
        chain_id: ChainId,
        token: &Address,
    ) -> Option<TokenProperties> {
        match self.store.get(&token_properties_key(chain_id, token)).await {
            Ok(properties) => properties,
            Err(e) => {
                error!(error = %e, %chain_id, %token, "Error getting token properties from cache");
                None
            }
        }
    }

    async fn set_token_properties(
        &self,
        chain_id: ChainId,
        token: &Address,
        properties: &TokenProperties,
    ) {
        let key = token_properties_key(chain_id, token);
        if let Err(e) = self.store.set(&key, properties, self.ttl_secs).await {
            error!(error = %e, %chain_id, %token, "Error setting token properties in cache");
        }
    }
}
