//! Route cache facade.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::error;

use super::key::{route_key, routes_key};
use crate::adapter::outbound::sqlite::CacheStore;
use crate::port::{RouteCacheKey, RouteCachingProvider};

/// Default lifetime of a cached route.
pub const ROUTE_TTL_SECS: i64 = 300;

/// Caches computed routes in the persistent store.
pub struct RouteCache {
    store: Arc<CacheStore>,
    ttl_secs: i64,
}

impl RouteCache {
    pub fn new(store: Arc<CacheStore>) -> Self {
        Self {
            store,
            ttl_secs: ROUTE_TTL_SECS,
        }
    }

    #[must_use]
    pub fn with_ttl(mut self, ttl_secs: i64) -> Self {
        self.ttl_secs = ttl_secs;
        self
    }
}

#[async_trait]
impl RouteCachingProvider for RouteCache {
    async fn get_cached_route(&self, key: &RouteCacheKey) -> Option<serde_json::Value> {
        match self.store.get(&route_key(key)).await {
            Ok(route) => route,
            Err(e) => {
                error!(
                    error = %e,
                    chain_id = %key.chain_id,
                    amount = %key.amount,
                    quote_token = %key.quote_token,
                    "Error getting cached route"
                );
                None
            }
        }
    }

    async fn set_cached_route(&self, key: &RouteCacheKey, route: &serde_json::Value) {
        if let Err(e) = self.store.set(&route_key(key), route, self.ttl_secs).await {
            error!(
                error = %e,
                chain_id = %key.chain_id,
                amount = %key.amount,
                quote_token = %key.quote_token,
                "Error setting cached route"
            );
        }
    }

    async fn get_cached_routes(&self, key: &RouteCacheKey) -> Option<Vec<serde_json::Value>> {
        match self.store.get(&routes_key(key)).await {
            Ok(routes) => routes,
            Err(e) => {
                error!(
                    error = %e,
                    chain_id = %key.chain_id,
                    amount = %key.amount,
                    quote_token = %key.quote_token,
                    "Error getting cached routes"
                );
                None
            }
        }
    }

    async fn set_cached_routes(&self, key: &RouteCacheKey, routes: &[serde_json::Value]) {
        if let Err(e) = self.store.set(&routes_key(key), routes, self.ttl_secs).await {
            error!(
                error = %e,
                chain_id = %key.chain_id,
                amount = %key.amount,
                quote_token = %key.quote_token,
                "Error setting cached routes"
            );
        }
    }
}
