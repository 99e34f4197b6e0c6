//! In-memory token providers and caching decorators.

use std::collections::HashMap;
use std::sync::Arc;

use alloy_primitives::Address;
use async_trait::async_trait;
use tracing::{debug, warn};

use super::ttl::TtlCache;
use crate::domain::{ChainId, Token, TokenList, TokenProperties, TokenValidationResult};
use crate::error::Result;
use crate::port::{
    Clock, TokenFeeFetcher, TokenListProvider, TokenPropertiesProvider, TokenProvider,
    TokenValidator,
};

/// Token list provider over a list held in memory, indexed by address.
///
/// Only entries for `chain_id` are served.
pub struct CachingTokenListProvider {
    list: Arc<TokenList>,
    by_address: HashMap<Address, Token>,
}

impl CachingTokenListProvider {
    #[must_use]
    pub fn from_list(chain_id: ChainId, list: TokenList) -> Self {
        let by_address = list
            .tokens
            .iter()
            .filter(|entry| entry.chain_id == chain_id)
            .map(|entry| (entry.address, entry.to_token()))
            .collect();
        Self {
            list: Arc::new(list),
            by_address,
        }
    }

    /// Number of tokens served for this chain.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_address.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_address.is_empty()
    }
}

#[async_trait]
impl TokenListProvider for CachingTokenListProvider {
    async fn token_list(&self) -> Arc<TokenList> {
        Arc::clone(&self.list)
    }

    async fn token_by_address(&self, address: &Address) -> Option<Token> {
        self.by_address.get(address).cloned()
    }
}

/// Token provider that consults the token list and an in-memory cache before
/// falling back to on-chain lookups.
pub struct CachingTokenProvider {
    chain_id: ChainId,
    list: Arc<dyn TokenListProvider>,
    fallback: Arc<dyn TokenProvider>,
    cache: TtlCache<Address, Token>,
}

impl CachingTokenProvider {
    pub fn new(
        chain_id: ChainId,
        list: Arc<dyn TokenListProvider>,
        fallback: Arc<dyn TokenProvider>,
        ttl_secs: u64,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            chain_id,
            list,
            fallback,
            cache: TtlCache::new(ttl_secs, clock),
        }
    }
}

#[async_trait]
impl TokenProvider for CachingTokenProvider {
    async fn get_tokens(&self, addresses: &[Address]) -> Result<Vec<Token>> {
        let mut tokens = Vec::with_capacity(addresses.len());
        let mut unresolved = Vec::new();
        for address in addresses {
            if let Some(token) = self.list.token_by_address(address).await {
                tokens.push(token);
            } else if let Some(token) = self.cache.get(address) {
                tokens.push(token);
            } else {
                unresolved.push(*address);
            }
        }

        if unresolved.is_empty() {
            return Ok(tokens);
        }

        debug!(chain_id = %self.chain_id, count = unresolved.len(), "Fetching tokens on-chain");
        let fetched = self.fallback.get_tokens(&unresolved).await?;
        for token in &fetched {
            self.cache.insert(token.address, token.clone());
        }
        tokens.extend(fetched);
        Ok(tokens)
    }
}

/// Remembers validation results so each token is checked once per ttl.
pub struct CachingTokenValidator {
    inner: Arc<dyn TokenValidator>,
    cache: TtlCache<Address, TokenValidationResult>,
}

impl CachingTokenValidator {
    pub fn new(inner: Arc<dyn TokenValidator>, ttl_secs: u64, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner,
            cache: TtlCache::new(ttl_secs, clock),
        }
    }
}

#[async_trait]
impl TokenValidator for CachingTokenValidator {
    async fn validate(
        &self,
        tokens: &[Address],
    ) -> Result<HashMap<Address, TokenValidationResult>> {
        let mut results = HashMap::with_capacity(tokens.len());
        let mut misses = Vec::new();
        for token in tokens {
            match self.cache.get(token) {
                Some(result) => {
                    results.insert(*token, result);
                }
                None => misses.push(*token),
            }
        }
        if misses.is_empty() {
            return Ok(results);
        }

        for (token, result) in self.inner.validate(&misses).await? {
            self.cache.insert(token, result);
            results.insert(token, result);
        }
        Ok(results)
    }
}

/// Derives token properties from detected fees, caching the outcome.
///
/// When fee detection fails the tokens are reported as standard and left
/// uncached so the next request tries again.
pub struct CachingTokenPropertiesProvider {
    chain_id: ChainId,
    fees: Arc<dyn TokenFeeFetcher>,
    cache: TtlCache<Address, TokenProperties>,
}

impl CachingTokenPropertiesProvider {
    pub fn new(
        chain_id: ChainId,
        fees: Arc<dyn TokenFeeFetcher>,
        ttl_secs: u64,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            chain_id,
            fees,
            cache: TtlCache::new(ttl_secs, clock),
        }
    }
}

#[async_trait]
impl TokenPropertiesProvider for CachingTokenPropertiesProvider {
    async fn get_properties(
        &self,
        tokens: &[Address],
    ) -> Result<HashMap<Address, TokenProperties>> {
        let mut properties = HashMap::with_capacity(tokens.len());
        let mut misses = Vec::new();
        for token in tokens {
            match self.cache.get(token) {
                Some(cached) => {
                    properties.insert(*token, cached);
                }
                None => misses.push(*token),
            }
        }
        if misses.is_empty() {
            return Ok(properties);
        }

        match self.fees.fetch_fees(&misses).await {
            Ok(mut fees) => {
                for token in misses {
                    let resolved = fees
                        .remove(&token)
                        .map_or_else(TokenProperties::standard, TokenProperties::from_fee);
                    self.cache.insert(token, resolved.clone());
                    properties.insert(token, resolved);
                }
            }
            Err(e) => {
                warn!(chain_id = %self.chain_id, error = %e, "Token fee detection failed");
                for token in misses {
                    properties.insert(token, TokenProperties::standard());
                }
            }
        }
        Ok(properties)
    }
}
