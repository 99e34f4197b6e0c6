//! Token metadata, token list, validation, and fee ports.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use alloy_primitives::Address;

use crate::domain::{Token, TokenFee, TokenList, TokenProperties, TokenValidationResult};
use crate::error::Result;

/// Resolves token metadata by address.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Tokens that could be resolved; unknown addresses are omitted.
    async fn get_tokens(&self, addresses: &[Address]) -> Result<Vec<Token>>;
}

/// A named list of tokens for one chain.
#[async_trait]
pub trait TokenListProvider: Send + Sync {
    async fn token_list(&self) -> Arc<TokenList>;

    async fn token_by_address(&self, address: &Address) -> Option<Token>;

    async fn contains(&self, address: &Address) -> bool {
        self.token_by_address(address).await.is_some()
    }
}

#[async_trait]
pub trait TokenValidator: Send + Sync {
    async fn validate(
        &self,
        tokens: &[Address],
    ) -> Result<HashMap<Address, TokenValidationResult>>;
}

/// Detects buy/sell fees charged by token contracts.
#[async_trait]
pub trait TokenFeeFetcher: Send + Sync {
    async fn fetch_fees(&self, tokens: &[Address]) -> Result<HashMap<Address, TokenFee>>;
}

#[async_trait]
pub trait TokenPropertiesProvider: Send + Sync {
    async fn get_properties(
        &self,
        tokens: &[Address],
    ) -> Result<HashMap<Address, TokenProperties>>;
}
