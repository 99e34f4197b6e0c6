//! Token metadata, token lists, and fee/validation properties.

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

use super::ChainId;

/// An ERC-20 token on one chain.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    pub chain_id: ChainId,
    pub address: Address,
    pub symbol: String,
    pub decimals: u8,
}

/// A token list document in the common `tokenlists.org` layout.
///
/// Unknown fields (logos, tags, extensions) are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenList {
    pub name: String,
    #[serde(default)]
    pub tokens: Vec<TokenListEntry>,
}

impl TokenList {
    /// An empty list with the given name.
    #[must_use]
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tokens: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenListEntry {
    pub chain_id: ChainId,
    pub address: Address,
    pub symbol: String,
    pub decimals: u8,
    #[serde(default)]
    pub name: Option<String>,
}

impl TokenListEntry {
    #[must_use]
    pub fn to_token(&self) -> Token {
        Token {
            chain_id: self.chain_id,
            address: self.address,
            symbol: self.symbol.clone(),
            decimals: self.decimals,
        }
    }
}

/// Outcome of validating a token contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TokenValidationResult {
    /// Behaves like a standard ERC-20.
    Unknown,
    /// Charges a fee on transfer.
    FeeOnTransfer,
    /// The contract could not be inspected.
    Unreachable,
}

/// Buy/sell fees detected for a token, in basis points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenFee {
    pub buy_fee_bps: u32,
    pub sell_fee_bps: u32,
    pub fee_taken_on_transfer: bool,
    pub external_transfer_failed: bool,
    pub sell_reverted: bool,
}

impl TokenFee {
    #[must_use]
    pub fn has_fee(&self) -> bool {
        self.buy_fee_bps > 0 || self.sell_fee_bps > 0 || self.fee_taken_on_transfer
    }
}

/// Everything the router needs to know about a token beyond its metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenProperties {
    pub validation: TokenValidationResult,
    #[serde(default)]
    pub fee: Option<TokenFee>,
}

impl TokenProperties {
    /// Properties for a token with no known fee behaviour.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            validation: TokenValidationResult::Unknown,
            fee: None,
        }
    }

    /// Derive properties from a fee detection result.
    #[must_use]
    pub fn from_fee(fee: TokenFee) -> Self {
        let validation = if fee.has_fee() {
            TokenValidationResult::FeeOnTransfer
        } else {
            TokenValidationResult::Unknown
        };
        Self {
            validation,
            fee: Some(fee),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_list_ignores_unknown_fields() {
        let json = r#"{
            "name": "Example",
            "timestamp": "2024-01-01T00:00:00Z",
            "version": {"major": 1, "minor": 0, "patch": 0},
            "tokens": [{
                "chainId": 1,
                "address": "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48",
                "symbol": "USDC",
                "name": "USD Coin",
                "decimals": 6,
                "logoURI": "https://example.invalid/usdc.png"
            }]
        }"#;
        let list: TokenList = serde_json::from_str(json).unwrap();
        assert_eq!(list.tokens.len(), 1);
        let token = list.tokens[0].to_token();
        assert_eq!(token.symbol, "USDC");
        assert_eq!(token.decimals, 6);
        assert_eq!(token.chain_id, ChainId::MAINNET);
    }

    #[test]
    fn fee_properties_flag_fee_on_transfer() {
        let fee = TokenFee {
            buy_fee_bps: 0,
            sell_fee_bps: 300,
            fee_taken_on_transfer: false,
            external_transfer_failed: false,
            sell_reverted: false,
        };
        let properties = TokenProperties::from_fee(fee);
        assert_eq!(properties.validation, TokenValidationResult::FeeOnTransfer);

        let no_fee = TokenFee {
            sell_fee_bps: 0,
            ..fee
        };
        assert_eq!(
            TokenProperties::from_fee(no_fee).validation,
            TokenValidationResult::Unknown
        );
    }
}
