//! On-chain token metadata, validation, and fee detection.

use std::collections::HashMap;
use std::sync::Arc;

use alloy_primitives::{Address, B256, U256};
use alloy_sol_types::sol;
use async_trait::async_trait;
use tracing::debug;

use crate::domain::{ChainId, Token, TokenFee, TokenValidationResult};
use crate::error::Result;
use crate::port::{
    CallOutcome, Multicall, MulticallCall, TokenFeeFetcher, TokenProvider, TokenValidator,
};

sol! {
    interface IERC20Metadata {
        function symbol() external view returns (string);
        function decimals() external view returns (uint8);
    }

    interface IERC20Bytes32 {
        function symbol() external view returns (bytes32);
    }

    interface ITokenValidator {
        function validate(address token, address[] baseTokens, uint256 amountToBorrow) external returns (uint8);
    }

    interface ITokenFeeDetector {
        struct TokenFees {
            uint256 buyFeeBps;
            uint256 sellFeeBps;
            bool feeTakenOnTransfer;
            bool externalTransferFailed;
            bool sellReverted;
        }

        function validate(address token, address baseToken, uint256 amountToBorrow) external returns (TokenFees memory);
    }
}

/// A deployed helper contract that exercises token transfer behaviour by
/// borrowing `amount_to_borrow` against one of `base_tokens`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectorContract {
    pub address: Address,
    pub base_tokens: Vec<Address>,
    pub amount_to_borrow: U256,
}

/// ERC-20 `symbol` and `decimals` through the multicall client.
pub struct OnChainTokenProvider {
    chain_id: ChainId,
    multicall: Arc<dyn Multicall>,
}

impl OnChainTokenProvider {
    pub fn new(chain_id: ChainId, multicall: Arc<dyn Multicall>) -> Self {
        Self {
            chain_id,
            multicall,
        }
    }
}

#[async_trait]
impl TokenProvider for OnChainTokenProvider {
    async fn get_tokens(&self, addresses: &[Address]) -> Result<Vec<Token>> {
        let calls: Vec<MulticallCall> = addresses
            .iter()
            .flat_map(|token| {
                [
                    MulticallCall::new(*token, &IERC20Metadata::symbolCall {}),
                    MulticallCall::new(*token, &IERC20Metadata::decimalsCall {}),
                ]
            })
            .collect();
        let outcomes = self.multicall.aggregate(&calls, None).await?;

        let tokens = addresses
            .iter()
            .zip(outcomes.chunks(2))
            .filter_map(|(address, out)| {
                let token = decode_token(self.chain_id, *address, out);
                if token.is_none() {
                    debug!(
                        chain_id = %self.chain_id,
                        token = %address,
                        "Token metadata unavailable"
                    );
                }
                token
            })
            .collect();
        Ok(tokens)
    }
}

fn decode_token(chain_id: ChainId, address: Address, out: &[CallOutcome]) -> Option<Token> {
    let symbol_out = out.first()?;
    let symbol = symbol_out
        .decode::<IERC20Metadata::symbolCall>()
        .or_else(|| {
            symbol_out
                .decode::<IERC20Bytes32::symbolCall>()
                .map(bytes32_symbol)
        })?;
    let decimals = out.get(1)?.decode::<IERC20Metadata::decimalsCall>()?;
    Some(Token {
        chain_id,
        address,
        symbol,
        decimals,
    })
}

/// Older tokens return their symbol as a zero-padded `bytes32`.
fn bytes32_symbol(raw: B256) -> String {
    let end = raw.iter().position(|b| *b == 0).unwrap_or(raw.len());
    String::from_utf8_lossy(&raw[..end]).into_owned()
}

/// Classifies tokens with a validator contract.
///
/// Without a configured contract every token is reported as
/// [`TokenValidationResult::Unknown`].
pub struct OnChainTokenValidator {
    multicall: Arc<dyn Multicall>,
    contract: Option<DetectorContract>,
}

impl OnChainTokenValidator {
    pub fn new(multicall: Arc<dyn Multicall>, contract: Option<DetectorContract>) -> Self {
        Self {
            multicall,
            contract,
        }
    }
}

#[async_trait]
impl TokenValidator for OnChainTokenValidator {
    async fn validate(
        &self,
        tokens: &[Address],
    ) -> Result<HashMap<Address, TokenValidationResult>> {
        let Some(contract) = &self.contract else {
            return Ok(tokens
                .iter()
                .map(|t| (*t, TokenValidationResult::Unknown))
                .collect());
        };

        let calls: Vec<MulticallCall> = tokens
            .iter()
            .map(|token| {
                MulticallCall::new(
                    contract.address,
                    &ITokenValidator::validateCall {
                        token: *token,
                        baseTokens: contract.base_tokens.clone(),
                        amountToBorrow: contract.amount_to_borrow,
                    },
                )
            })
            .collect();
        let outcomes = self.multicall.aggregate(&calls, None).await?;

        Ok(tokens
            .iter()
            .zip(&outcomes)
            .map(|(token, out)| {
                let status = out.decode::<ITokenValidator::validateCall>();
                (*token, validation_status(status))
            })
            .collect())
    }
}

fn validation_status(status: Option<u8>) -> TokenValidationResult {
    match status {
        Some(0) => TokenValidationResult::Unknown,
        Some(1) => TokenValidationResult::FeeOnTransfer,
        _ => TokenValidationResult::Unreachable,
    }
}

/// Detects buy and sell fees with a fee detector contract.
///
/// Without a configured contract no fees are reported. Tokens whose check
/// reverts are left out of the result.
pub struct OnChainTokenFeeFetcher {
    multicall: Arc<dyn Multicall>,
    contract: Option<DetectorContract>,
}

impl OnChainTokenFeeFetcher {
    pub fn new(multicall: Arc<dyn Multicall>, contract: Option<DetectorContract>) -> Self {
        Self {
            multicall,
            contract,
        }
    }
}

#[async_trait]
impl TokenFeeFetcher for OnChainTokenFeeFetcher {
    async fn fetch_fees(&self, tokens: &[Address]) -> Result<HashMap<Address, TokenFee>> {
        let Some(contract) = &self.contract else {
            return Ok(HashMap::new());
        };
        let Some(base_token) = contract.base_tokens.first().copied() else {
            return Ok(HashMap::new());
        };

        let checked: Vec<Address> = tokens
            .iter()
            .copied()
            .filter(|token| *token != base_token)
            .collect();
        let calls: Vec<MulticallCall> = checked
            .iter()
            .map(|token| {
                MulticallCall::new(
                    contract.address,
                    &ITokenFeeDetector::validateCall {
                        token: *token,
                        baseToken: base_token,
                        amountToBorrow: contract.amount_to_borrow,
                    },
                )
            })
            .collect();
        let outcomes = self.multicall.aggregate(&calls, None).await?;

        Ok(checked
            .iter()
            .zip(&outcomes)
            .filter_map(|(token, out)| {
                let fees = out.decode::<ITokenFeeDetector::validateCall>()?;
                Some((*token, token_fee(&fees)))
            })
            .collect())
    }
}

fn token_fee(fees: &ITokenFeeDetector::TokenFees) -> TokenFee {
    TokenFee {
        buy_fee_bps: u32::try_from(fees.buyFeeBps).unwrap_or(u32::MAX),
        sell_fee_bps: u32::try_from(fees.sellFeeBps).unwrap_or(u32::MAX),
        fee_taken_on_transfer: fees.feeTakenOnTransfer,
        external_transfer_failed: fees.externalTransferFailed,
        sell_reverted: fees.sellReverted,
    }
}
