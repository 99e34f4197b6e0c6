//! Gas price and transaction simulation ports.

use async_trait::async_trait;
use alloy_primitives::{Address, Bytes, U256};

use crate::domain::GasPrice;
use crate::error::Result;

#[async_trait]
pub trait GasPriceProvider: Send + Sync {
    /// Current gas price, optionally as of `block_number`.
    async fn gas_price(&self, block_number: Option<u64>) -> Result<GasPrice>;
}

/// A transaction to estimate before it is returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationRequest {
    pub from: Address,
    pub to: Address,
    pub data: Bytes,
    pub value: U256,
}

/// Estimates the gas a transaction would use.
#[async_trait]
pub trait Simulator: Send + Sync {
    async fn estimate_gas(&self, request: &SimulationRequest) -> Result<u64>;
}
