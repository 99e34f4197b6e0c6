//! Chain RPC and multicall ports.

use alloy_primitives::{Address, Bytes};
use alloy_sol_types::SolCall;
use async_trait::async_trait;

use crate::domain::ChainId;
use crate::error::{Result, RpcError};

/// A chain's JSON-RPC endpoint.
#[async_trait]
pub trait RpcEndpoint: Send + Sync {
    fn chain_id(&self) -> ChainId;

    /// Short provider name used for health records.
    fn provider_name(&self) -> &str;

    async fn block_number(&self) -> Result<u64>;
}

/// One call inside a multicall batch.
///
/// Failures are always allowed so one revert never sinks the batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MulticallCall {
    pub target: Address,
    pub call_data: Bytes,
}

impl MulticallCall {
    pub fn new<C: SolCall>(target: Address, call: &C) -> Self {
        Self {
            target,
            call_data: Bytes::from(call.abi_encode()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallOutcome {
    pub success: bool,
    pub return_data: Bytes,
}

impl CallOutcome {
    /// Decode the return data of a successful call.
    pub fn decode<C: SolCall>(&self) -> Option<C::Return> {
        if !self.success {
            return None;
        }
        C::abi_decode_returns(&self.return_data).ok()
    }
}

/// Batched read-only calls.
#[async_trait]
pub trait Multicall: Send + Sync {
    /// Address of the aggregating contract.
    fn address(&self) -> Address;

    /// Outcomes in call order, optionally pinned to `block_number`.
    async fn aggregate(
        &self,
        calls: &[MulticallCall],
        block_number: Option<u64>,
    ) -> Result<Vec<CallOutcome>>;
}

/// Per-batch sizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchOptions {
    pub chunk_size: usize,
    /// Zero leaves the gas limit to the node.
    pub gas_limit_per_call: u64,
    /// Pin the batch to a block; `None` reads at the latest block.
    pub block_number: Option<u64>,
}

/// Multicall whose chunking and gas are chosen per batch.
///
/// Errors stay as [`RpcError`] so callers can tell gas failures apart.
#[async_trait]
pub trait BatchMulticall: Send + Sync {
    fn chain_id(&self) -> ChainId;

    /// Current chain head.
    async fn head_block_number(&self) -> Result<u64>;

    /// Run `calls` in chunks. Outcomes are returned in call order.
    async fn aggregate_with(
        &self,
        calls: &[MulticallCall],
        options: BatchOptions,
    ) -> std::result::Result<Vec<CallOutcome>, RpcError>;
}
