//! Multicall3 batching.
//!
//! Calls are split into chunks and each chunk is sent as one `aggregate3`
//! with a gas limit of `gas_limit_per_call` times the chunk length.

use std::sync::Arc;

use alloy_eips::BlockId;
use alloy_primitives::Address;
use alloy_sol_types::sol;
use async_trait::async_trait;
use futures_util::future::try_join_all;
use tracing::debug;

use super::rpc::RpcClient;
use crate::domain::contracts::multicall_address;
use crate::error::{Result, RpcError};
use crate::domain::ChainId;
use crate::port::{
    BatchMulticall, BatchOptions, CallOutcome, Multicall, MulticallCall, RpcEndpoint,
};

/// Chunk size used when the caller does not supply one.
pub const DEFAULT_CHUNK_SIZE: usize = 300;

sol! {
    #[sol(rpc)]
    contract IMulticall3 {
        struct Call3 {
            address target;
            bool allowFailure;
            bytes callData;
        }

        struct Call3Result {
            bool success;
            bytes returnData;
        }

        function aggregate3(Call3[] calldata calls) external payable returns (Call3Result[] memory returnData);
    }
}

pub struct MulticallClient {
    rpc: Arc<RpcClient>,
    address: Address,
    gas_limit_per_call: u64,
}

impl MulticallClient {
    pub fn new(rpc: Arc<RpcClient>, gas_limit_per_call: u64) -> Self {
        let address = multicall_address(rpc.chain_id());
        Self {
            rpc,
            address,
            gas_limit_per_call,
        }
    }

    async fn aggregate_chunk(
        &self,
        chunk: &[MulticallCall],
        options: BatchOptions,
    ) -> std::result::Result<Vec<CallOutcome>, RpcError> {
        let multicall = IMulticall3::new(self.address, self.rpc.provider());
        let calls: Vec<IMulticall3::Call3> = chunk
            .iter()
            .map(|call| IMulticall3::Call3 {
                target: call.target,
                allowFailure: true,
                callData: call.call_data.clone(),
            })
            .collect();

        let mut builder = multicall.aggregate3(calls);
        if let Some(gas) = chunk_gas_limit(options.gas_limit_per_call, chunk.len()) {
            builder = builder.gas(gas);
        }
        if let Some(block) = options.block_number {
            builder = builder.block(BlockId::number(block));
        }

        let returned = self.rpc.call("aggregate3", builder.call()).await?;
        if returned.len() != chunk.len() {
            return Err(RpcError::Decode {
                what: "aggregate3 result",
                reason: format!("expected {} results, got {}", chunk.len(), returned.len()),
            });
        }
        Ok(returned
            .into_iter()
            .map(|r| CallOutcome {
                success: r.success,
                return_data: r.returnData,
            })
            .collect())
    }
}

#[async_trait]
impl BatchMulticall for MulticallClient {
    fn chain_id(&self) -> ChainId {
        self.rpc.chain_id()
    }

    async fn head_block_number(&self) -> Result<u64> {
        RpcEndpoint::block_number(self.rpc.as_ref()).await
    }

    async fn aggregate_with(
        &self,
        calls: &[MulticallCall],
        options: BatchOptions,
    ) -> std::result::Result<Vec<CallOutcome>, RpcError> {
        if calls.is_empty() {
            return Ok(Vec::new());
        }
        let chunk_size = options.chunk_size.max(1);
        debug!(
            chain_id = %self.rpc.chain_id(),
            calls = calls.len(),
            chunk_size,
            gas_limit_per_call = options.gas_limit_per_call,
            "Sending multicall batch"
        );

        let chunks = calls
            .chunks(chunk_size)
            .map(|chunk| self.aggregate_chunk(chunk, options));
        let results = try_join_all(chunks).await?;
        Ok(results.into_iter().flatten().collect())
    }
}

#[async_trait]
impl Multicall for MulticallClient {
    fn address(&self) -> Address {
        self.address
    }

    /// Runs `calls` with the default chunk size and per-call gas ceiling.
    async fn aggregate(
        &self,
        calls: &[MulticallCall],
        block_number: Option<u64>,
    ) -> Result<Vec<CallOutcome>> {
        let outcomes = self
            .aggregate_with(
                calls,
                BatchOptions {
                    chunk_size: DEFAULT_CHUNK_SIZE,
                    gas_limit_per_call: self.gas_limit_per_call,
                    block_number,
                },
            )
            .await?;
        Ok(outcomes)
    }
}

fn chunk_gas_limit(gas_limit_per_call: u64, calls: usize) -> Option<u64> {
    if gas_limit_per_call == 0 {
        return None;
    }
    Some(gas_limit_per_call.saturating_mul(calls as u64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{Bytes, U256};
    use alloy_sol_types::SolCall;

    sol! {
        function balanceOf(address owner) external view returns (uint256);
    }

    #[test]
    fn chunk_gas_scales_with_call_count() {
        assert_eq!(chunk_gas_limit(375_000, 4), Some(1_500_000));
        assert_eq!(chunk_gas_limit(0, 4), None);
    }

    #[test]
    fn call_encodes_selector_and_arguments() {
        let call = MulticallCall::new(Address::ZERO, &balanceOfCall { owner: Address::ZERO });
        assert_eq!(&call.call_data[..4], &balanceOfCall::SELECTOR);
        assert_eq!(call.call_data.len(), 4 + 32);
    }

    #[test]
    fn failed_outcome_does_not_decode() {
        let data = Bytes::from(U256::from(7u64).to_be_bytes::<32>().to_vec());
        let ok = CallOutcome {
            success: true,
            return_data: data.clone(),
        };
        assert_eq!(ok.decode::<balanceOfCall>(), Some(U256::from(7u64)));

        let failed = CallOutcome {
            success: false,
            return_data: data,
        };
        assert_eq!(failed.decode::<balanceOfCall>(), None);
    }
}
