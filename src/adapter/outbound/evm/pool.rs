//! On-chain pool state providers for v2, v3, and v4 liquidity.
//!
//! Pool state is read through the multicall client. Pools whose calls revert
//! are left out of the result rather than failing the batch.

use std::sync::Arc;

use alloy_primitives::{Address, B256, U256};
use alloy_sol_types::sol;
use async_trait::async_trait;
use tracing::debug;

use crate::domain::contracts::v4_state_view_address;
use crate::domain::{ChainId, V2Pair, V3Pool, V4Pool};
use crate::error::{Result, RpcError};
use crate::port::{CallOutcome, Multicall, MulticallCall, PoolProvider};

sol! {
    interface IUniswapV2Pair {
        function token0() external view returns (address);
        function token1() external view returns (address);
        function getReserves() external view returns (uint112 reserve0, uint112 reserve1, uint32 blockTimestampLast);
    }

    interface IUniswapV3Pool {
        function token0() external view returns (address);
        function token1() external view returns (address);
        function fee() external view returns (uint24);
        function liquidity() external view returns (uint128);
        function slot0() external view returns (uint160 sqrtPriceX96, int24 tick, uint16 observationIndex, uint16 observationCardinality, uint16 observationCardinalityNext, uint8 feeProtocol, bool unlocked);
    }

    interface IStateView {
        function getSlot0(bytes32 poolId) external view returns (uint160 sqrtPriceX96, int24 tick, uint24 protocolFee, uint24 lpFee);
        function getLiquidity(bytes32 poolId) external view returns (uint128 liquidity);
    }
}

/// Constant-product pair reserves.
pub struct OnChainV2PairProvider {
    multicall: Arc<dyn Multicall>,
}

impl OnChainV2PairProvider {
    pub fn new(multicall: Arc<dyn Multicall>) -> Self {
        Self { multicall }
    }
}

#[async_trait]
impl PoolProvider<V2Pair> for OnChainV2PairProvider {
    async fn get_pools(&self, keys: &[Address], block_number: Option<u64>) -> Result<Vec<V2Pair>> {
        let calls: Vec<MulticallCall> = keys
            .iter()
            .flat_map(|pair| {
                [
                    MulticallCall::new(*pair, &IUniswapV2Pair::token0Call {}),
                    MulticallCall::new(*pair, &IUniswapV2Pair::token1Call {}),
                    MulticallCall::new(*pair, &IUniswapV2Pair::getReservesCall {}),
                ]
            })
            .collect();
        let outcomes = self.multicall.aggregate(&calls, block_number).await?;

        let pairs = keys
            .iter()
            .zip(outcomes.chunks(3))
            .filter_map(|(address, out)| {
                let pair = decode_v2(*address, out, block_number);
                if pair.is_none() {
                    debug!(pair = %address, "Skipping v2 pair with failed state calls");
                }
                pair
            })
            .collect();
        Ok(pairs)
    }
}

fn decode_v2(address: Address, out: &[CallOutcome], block_number: Option<u64>) -> Option<V2Pair> {
    let token0 = out.first()?.decode::<IUniswapV2Pair::token0Call>()?;
    let token1 = out.get(1)?.decode::<IUniswapV2Pair::token1Call>()?;
    let reserves = out.get(2)?.decode::<IUniswapV2Pair::getReservesCall>()?;
    Some(V2Pair {
        address,
        token0,
        token1,
        reserve0: U256::from(reserves.reserve0),
        reserve1: U256::from(reserves.reserve1),
        block_number,
    })
}

/// Concentrated-liquidity pool state.
pub struct OnChainV3PoolProvider {
    multicall: Arc<dyn Multicall>,
}

impl OnChainV3PoolProvider {
    pub fn new(multicall: Arc<dyn Multicall>) -> Self {
        Self { multicall }
    }
}

#[async_trait]
impl PoolProvider<V3Pool> for OnChainV3PoolProvider {
    async fn get_pools(&self, keys: &[Address], block_number: Option<u64>) -> Result<Vec<V3Pool>> {
        let calls: Vec<MulticallCall> = keys
            .iter()
            .flat_map(|pool| {
                [
                    MulticallCall::new(*pool, &IUniswapV3Pool::token0Call {}),
                    MulticallCall::new(*pool, &IUniswapV3Pool::token1Call {}),
                    MulticallCall::new(*pool, &IUniswapV3Pool::feeCall {}),
                    MulticallCall::new(*pool, &IUniswapV3Pool::liquidityCall {}),
                    MulticallCall::new(*pool, &IUniswapV3Pool::slot0Call {}),
                ]
            })
            .collect();
        let outcomes = self.multicall.aggregate(&calls, block_number).await?;

        let pools = keys
            .iter()
            .zip(outcomes.chunks(5))
            .filter_map(|(address, out)| {
                let pool = decode_v3(*address, out, block_number);
                if pool.is_none() {
                    debug!(pool = %address, "Skipping v3 pool with failed state calls");
                }
                pool
            })
            .collect();
        Ok(pools)
    }
}

fn decode_v3(address: Address, out: &[CallOutcome], block_number: Option<u64>) -> Option<V3Pool> {
    let token0 = out.first()?.decode::<IUniswapV3Pool::token0Call>()?;
    let token1 = out.get(1)?.decode::<IUniswapV3Pool::token1Call>()?;
    let fee = out.get(2)?.decode::<IUniswapV3Pool::feeCall>()?;
    let liquidity = out.get(3)?.decode::<IUniswapV3Pool::liquidityCall>()?;
    let slot0 = out.get(4)?.decode::<IUniswapV3Pool::slot0Call>()?;
    Some(V3Pool {
        address,
        token0,
        token1,
        fee: fee.to::<u32>(),
        liquidity,
        sqrt_price_x96: U256::from(slot0.sqrtPriceX96),
        tick: i32::try_from(slot0.tick).ok()?,
        block_number,
    })
}

/// Singleton-pool state read from the v4 state view contract.
pub struct OnChainV4PoolProvider {
    chain_id: ChainId,
    multicall: Arc<dyn Multicall>,
}

impl OnChainV4PoolProvider {
    pub fn new(chain_id: ChainId, multicall: Arc<dyn Multicall>) -> Self {
        Self {
            chain_id,
            multicall,
        }
    }
}

#[async_trait]
impl PoolProvider<V4Pool> for OnChainV4PoolProvider {
    async fn get_pools(&self, keys: &[B256], block_number: Option<u64>) -> Result<Vec<V4Pool>> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }
        let chain_id = self.chain_id;
        let state_view = v4_state_view_address(chain_id).ok_or(RpcError::Unsupported {
            feature: "v4 state view",
            chain_id,
        })?;

        let calls: Vec<MulticallCall> = keys
            .iter()
            .flat_map(|pool_id| {
                [
                    MulticallCall::new(state_view, &IStateView::getSlot0Call { poolId: *pool_id }),
                    MulticallCall::new(
                        state_view,
                        &IStateView::getLiquidityCall { poolId: *pool_id },
                    ),
                ]
            })
            .collect();
        let outcomes = self.multicall.aggregate(&calls, block_number).await?;

        let pools = keys
            .iter()
            .zip(outcomes.chunks(2))
            .filter_map(|(pool_id, out)| {
                let pool = decode_v4(*pool_id, out, block_number);
                if pool.is_none() {
                    debug!(pool_id = %pool_id, "Skipping v4 pool with failed state calls");
                }
                pool
            })
            .collect();
        Ok(pools)
    }
}

fn decode_v4(pool_id: B256, out: &[CallOutcome], block_number: Option<u64>) -> Option<V4Pool> {
    let slot0 = out.first()?.decode::<IStateView::getSlot0Call>()?;
    let liquidity = out.get(1)?.decode::<IStateView::getLiquidityCall>()?;
    // Uninitialized pools report a zero price.
    if slot0.sqrtPriceX96.is_zero() {
        return None;
    }
    Some(V4Pool {
        pool_id,
        liquidity,
        sqrt_price_x96: U256::from(slot0.sqrtPriceX96),
        tick: i32::try_from(slot0.tick).ok()?,
        lp_fee: slot0.lpFee.to::<u32>(),
        block_number,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::Bytes;
    use alloy_sol_types::SolValue;

    fn ok(data: Vec<u8>) -> CallOutcome {
        CallOutcome {
            success: true,
            return_data: Bytes::from(data),
        }
    }

    fn failed() -> CallOutcome {
        CallOutcome {
            success: false,
            return_data: Bytes::new(),
        }
    }

    #[test]
    fn v2_pair_decodes_from_three_outcomes() {
        let token0 = Address::repeat_byte(1);
        let token1 = Address::repeat_byte(2);
        let out = [
            ok(token0.abi_encode()),
            ok(token1.abi_encode()),
            ok((U256::from(10u64), U256::from(20u64), U256::ZERO).abi_encode_params()),
        ];
        let pair = decode_v2(Address::repeat_byte(9), &out, Some(5)).unwrap();
        assert_eq!(pair.token0, token0);
        assert_eq!(pair.reserve0, U256::from(10u64));
        assert_eq!(pair.reserve1, U256::from(20u64));
        assert_eq!(pair.block_number, Some(5));
    }

    #[test]
    fn v2_pair_with_reverted_call_is_skipped() {
        let out = [
            ok(Address::repeat_byte(1).abi_encode()),
            failed(),
            ok((U256::from(1u64), U256::from(1u64), U256::ZERO).abi_encode_params()),
        ];
        assert!(decode_v2(Address::ZERO, &out, None).is_none());
    }
}
