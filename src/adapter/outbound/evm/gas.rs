//! Gas price estimators and the `eth_estimateGas` simulator.

use std::sync::Arc;

use alloy_contract::CallBuilder;
use async_trait::async_trait;
use tracing::debug;

use super::rpc::RpcClient;
use crate::domain::{ChainId, GasPrice};
use crate::error::Result;
use crate::port::{GasPriceProvider, SimulationRequest, Simulator};

/// Chains whose nodes serve reliable fee-market estimates.
pub const EIP1559_CHAINS: [ChainId; 2] = [ChainId::MAINNET, ChainId::SEPOLIA];

/// Fee-market estimate: the suggested max fee per gas.
pub struct Eip1559GasPriceProvider {
    rpc: Arc<RpcClient>,
}

impl Eip1559GasPriceProvider {
    pub fn new(rpc: Arc<RpcClient>) -> Self {
        Self { rpc }
    }
}

#[async_trait]
impl GasPriceProvider for Eip1559GasPriceProvider {
    async fn gas_price(&self, _block_number: Option<u64>) -> Result<GasPrice> {
        let (max_fee, priority_fee) = self.rpc.eip1559_fees().await?;
        Ok(GasPrice {
            wei: max_fee,
            priority_fee_wei: Some(priority_fee),
        })
    }
}

/// `eth_gasPrice`.
pub struct LegacyGasPriceProvider {
    rpc: Arc<RpcClient>,
}

impl LegacyGasPriceProvider {
    pub fn new(rpc: Arc<RpcClient>) -> Self {
        Self { rpc }
    }
}

#[async_trait]
impl GasPriceProvider for LegacyGasPriceProvider {
    async fn gas_price(&self, _block_number: Option<u64>) -> Result<GasPrice> {
        Ok(GasPrice::legacy(self.rpc.gas_price().await?))
    }
}

/// Picks the fee-market estimator on [`EIP1559_CHAINS`] and the legacy one
/// elsewhere.
pub struct OnChainGasPriceProvider {
    chain_id: ChainId,
    eip1559: Eip1559GasPriceProvider,
    legacy: LegacyGasPriceProvider,
}

impl OnChainGasPriceProvider {
    pub fn new(rpc: Arc<RpcClient>) -> Self {
        Self {
            chain_id: rpc.chain_id(),
            eip1559: Eip1559GasPriceProvider::new(Arc::clone(&rpc)),
            legacy: LegacyGasPriceProvider::new(rpc),
        }
    }

    #[must_use]
    pub fn uses_eip1559(&self) -> bool {
        EIP1559_CHAINS.contains(&self.chain_id)
    }
}

#[async_trait]
impl GasPriceProvider for OnChainGasPriceProvider {
    async fn gas_price(&self, block_number: Option<u64>) -> Result<GasPrice> {
        if self.uses_eip1559() {
            self.eip1559.gas_price(block_number).await
        } else {
            self.legacy.gas_price(block_number).await
        }
    }
}

/// Estimates a swap's gas with `eth_estimateGas`.
pub struct EthEstimateGasSimulator {
    rpc: Arc<RpcClient>,
}

impl EthEstimateGasSimulator {
    pub fn new(rpc: Arc<RpcClient>) -> Self {
        Self { rpc }
    }
}

#[async_trait]
impl Simulator for EthEstimateGasSimulator {
    async fn estimate_gas(&self, request: &SimulationRequest) -> Result<u64> {
        let call = CallBuilder::new_raw(self.rpc.provider(), request.data.clone())
            .from(request.from)
            .to(request.to)
            .value(request.value);
        let gas = self.rpc.call("eth_estimateGas", call.estimate_gas()).await?;
        debug!(
            chain_id = %self.rpc.chain_id(),
            to = %request.to,
            gas,
            "Estimated gas"
        );
        Ok(gas)
    }
}
