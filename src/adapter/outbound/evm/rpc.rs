//! Instrumented JSON-RPC client.
//!
//! Every call goes through [`RpcClient::call`], which bounds it with a
//! timeout, logs latency and failures, and records the outcome as provider
//! health in the cache store. Failures are recorded on every call; success is
//! recorded only when the provider was not already known to be healthy.

use std::fmt::Display;
use std::future::IntoFuture;
use std::sync::Arc;
use std::time::{Duration, Instant};

use alloy_provider::{DynProvider, Provider, ProviderBuilder};
use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::{debug, warn};
use url::Url;

use crate::adapter::outbound::sqlite::CacheStore;
use crate::domain::ChainId;
use crate::error::{Result, RpcError};
use crate::port::RpcEndpoint;

/// Name an RPC provider after the host of its URL.
///
/// Well-known vendors map to a stable short name; anything else uses the host
/// itself, and URLs without a host become `"unknown"`.
#[must_use]
pub fn derive_provider_name(url: &Url) -> String {
    let Some(host) = url.host_str() else {
        return "unknown".to_string();
    };
    const VENDORS: [(&str, &str); 6] = [
        ("infura.io", "infura"),
        ("alchemy.com", "alchemy"),
        ("quiknode.pro", "quicknode"),
        ("ankr.com", "ankr"),
        ("drpc.org", "drpc"),
        ("llamarpc.com", "llamarpc"),
    ];
    VENDORS
        .iter()
        .find(|(suffix, _)| host == *suffix || host.ends_with(&format!(".{suffix}")))
        .map_or_else(|| host.to_ascii_lowercase(), |(_, name)| (*name).to_string())
}

/// One chain's RPC endpoint with timeout, logging, and health reporting.
pub struct RpcClient {
    chain_id: ChainId,
    provider_name: String,
    provider: DynProvider,
    timeout: Duration,
    health: Option<Arc<CacheStore>>,
    /// Last health state written to the store.
    recorded_health: Mutex<Option<bool>>,
}

impl RpcClient {
    /// Build a client for `url`. No request is made until the first call.
    pub fn connect(
        chain_id: ChainId,
        url: Url,
        timeout: Duration,
        health: Option<Arc<CacheStore>>,
    ) -> Self {
        let provider_name = derive_provider_name(&url);
        let provider = ProviderBuilder::new().connect_http(url).erased();
        Self {
            chain_id,
            provider_name,
            provider,
            timeout,
            health,
            recorded_health: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn chain_id(&self) -> ChainId {
        self.chain_id
    }

    #[must_use]
    pub fn provider_name(&self) -> &str {
        &self.provider_name
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// The underlying provider, for building contract calls.
    ///
    /// Calls made on it directly bypass instrumentation; wrap them in
    /// [`RpcClient::call`].
    #[must_use]
    pub fn provider(&self) -> &DynProvider {
        &self.provider
    }

    /// Run one RPC future under the client's timeout.
    pub async fn call<T, E, F>(
        &self,
        method: &'static str,
        fut: F,
    ) -> std::result::Result<T, RpcError>
    where
        F: IntoFuture<Output = std::result::Result<T, E>>,
        E: Display,
    {
        let started = Instant::now();
        let outcome = match tokio::time::timeout(self.timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(RpcError::Call {
                provider: self.provider_name.clone(),
                method,
                reason: e.to_string(),
            }),
            Err(_) => Err(RpcError::Timeout {
                provider: self.provider_name.clone(),
                method,
                timeout_ms: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
            }),
        };
        let latency_ms = started.elapsed().as_millis();

        match &outcome {
            Ok(_) => {
                debug!(
                    chain_id = %self.chain_id,
                    provider = %self.provider_name,
                    method,
                    latency_ms,
                    "RPC call succeeded"
                );
                self.report(true, None).await;
            }
            Err(e) => {
                warn!(
                    chain_id = %self.chain_id,
                    provider = %self.provider_name,
                    method,
                    latency_ms,
                    error = %e,
                    "RPC call failed"
                );
                self.report(false, Some(&e.to_string())).await;
            }
        }
        outcome
    }

    pub async fn block_number(&self) -> std::result::Result<u64, RpcError> {
        self.call("eth_blockNumber", self.provider.get_block_number())
            .await
    }

    pub async fn gas_price(&self) -> std::result::Result<u128, RpcError> {
        self.call("eth_gasPrice", self.provider.get_gas_price()).await
    }

    /// Suggested `(max_fee_per_gas, max_priority_fee_per_gas)`.
    pub async fn eip1559_fees(&self) -> std::result::Result<(u128, u128), RpcError> {
        let estimate = self
            .call("eth_feeHistory", self.provider.estimate_eip1559_fees())
            .await?;
        Ok((estimate.max_fee_per_gas, estimate.max_priority_fee_per_gas))
    }

    async fn report(&self, is_healthy: bool, error: Option<&str>) {
        let Some(store) = &self.health else {
            return;
        };
        let previous = self.recorded_health.lock().replace(is_healthy);
        if is_healthy && previous == Some(true) {
            return;
        }
        if let Err(e) = store
            .set_provider_health(&self.provider_name, self.chain_id, is_healthy, error)
            .await
        {
            *self.recorded_health.lock() = None;
            debug!(
                provider = %self.provider_name,
                error = %e,
                "Failed to record provider health"
            );
        }
    }
}

#[async_trait]
impl RpcEndpoint for RpcClient {
    fn chain_id(&self) -> ChainId {
        self.chain_id
    }

    fn provider_name(&self) -> &str {
        &self.provider_name
    }

    async fn block_number(&self) -> Result<u64> {
        Ok(RpcClient::block_number(self).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::outbound::sqlite::StoreOptions;
    use crate::testkit::clock::ManualClock;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn provider_name_recognises_vendors() {
        assert_eq!(
            derive_provider_name(&url("https://mainnet.infura.io/v3/key")),
            "infura"
        );
        assert_eq!(
            derive_provider_name(&url("https://eth-mainnet.g.alchemy.com/v2/key")),
            "alchemy"
        );
        assert_eq!(
            derive_provider_name(&url("https://x.base-mainnet.quiknode.pro/abc/")),
            "quicknode"
        );
    }

    #[test]
    fn provider_name_falls_back_to_host() {
        assert_eq!(
            derive_provider_name(&url("http://LocalHost:8545")),
            "localhost"
        );
        assert_eq!(derive_provider_name(&url("https://notinfura.io")), "notinfura.io");
    }

    #[tokio::test]
    async fn failed_calls_are_recorded_as_unhealthy() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rpc.db");
        let store = Arc::new(CacheStore::new(
            StoreOptions::new(path.to_string_lossy()),
            Arc::new(ManualClock::new(100)),
        ));
        store.open().unwrap();

        let client = RpcClient::connect(
            ChainId::MAINNET,
            url("http://127.0.0.1:1"),
            Duration::from_millis(50),
            Some(store.clone()),
        );
        let result: std::result::Result<(), RpcError> = client
            .call("eth_test", async { Err::<(), _>("boom") })
            .await;
        assert!(matches!(result, Err(RpcError::Call { .. })));

        let record = store
            .provider_health("127.0.0.1", ChainId::MAINNET)
            .await
            .unwrap()
            .unwrap();
        assert!(!record.is_healthy);
        assert_eq!(record.error_count, 1);
        assert_eq!(record.last_error.as_deref(), Some("eth_test on 127.0.0.1 failed: boom"));
    }

    async fn recorded(store: &CacheStore) -> Option<(bool, i64, u32)> {
        store
            .provider_health("127.0.0.1", ChainId::BASE)
            .await
            .unwrap()
            .map(|record| (record.is_healthy, record.last_check, record.error_count))
    }

    #[tokio::test]
    async fn healthy_calls_are_recorded_only_on_change() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rpc.db");
        let clock = Arc::new(ManualClock::new(100));
        let store = Arc::new(CacheStore::new(
            StoreOptions::new(path.to_string_lossy()),
            clock.clone(),
        ));
        store.open().unwrap();
        let client = RpcClient::connect(
            ChainId::BASE,
            url("http://127.0.0.1:1"),
            Duration::from_millis(50),
            Some(store.clone()),
        );
        let ok = || async { Ok::<_, String>(()) };

        client.call("eth_ok", ok()).await.unwrap();
        clock.set(200);
        client.call("eth_ok", ok()).await.unwrap();
        client.call("eth_ok", ok()).await.unwrap();
        assert_eq!(recorded(&store).await, Some((true, 100, 0)));

        client
            .call("eth_fail", async { Err::<(), _>("boom") })
            .await
            .unwrap_err();
        clock.set(300);
        client
            .call("eth_fail", async { Err::<(), _>("boom") })
            .await
            .unwrap_err();
        assert_eq!(recorded(&store).await, Some((false, 300, 2)));

        clock.set(400);
        client.call("eth_ok", ok()).await.unwrap();
        assert_eq!(recorded(&store).await, Some((true, 400, 2)));
    }

    #[tokio::test]
    async fn slow_calls_time_out() {
        let client = RpcClient::connect(
            ChainId::MAINNET,
            url("http://127.0.0.1:1"),
            Duration::from_millis(10),
            None,
        );
        let result = client
            .call("eth_slow", async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok::<_, String>(1u64)
            })
            .await;
        assert!(matches!(
            result,
            Err(RpcError::Timeout { timeout_ms: 10, .. })
        ));
    }
}
