//! Quoter batching with per-chain tuning.
//!
//! Building quoter calldata and reading amounts out of the results belong to
//! the routing engine. This provider picks the quoter, the block, and the
//! batch sizing, and retries failed or mostly-reverted batches with the
//! chain's failure overrides.

use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::{Address, Bytes};
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::domain::contracts::quoter_address;
use crate::domain::{BatchParams, ChainId, ChainTuning, FailureOverrides};
use crate::error::{Result, RpcError};
use crate::port::{
    BatchMulticall, BatchOptions, MulticallCall, QuoteBatch, QuoteOptions, QuoteProvider,
};

/// Batch sizing for one attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct AttemptSizing {
    chunk_size: usize,
    gas_limit_per_call: u64,
}

impl From<BatchParams> for AttemptSizing {
    fn from(params: BatchParams) -> Self {
        Self {
            chunk_size: params.multicall_chunk,
            gas_limit_per_call: params.gas_limit_per_call,
        }
    }
}

impl From<FailureOverrides> for AttemptSizing {
    fn from(overrides: FailureOverrides) -> Self {
        Self {
            chunk_size: overrides.multicall_chunk,
            gas_limit_per_call: overrides.gas_limit_override,
        }
    }
}

pub struct OnChainQuoteProvider {
    chain_id: ChainId,
    multicall: Arc<dyn BatchMulticall>,
    tuning: ChainTuning,
}

impl OnChainQuoteProvider {
    pub fn new(multicall: Arc<dyn BatchMulticall>, tuning: ChainTuning) -> Self {
        Self {
            chain_id: multicall.chain_id(),
            multicall,
            tuning,
        }
    }

    #[must_use]
    pub fn tuning(&self) -> &ChainTuning {
        &self.tuning
    }

    fn resolve_quoter(&self, options: &QuoteOptions) -> std::result::Result<Address, RpcError> {
        quoter_address(
            self.chain_id,
            options.protocol,
            options.use_mixed_route_quoter,
            options.mixed_route_contains_v4_pool,
        )
        .ok_or(RpcError::Unsupported {
            feature: "quoter",
            chain_id: self.chain_id,
        })
    }

    async fn head(&self) -> Result<u64> {
        self.multicall.head_block_number().await
    }
}

#[async_trait]
impl QuoteProvider for OnChainQuoteProvider {
    fn quoter_address(&self, options: &QuoteOptions) -> Result<Address> {
        Ok(self.resolve_quoter(options)?)
    }

    async fn block_number(&self, attempt: u32) -> Result<u64> {
        let head = self.head().await?;
        Ok(self.tuning.block_numbers.block_for_attempt(head, attempt))
    }

    /// Send encoded quoter calls, retrying with backoff.
    ///
    /// A batch that errors with a gas failure is retried with the gas-error
    /// overrides; one whose success rate falls below the configured minimum is
    /// retried with the success-rate overrides. When retries run out the last
    /// batch is returned as is, or the last error.
    async fn quote(&self, call_data: &[Bytes], options: QuoteOptions) -> Result<QuoteBatch> {
        let quoter = self.resolve_quoter(&options)?;
        let calls: Vec<MulticallCall> = call_data
            .iter()
            .map(|data| MulticallCall {
                target: quoter,
                call_data: data.clone(),
            })
            .collect();

        let params = self.tuning.batch_params(options.protocol, options.optimistic);
        let retry = self.tuning.retry;
        let head = self.head().await?;
        let mut sizing = AttemptSizing::from(params);
        let mut attempt: u32 = 0;

        loop {
            let block_number = self.tuning.block_numbers.block_for_attempt(head, attempt);
            let batch = self
                .multicall
                .aggregate_with(
                    &calls,
                    BatchOptions {
                        chunk_size: sizing.chunk_size,
                        gas_limit_per_call: sizing.gas_limit_per_call,
                        block_number: Some(block_number),
                    },
                )
                .await;
            let exhausted = attempt >= retry.retries;

            match batch {
                Ok(outcomes) => {
                    let batch = QuoteBatch {
                        quoter,
                        block_number,
                        attempts: attempt + 1,
                        outcomes,
                    };
                    let rate = batch.success_rate();
                    if rate >= params.quote_min_success_rate || exhausted {
                        debug!(
                            chain_id = %self.chain_id,
                            protocol = %options.protocol,
                            calls = calls.len(),
                            block_number,
                            attempts = batch.attempts,
                            success_rate = rate,
                            "Quote batch complete"
                        );
                        return Ok(batch);
                    }
                    warn!(
                        chain_id = %self.chain_id,
                        success_rate = rate,
                        min_success_rate = params.quote_min_success_rate,
                        "Quote success rate too low, retrying"
                    );
                    sizing = self.tuning.success_rate_overrides.into();
                }
                Err(e) => {
                    if exhausted {
                        return Err(e.into());
                    }
                    if is_gas_error(&e) {
                        warn!(
                            chain_id = %self.chain_id,
                            error = %e,
                            "Quote batch ran out of gas, retrying"
                        );
                        sizing = self.tuning.gas_error_overrides.into();
                    } else {
                        warn!(
                            chain_id = %self.chain_id,
                            error = %e,
                            "Quote batch failed, retrying"
                        );
                    }
                }
            }

            attempt += 1;
            tokio::time::sleep(Duration::from_millis(retry.backoff_ms(attempt))).await;
        }
    }
}

fn is_gas_error(error: &RpcError) -> bool {
    match error {
        RpcError::Call { reason, .. } => {
            let reason = reason.to_ascii_lowercase();
            reason.contains("out of gas") || reason.contains("gas required exceeds")
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BlockNumberConfig, BlockRollback, Protocol, RetryPolicy, TuningTable};
    use crate::error::Error;
    use crate::port::CallOutcome;
    use crate::testkit::provider::ScriptedMulticall;

    fn outcome(success: bool) -> CallOutcome {
        CallOutcome {
            success,
            return_data: Bytes::new(),
        }
    }

    fn batch(outcomes: Vec<CallOutcome>) -> QuoteBatch {
        QuoteBatch {
            quoter: Address::ZERO,
            block_number: 1,
            attempts: 1,
            outcomes,
        }
    }

    fn options(protocol: Protocol) -> QuoteOptions {
        QuoteOptions {
            protocol,
            optimistic: false,
            use_mixed_route_quoter: false,
            mixed_route_contains_v4_pool: false,
        }
    }

    fn call_data(n: usize) -> Vec<Bytes> {
        (0..n).map(|i| Bytes::from(vec![u8::try_from(i).unwrap_or(0); 4])).collect()
    }

    fn gas_error() -> RpcError {
        RpcError::Call {
            provider: "stub".into(),
            method: "aggregate3",
            reason: "execution reverted: out of gas".into(),
        }
    }

    fn timeout_error() -> RpcError {
        RpcError::Call {
            provider: "stub".into(),
            method: "aggregate3",
            reason: "request timed out".into(),
        }
    }

    /// Base tuning: non-optimistic V3 batches of 660 at 200k gas, two
    /// retries, quoting 25 blocks behind the head and 45 after a failure.
    fn base_tuning() -> ChainTuning {
        let mut tuning = TuningTable::standard().for_chain(ChainId::BASE);
        tuning.gas_error_overrides = FailureOverrides::new(3_000_000, 45);
        tuning.success_rate_overrides = FailureOverrides::new(2_000_000, 30);
        tuning
    }

    fn sized(chunk_size: usize, gas_limit_per_call: u64, block: u64) -> BatchOptions {
        BatchOptions {
            chunk_size,
            gas_limit_per_call,
            block_number: Some(block),
        }
    }

    #[test]
    fn success_rate_counts_successful_calls() {
        let half = batch(vec![outcome(true), outcome(false)]);
        assert!((half.success_rate() - 0.5).abs() < f64::EPSILON);
        assert!((batch(Vec::new()).success_rate() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn gas_errors_are_recognised() {
        let other = RpcError::Call {
            provider: "p".into(),
            method: "aggregate3",
            reason: "nonce too low".into(),
        };
        assert!(is_gas_error(&gas_error()));
        assert!(!is_gas_error(&other));
        assert!(!is_gas_error(&timeout_error()));
    }

    #[test]
    fn v2_has_no_quoter() {
        let multicall = Arc::new(ScriptedMulticall::new(ChainId::MAINNET, 100));
        let tuning = TuningTable::standard().for_chain(ChainId::MAINNET);
        let provider = OnChainQuoteProvider::new(multicall, tuning);

        let err = provider.quoter_address(&options(Protocol::V2)).unwrap_err();
        assert!(matches!(
            err,
            Error::Rpc(RpcError::Unsupported {
                feature: "quoter",
                ..
            })
        ));
        assert!(provider.quoter_address(&options(Protocol::V3)).is_ok());
    }

    #[test]
    fn overrides_replace_sizing() {
        let sizing = AttemptSizing::from(FailureOverrides::DEFAULT);
        assert_eq!(sizing.chunk_size, 110);
        assert_eq!(sizing.gas_limit_per_call, 1_300_000);
    }

    #[tokio::test]
    async fn block_number_rolls_back_after_first_attempt() {
        let multicall = Arc::new(ScriptedMulticall::new(ChainId::BASE, 1_000));
        let provider = OnChainQuoteProvider::new(multicall, base_tuning());

        assert_eq!(provider.block_number(0).await.unwrap(), 975);
        assert_eq!(provider.block_number(1).await.unwrap(), 955);
        assert_eq!(provider.block_number(2).await.unwrap(), 955);
    }

    #[tokio::test(start_paused = true)]
    async fn healthy_batch_is_returned_on_first_attempt() {
        let multicall = Arc::new(ScriptedMulticall::new(ChainId::BASE, 1_000));
        let provider = OnChainQuoteProvider::new(multicall.clone(), base_tuning());

        let batch = provider
            .quote(&call_data(3), options(Protocol::V3))
            .await
            .unwrap();

        assert_eq!(batch.attempts, 1);
        assert_eq!(batch.block_number, 975);
        assert_eq!(batch.outcomes.len(), 3);
        assert_eq!(batch.quoter, provider.quoter_address(&options(Protocol::V3)).unwrap());
        assert_eq!(multicall.batches(), vec![sized(660, 200_000, 975)]);
    }

    #[tokio::test(start_paused = true)]
    async fn gas_failure_retries_with_gas_overrides() {
        let multicall =
            Arc::new(ScriptedMulticall::new(ChainId::BASE, 1_000).then_fail(gas_error()));
        let provider = OnChainQuoteProvider::new(multicall.clone(), base_tuning());

        let batch = provider
            .quote(&call_data(4), options(Protocol::V3))
            .await
            .unwrap();

        assert_eq!(batch.attempts, 2);
        assert_eq!(batch.block_number, 955);
        assert_eq!(
            multicall.batches(),
            vec![sized(660, 200_000, 975), sized(45, 3_000_000, 955)]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn low_success_rate_retries_with_success_rate_overrides() {
        let multicall = Arc::new(
            ScriptedMulticall::new(ChainId::BASE, 1_000)
                .then_return(&[false, false, false, false])
                .then_return(&[true, true, false, false]),
        );
        let provider = OnChainQuoteProvider::new(multicall.clone(), base_tuning());

        let batch = provider
            .quote(&call_data(4), options(Protocol::V3))
            .await
            .unwrap();

        assert_eq!(batch.attempts, 2);
        assert!((batch.success_rate() - 0.5).abs() < f64::EPSILON);
        assert_eq!(
            multicall.batches(),
            vec![sized(660, 200_000, 975), sized(30, 2_000_000, 955)]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn exhausted_retries_return_the_last_batch() {
        let mut tuning = base_tuning();
        tuning.block_numbers = BlockNumberConfig {
            base_block_offset: -5,
            rollback: Some(BlockRollback {
                attempts_before_rollback: 2,
                rollback_block_offset: -10,
            }),
        };
        let multicall = Arc::new(
            ScriptedMulticall::new(ChainId::BASE, 100)
                .then_fail(timeout_error())
                .then_return(&[false, false])
                .then_return(&[false, false]),
        );
        let provider = OnChainQuoteProvider::new(multicall.clone(), tuning);

        let batch = provider
            .quote(&call_data(2), options(Protocol::V3))
            .await
            .unwrap();

        assert_eq!(batch.attempts, 3);
        assert_eq!(batch.block_number, 85);
        assert!(batch.outcomes.iter().all(|o| !o.success));
        // A plain failure keeps the sizing; only the low success rate changes it.
        assert_eq!(
            multicall.batches(),
            vec![
                sized(660, 200_000, 95),
                sized(660, 200_000, 95),
                sized(30, 2_000_000, 85),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn exhausted_retries_return_the_last_error() {
        let multicall = Arc::new(
            ScriptedMulticall::new(ChainId::BASE, 1_000)
                .then_fail(timeout_error())
                .then_fail(gas_error())
                .then_fail(timeout_error()),
        );
        let provider = OnChainQuoteProvider::new(multicall.clone(), base_tuning());

        let err = provider
            .quote(&call_data(2), options(Protocol::V3))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            Error::Rpc(RpcError::Call { ref reason, .. }) if reason == "request timed out"
        ));
        assert_eq!(multicall.batches().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn chain_without_retries_tries_once() {
        let mut tuning = base_tuning();
        tuning.retry = RetryPolicy {
            retries: 0,
            ..tuning.retry
        };
        let multicall =
            Arc::new(ScriptedMulticall::new(ChainId::BASE, 1_000).then_return(&[false]));
        let provider = OnChainQuoteProvider::new(multicall.clone(), tuning);

        let batch = provider
            .quote(&call_data(1), options(Protocol::V3))
            .await
            .unwrap();

        assert_eq!(batch.attempts, 1);
        assert_eq!(multicall.batches(), vec![sized(660, 200_000, 975)]);
    }
}
