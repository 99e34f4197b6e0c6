//! Per-chain quote provider tuning.
//!
//! One immutable table keyed by chain and protocol, built once at startup.
//! Chains without an entry get the defaults.

use std::collections::HashMap;

use serde::Serialize;

use super::{ChainId, Protocol};

/// Retry schedule for a batch of on-chain quote calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RetryPolicy {
    /// Extra attempts after the first one.
    pub retries: u32,
    pub min_timeout_ms: u64,
    pub max_timeout_ms: u64,
}

impl RetryPolicy {
    pub const DEFAULT: Self = Self {
        retries: 2,
        min_timeout_ms: 25,
        max_timeout_ms: 250,
    };

    /// Backoff before retry `attempt` (1-based): doubles from the minimum and
    /// is capped at the maximum.
    #[must_use]
    pub fn backoff_ms(&self, attempt: u32) -> u64 {
        let factor = 1u64 << attempt.saturating_sub(1).min(32);
        self.min_timeout_ms
            .saturating_mul(factor)
            .min(self.max_timeout_ms)
    }
}

/// How quote calls are split into multicall batches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BatchParams {
    /// Calls per multicall.
    pub multicall_chunk: usize,
    pub gas_limit_per_call: u64,
    /// Minimum fraction of successful calls before the batch is retried.
    pub quote_min_success_rate: f64,
}

impl BatchParams {
    pub const DEFAULT: Self = Self::new(210, 705_000, 0.15);

    #[must_use]
    pub const fn new(
        multicall_chunk: usize,
        gas_limit_per_call: u64,
        quote_min_success_rate: f64,
    ) -> Self {
        Self {
            multicall_chunk,
            gas_limit_per_call,
            quote_min_success_rate,
        }
    }
}

/// Batch shape used after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FailureOverrides {
    pub gas_limit_override: u64,
    pub multicall_chunk: usize,
}

impl FailureOverrides {
    pub const DEFAULT: Self = Self::new(1_300_000, 110);

    #[must_use]
    pub const fn new(gas_limit_override: u64, multicall_chunk: usize) -> Self {
        Self {
            gas_limit_override,
            multicall_chunk,
        }
    }
}

/// Moves quoting further behind the chain head after repeated failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BlockRollback {
    pub attempts_before_rollback: u32,
    pub rollback_block_offset: i64,
}

/// Which block quotes are evaluated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BlockNumberConfig {
    pub base_block_offset: i64,
    pub rollback: Option<BlockRollback>,
}

impl BlockNumberConfig {
    pub const DEFAULT: Self = Self {
        base_block_offset: 0,
        rollback: None,
    };

    const fn lagging(base_block_offset: i64, rollback_block_offset: i64) -> Self {
        Self {
            base_block_offset,
            rollback: Some(BlockRollback {
                attempts_before_rollback: 1,
                rollback_block_offset,
            }),
        }
    }

    /// Block to quote at for `attempt` (0-based) given the chain head.
    ///
    /// Never goes below block zero.
    #[must_use]
    pub fn block_for_attempt(&self, head: u64, attempt: u32) -> u64 {
        let mut offset = self.base_block_offset;
        if let Some(rollback) = self.rollback {
            if attempt >= rollback.attempts_before_rollback {
                offset += rollback.rollback_block_offset;
            }
        }
        if offset >= 0 {
            head.saturating_add(offset.unsigned_abs())
        } else {
            head.saturating_sub(offset.unsigned_abs())
        }
    }
}

/// Everything the quote provider of one chain is tuned with.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainTuning {
    pub retry: RetryPolicy,
    pub gas_error_overrides: FailureOverrides,
    pub success_rate_overrides: FailureOverrides,
    pub block_numbers: BlockNumberConfig,
    optimistic: HashMap<Protocol, BatchParams>,
    non_optimistic: HashMap<Protocol, BatchParams>,
}

impl ChainTuning {
    /// Batch params for cached-route quoting in the given mode.
    #[must_use]
    pub fn batch_params(&self, protocol: Protocol, optimistic: bool) -> BatchParams {
        let table = if optimistic {
            &self.optimistic
        } else {
            &self.non_optimistic
        };
        table.get(&protocol).copied().unwrap_or(BatchParams::DEFAULT)
    }
}

/// Chains still quoting through the non-view quoter; tuned conservatively.
const HEAVY_QUOTER_CHAINS: [ChainId; 6] = [
    ChainId::WORLDCHAIN,
    ChainId::UNICHAIN_SEPOLIA,
    ChainId::MONAD_TESTNET,
    ChainId::BASE_SEPOLIA,
    ChainId::UNICHAIN,
    ChainId::SONEIUM,
];

/// OP-stack chains sharing the same failure overrides.
const OP_STACK_CHAINS: [ChainId; 9] = [
    ChainId::BASE,
    ChainId::OPTIMISM,
    ChainId::BLAST,
    ChainId::WORLDCHAIN,
    ChainId::UNICHAIN_SEPOLIA,
    ChainId::MONAD_TESTNET,
    ChainId::BASE_SEPOLIA,
    ChainId::UNICHAIN,
    ChainId::SONEIUM,
];

const HEAVY_QUOTER_PARAMS: BatchParams = BatchParams::new(80, 1_200_000, 0.1);
const MAINNET_VIEW_QUOTER_PARAMS: BatchParams = BatchParams::new(25, 75_000, 0.02);

/// Immutable tuning table keyed by chain and protocol.
#[derive(Debug, Clone, Default)]
pub struct TuningTable {
    retry: HashMap<ChainId, RetryPolicy>,
    optimistic: HashMap<(ChainId, Protocol), BatchParams>,
    non_optimistic: HashMap<(ChainId, Protocol), BatchParams>,
    gas_error_overrides: HashMap<ChainId, FailureOverrides>,
    success_rate_overrides: HashMap<ChainId, FailureOverrides>,
    block_numbers: HashMap<ChainId, BlockNumberConfig>,
}

impl TuningTable {
    /// The production tuning for every known chain.
    #[must_use]
    pub fn standard() -> Self {
        let mut table = Self::default();

        let fast_retry = RetryPolicy {
            retries: 2,
            min_timeout_ms: 100,
            max_timeout_ms: 1000,
        };
        for chain in [
            ChainId::BASE,
            ChainId::ARBITRUM_ONE,
            ChainId::OPTIMISM,
            ChainId::BLAST,
        ]
        .into_iter()
        .chain(HEAVY_QUOTER_CHAINS)
        {
            table.retry.insert(chain, fast_retry);
        }
        table.retry.insert(
            ChainId::CELO,
            RetryPolicy {
                retries: 0,
                ..fast_retry
            },
        );

        let shared = [
            (
                ChainId::BASE,
                BatchParams::new(1320, 100_000, 0.1),
                BatchParams::new(660, 200_000, 0.1),
            ),
            (
                ChainId::ARBITRUM_ONE,
                BatchParams::new(3000, 75_000, 0.15),
                BatchParams::new(1125, 200_000, 0.15),
            ),
            (
                ChainId::OPTIMISM,
                BatchParams::new(1650, 80_000, 0.1),
                BatchParams::new(880, 150_000, 0.1),
            ),
            (
                ChainId::CELO,
                BatchParams::new(6240, 80_000, 0.0),
                BatchParams::new(3120, 160_000, 0.0),
            ),
            (
                ChainId::BLAST,
                BatchParams::new(1200, 80_000, 0.1),
                BatchParams::new(1200, 80_000, 0.1),
            ),
            (
                ChainId::AVALANCHE,
                BatchParams::new(2625, 60_000, 0.15),
                BatchParams::new(420, 375_000, 0.15),
            ),
            (
                ChainId::BNB,
                BatchParams::new(1850, 80_000, 0.15),
                BatchParams::new(2961, 50_000, 0.15),
            ),
            (
                ChainId::POLYGON,
                BatchParams::new(1850, 80_000, 0.15),
                BatchParams::new(987, 150_000, 0.15),
            ),
            (
                ChainId::ZKSYNC,
                BatchParams::new(20, 4_000_000, 0.1),
                BatchParams::new(20, 4_000_000, 0.1),
            ),
        ];
        let protocols = [Protocol::V2, Protocol::V3, Protocol::V4, Protocol::Mixed];
        for (chain, optimistic, non_optimistic) in shared {
            for protocol in protocols {
                table.optimistic.insert((chain, protocol), optimistic);
                table.non_optimistic.insert((chain, protocol), non_optimistic);
            }
        }
        for chain in HEAVY_QUOTER_CHAINS {
            for protocol in protocols {
                table.optimistic.insert((chain, protocol), HEAVY_QUOTER_PARAMS);
                table.non_optimistic.insert((chain, protocol), HEAVY_QUOTER_PARAMS);
            }
        }
        // Mainnet mixed routes stay on the defaults in both modes.
        for protocol in [Protocol::V2, Protocol::V3, Protocol::V4] {
            table
                .optimistic
                .insert((ChainId::MAINNET, protocol), MAINNET_VIEW_QUOTER_PARAMS);
        }
        table.non_optimistic.insert(
            (ChainId::MAINNET, Protocol::V2),
            BatchParams::new(987, 150_000, 0.15),
        );
        for protocol in [Protocol::V3, Protocol::V4] {
            table
                .non_optimistic
                .insert((ChainId::MAINNET, protocol), MAINNET_VIEW_QUOTER_PARAMS);
        }

        for chain in OP_STACK_CHAINS {
            table
                .gas_error_overrides
                .insert(chain, FailureOverrides::new(3_000_000, 45));
            table
                .success_rate_overrides
                .insert(chain, FailureOverrides::new(3_000_000, 45));
        }
        for (chain, gas_error, success_rate) in [
            (
                ChainId::ARBITRUM_ONE,
                FailureOverrides::new(30_000_000, 8),
                FailureOverrides::new(30_000_000, 8),
            ),
            (
                ChainId::CELO,
                FailureOverrides::new(5_000_000, 5),
                FailureOverrides::new(6_250_000, 4),
            ),
            (
                ChainId::ZKSYNC,
                FailureOverrides::new(6_000_000, 10),
                FailureOverrides::new(6_000_000, 10),
            ),
        ] {
            table.gas_error_overrides.insert(chain, gas_error);
            table.success_rate_overrides.insert(chain, success_rate);
        }

        for chain in OP_STACK_CHAINS {
            table
                .block_numbers
                .insert(chain, BlockNumberConfig::lagging(-25, -20));
        }
        table
            .block_numbers
            .insert(ChainId::BLAST, BlockNumberConfig::lagging(-10, -10));
        table
            .block_numbers
            .insert(ChainId::ARBITRUM_ONE, BlockNumberConfig::lagging(0, -10));

        table
    }

    #[must_use]
    pub fn retry(&self, chain: ChainId) -> RetryPolicy {
        self.retry.get(&chain).copied().unwrap_or(RetryPolicy::DEFAULT)
    }

    #[must_use]
    pub fn batch_params(&self, chain: ChainId, protocol: Protocol, optimistic: bool) -> BatchParams {
        let table = if optimistic {
            &self.optimistic
        } else {
            &self.non_optimistic
        };
        table
            .get(&(chain, protocol))
            .copied()
            .unwrap_or(BatchParams::DEFAULT)
    }

    #[must_use]
    pub fn gas_error_overrides(&self, chain: ChainId) -> FailureOverrides {
        self.gas_error_overrides
            .get(&chain)
            .copied()
            .unwrap_or(FailureOverrides::DEFAULT)
    }

    #[must_use]
    pub fn success_rate_overrides(&self, chain: ChainId) -> FailureOverrides {
        self.success_rate_overrides
            .get(&chain)
            .copied()
            .unwrap_or(FailureOverrides::DEFAULT)
    }

    #[must_use]
    pub fn block_numbers(&self, chain: ChainId) -> BlockNumberConfig {
        self.block_numbers
            .get(&chain)
            .copied()
            .unwrap_or(BlockNumberConfig::DEFAULT)
    }

    /// Resolved tuning for one chain, detached from the table.
    #[must_use]
    pub fn for_chain(&self, chain: ChainId) -> ChainTuning {
        let protocols = [Protocol::V2, Protocol::V3, Protocol::V4, Protocol::Mixed];
        ChainTuning {
            retry: self.retry(chain),
            gas_error_overrides: self.gas_error_overrides(chain),
            success_rate_overrides: self.success_rate_overrides(chain),
            block_numbers: self.block_numbers(chain),
            optimistic: protocols
                .iter()
                .map(|&p| (p, self.batch_params(chain, p, true)))
                .collect(),
            non_optimistic: protocols
                .iter()
                .map(|&p| (p, self.batch_params(chain, p, false)))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_chain_uses_defaults() {
        let table = TuningTable::standard();
        let chain = ChainId::new(999_999);
        assert_eq!(table.retry(chain), RetryPolicy::DEFAULT);
        assert_eq!(table.batch_params(chain, Protocol::V3, true), BatchParams::DEFAULT);
        assert_eq!(table.gas_error_overrides(chain), FailureOverrides::DEFAULT);
        assert_eq!(table.block_numbers(chain), BlockNumberConfig::DEFAULT);
    }

    #[test]
    fn batch_params_depend_on_mode() {
        let table = TuningTable::standard();
        let optimistic = table.batch_params(ChainId::BASE, Protocol::V3, true);
        let cautious = table.batch_params(ChainId::BASE, Protocol::V3, false);
        assert_eq!(optimistic.multicall_chunk, 1320);
        assert_eq!(cautious.multicall_chunk, 660);
        assert_eq!(cautious.gas_limit_per_call, 200_000);
    }

    #[test]
    fn mainnet_tuning_is_protocol_specific() {
        let table = TuningTable::standard();
        assert_eq!(
            table.batch_params(ChainId::MAINNET, Protocol::V2, false).multicall_chunk,
            987
        );
        assert_eq!(
            table.batch_params(ChainId::MAINNET, Protocol::V3, false).multicall_chunk,
            25
        );
        assert_eq!(
            table.batch_params(ChainId::MAINNET, Protocol::Mixed, true),
            BatchParams::DEFAULT
        );
    }

    #[test]
    fn celo_never_retries_and_has_its_own_overrides() {
        let table = TuningTable::standard();
        assert_eq!(table.retry(ChainId::CELO).retries, 0);
        assert_eq!(
            table.success_rate_overrides(ChainId::CELO),
            FailureOverrides::new(6_250_000, 4)
        );
        assert_eq!(
            table.gas_error_overrides(ChainId::CELO),
            FailureOverrides::new(5_000_000, 5)
        );
    }

    #[test]
    fn rollback_moves_quotes_behind_head() {
        let table = TuningTable::standard();
        let base = table.block_numbers(ChainId::BASE);
        assert_eq!(base.block_for_attempt(1_000, 0), 975);
        assert_eq!(base.block_for_attempt(1_000, 1), 955);

        let arbitrum = table.block_numbers(ChainId::ARBITRUM_ONE);
        assert_eq!(arbitrum.block_for_attempt(1_000, 0), 1_000);
        assert_eq!(arbitrum.block_for_attempt(1_000, 2), 990);

        assert_eq!(BlockNumberConfig::DEFAULT.block_for_attempt(5, 3), 5);
        assert_eq!(base.block_for_attempt(10, 1), 0);
    }

    #[test]
    fn backoff_doubles_until_capped() {
        let policy = RetryPolicy {
            retries: 5,
            min_timeout_ms: 100,
            max_timeout_ms: 1000,
        };
        assert_eq!(policy.backoff_ms(1), 100);
        assert_eq!(policy.backoff_ms(2), 200);
        assert_eq!(policy.backoff_ms(4), 800);
        assert_eq!(policy.backoff_ms(5), 1000);
    }

    #[test]
    fn chain_tuning_matches_table() {
        let table = TuningTable::standard();
        let tuning = table.for_chain(ChainId::ZKSYNC);
        assert_eq!(
            tuning.batch_params(Protocol::V4, false),
            table.batch_params(ChainId::ZKSYNC, Protocol::V4, false)
        );
        assert_eq!(tuning.gas_error_overrides, FailureOverrides::new(6_000_000, 10));
    }
}
