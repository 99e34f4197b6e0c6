//! Quoter batching port.
//!
//! Quoter calldata is built by the routing engine. The port picks the
//! quoter, the block, and the batch sizing.

use alloy_primitives::{Address, Bytes};
use async_trait::async_trait;

use super::rpc::CallOutcome;
use crate::domain::Protocol;
use crate::error::Result;

/// What kind of route is being quoted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuoteOptions {
    pub protocol: Protocol,
    /// Cached routes are quoted with the optimistic batch sizing.
    pub optimistic: bool,
    pub use_mixed_route_quoter: bool,
    pub mixed_route_contains_v4_pool: bool,
}

/// Results of one quoter batch, in call order.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteBatch {
    pub quoter: Address,
    pub block_number: u64,
    /// Number of attempts made, starting at one.
    pub attempts: u32,
    pub outcomes: Vec<CallOutcome>,
}

impl QuoteBatch {
    /// Share of calls that succeeded; an empty batch counts as fully successful.
    #[must_use]
    pub fn success_rate(&self) -> f64 {
        if self.outcomes.is_empty() {
            return 1.0;
        }
        let succeeded = self.outcomes.iter().filter(|o| o.success).count();
        succeeded as f64 / self.outcomes.len() as f64
    }
}

#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Quoter contract for a route kind on this chain.
    fn quoter_address(&self, options: &QuoteOptions) -> Result<Address>;

    /// Block to quote at for `attempt` (0-based).
    async fn block_number(&self, attempt: u32) -> Result<u64>;

    /// Send encoded quoter calls with retries.
    async fn quote(&self, call_data: &[Bytes], options: QuoteOptions) -> Result<QuoteBatch>;
}
