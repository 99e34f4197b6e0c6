//! Gas price observations.

use serde::{Deserialize, Serialize};

/// A gas price reading in wei.
///
/// For fee-market chains this is the suggested max fee per gas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GasPrice {
    pub wei: u128,
    /// Suggested priority fee when the reading came from a fee-market estimate.
    #[serde(default)]
    pub priority_fee_wei: Option<u128>,
}

impl GasPrice {
    #[must_use]
    pub fn legacy(wei: u128) -> Self {
        Self {
            wei,
            priority_fee_wei: None,
        }
    }
}
