//! Persisted cache, route, and provider-health records.

use serde::{Deserialize, Serialize};

use super::{ChainId, TradeType};

/// A structured route entry kept in its own table for pair lookups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteRecord {
    pub route_id: String,
    pub chain_id: ChainId,
    pub token_in_address: String,
    pub token_out_address: String,
    pub amount: String,
    #[serde(rename = "type")]
    pub trade_type: TradeType,
    /// Opaque route payload owned by the routing engine.
    pub route: serde_json::Value,
    /// Unix seconds; set by the store on write.
    #[serde(default)]
    pub created_at: i64,
    /// Absolute unix-second expiry, 0 for unbounded; set by the store on write.
    #[serde(default)]
    pub ttl: i64,
}

/// Last known health of one RPC provider on one chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderHealthRecord {
    pub provider_name: String,
    pub chain_id: ChainId,
    pub is_healthy: bool,
    pub last_check: i64,
    pub error_count: u32,
    pub last_error: Option<String>,
}

/// How a healthy report treats the accumulated error count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCountPolicy {
    /// Errors only ever accumulate; healthy reports leave the count alone.
    #[default]
    Accumulate,
    /// A healthy report resets the count to zero.
    ResetOnHealthy,
}

/// Rows removed by one maintenance pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleanupReport {
    /// `(table, rows removed)` for every ttl-bearing table.
    pub removed: Vec<(&'static str, usize)>,
    pub vacuumed: bool,
}

impl CleanupReport {
    #[must_use]
    pub fn total_removed(&self) -> usize {
        self.removed.iter().map(|(_, n)| n).sum()
    }
}

/// Returns true when an entry with absolute expiry `ttl` is still live at `now`.
///
/// A zero ttl never expires.
#[must_use]
pub fn is_live(ttl: i64, now: i64) -> bool {
    ttl == 0 || ttl > now
}

/// Absolute expiry for an entry written at `now` with a relative ttl.
///
/// Non-positive relative ttls produce an unbounded entry.
#[must_use]
pub fn expiry_from(now: i64, ttl_secs: i64) -> i64 {
    if ttl_secs <= 0 {
        0
    } else {
        now.saturating_add(ttl_secs)
    }
}
