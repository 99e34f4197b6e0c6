//! Well-known contract deployments per chain.

use alloy_primitives::{address, Address};

use super::{ChainId, Protocol};

/// Multicall3, deployed at the same address on almost every chain.
pub const MULTICALL3: Address = address!("cA11bde05977b3631167028862bE2a173976CA11");

const MULTICALL3_ZKSYNC: Address = address!("F9cda624FBC7e059355ce98a31693d299FACd963");

const QUOTER_V2: Address = address!("61fFE014bA17989E743c5F6cB21bF9697530B21e");
const QUOTER_V2_BASE: Address = address!("3d4e44Eb1374240CE5F1B871ab261CD16335B76a");

const MIXED_ROUTE_QUOTER_V1_MAINNET: Address =
    address!("84E44095eeBfEC7793Cd7d5b57B7e401D7f1cA2E");
const MIXED_ROUTE_QUOTER_V1_BASE: Address = address!("e544efae946f0008ae9a8d64493efa7886b73776");

const V4_QUOTER_MAINNET: Address = address!("52f0e24d1c21c8a0cb1e5a5dd6198556bd9e1203");

const V4_STATE_VIEW_MAINNET: Address = address!("7fFE42C4a5DEeA5b0feC41C94C136Cf115597227");
const V4_STATE_VIEW_SEPOLIA: Address = address!("E1Dd9c3fA50EDB962E442f60DfBc432e24537E4C");

/// Multicall contract used for batched reads.
#[must_use]
pub fn multicall_address(chain: ChainId) -> Address {
    match chain {
        ChainId::ZKSYNC => MULTICALL3_ZKSYNC,
        _ => MULTICALL3,
    }
}

/// Read-only view over v4 pool state.
#[must_use]
pub fn v4_state_view_address(chain: ChainId) -> Option<Address> {
    match chain {
        ChainId::MAINNET => Some(V4_STATE_VIEW_MAINNET),
        ChainId::SEPOLIA => Some(V4_STATE_VIEW_SEPOLIA),
        _ => None,
    }
}

/// Quoter contract for a route.
///
/// Mixed routes use the mixed-route quoter; otherwise v3 routes use QuoterV2
/// and v4 routes the v4 quoter. Mixed routes through a v4 pool have no known
/// quoter yet.
#[must_use]
pub fn quoter_address(
    chain: ChainId,
    protocol: Protocol,
    use_mixed_route_quoter: bool,
    mixed_route_contains_v4_pool: bool,
) -> Option<Address> {
    if use_mixed_route_quoter {
        if mixed_route_contains_v4_pool {
            return None;
        }
        return match chain {
            ChainId::MAINNET => Some(MIXED_ROUTE_QUOTER_V1_MAINNET),
            ChainId::BASE => Some(MIXED_ROUTE_QUOTER_V1_BASE),
            _ => None,
        };
    }
    match protocol {
        Protocol::V3 => match chain {
            ChainId::MAINNET | ChainId::OPTIMISM | ChainId::ARBITRUM_ONE | ChainId::POLYGON => {
                Some(QUOTER_V2)
            }
            ChainId::BASE => Some(QUOTER_V2_BASE),
            _ => None,
        },
        Protocol::V4 => match chain {
            ChainId::MAINNET => Some(V4_QUOTER_MAINNET),
            _ => None,
        },
        Protocol::V2 | Protocol::Mixed => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zksync_has_its_own_multicall() {
        assert_eq!(multicall_address(ChainId::MAINNET), MULTICALL3);
        assert_ne!(multicall_address(ChainId::ZKSYNC), MULTICALL3);
    }

    #[test]
    fn quoter_selection_follows_route_shape() {
        assert_eq!(
            quoter_address(ChainId::MAINNET, Protocol::V3, false, false),
            Some(QUOTER_V2)
        );
        assert_eq!(
            quoter_address(ChainId::BASE, Protocol::V3, false, false),
            Some(QUOTER_V2_BASE)
        );
        assert_eq!(
            quoter_address(ChainId::BASE, Protocol::Mixed, true, false),
            Some(MIXED_ROUTE_QUOTER_V1_BASE)
        );
        assert_eq!(quoter_address(ChainId::MAINNET, Protocol::Mixed, true, true), None);
        assert_eq!(
            quoter_address(ChainId::MAINNET, Protocol::V4, false, false),
            Some(V4_QUOTER_MAINNET)
        );
        assert_eq!(quoter_address(ChainId::CELO, Protocol::V4, false, false), None);
    }
}
