//! Namespaced cache keys.
//!
//! Keys are `{domain}:{chain_id}:{identifying fields}` with addresses
//! lower-cased and list dimensions sorted, so equivalent requests always land
//! on the same entry.

use alloy_primitives::Address;

use crate::domain::ChainId;
use crate::port::RouteCacheKey;

/// Key for a single cached route.
#[must_use]
pub fn route_key(key: &RouteCacheKey) -> String {
    let mut protocols: Vec<&str> = key.protocols.iter().map(|p| p.as_str()).collect();
    protocols.sort_unstable();
    protocols.dedup();

    let block = match key.block_number {
        Some(block) if block > 0 => block.to_string(),
        _ => "latest".to_string(),
    };

    format!(
        "route:{}:{}:{}:{}:{}:{}:{}",
        key.chain_id,
        key.amount,
        key.quote_token,
        key.trade_type,
        protocols.join(","),
        block,
        key.optimistic
    )
}

/// Key for the multi-route variant of [`route_key`].
#[must_use]
pub fn routes_key(key: &RouteCacheKey) -> String {
    format!("{}_routes", route_key(key))
}

#[must_use]
pub fn v3_pool_key(chain_id: ChainId, pool: &Address) -> String {
    format!("v3pool:{chain_id}:{}", lower(pool))
}

#[must_use]
pub fn v2_pair_key(chain_id: ChainId, pair: &Address) -> String {
    format!("v2pair:{chain_id}:{}", lower(pair))
}

#[must_use]
pub fn token_properties_key(chain_id: ChainId, token: &Address) -> String {
    format!("tokenprops:{chain_id}:{}", lower(token))
}

fn lower(address: &Address) -> String {
    address.to_string().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Protocol, TradeType};
    use alloy_primitives::address;

    fn key(protocols: Vec<Protocol>) -> RouteCacheKey {
        RouteCacheKey {
            chain_id: ChainId::MAINNET,
            amount: "1000".into(),
            quote_token: "USDC".into(),
            trade_type: TradeType::ExactIn,
            protocols,
            block_number: None,
            optimistic: false,
        }
    }

    #[test]
    fn protocol_order_does_not_change_key() {
        let a = route_key(&key(vec![Protocol::V3, Protocol::V2]));
        let b = route_key(&key(vec![Protocol::V2, Protocol::V3]));
        assert_eq!(a, b);
        assert_eq!(a, "route:1:1000:USDC:exactIn:v2,v3:latest:false");
    }

    #[test]
    fn pinned_block_and_optimistic_flag_are_part_of_key() {
        let mut k = key(vec![Protocol::Mixed, Protocol::V4]);
        k.block_number = Some(19_000_000);
        k.optimistic = true;
        assert_eq!(route_key(&k), "route:1:1000:USDC:exactIn:mixed,v4:19000000:true");
        assert_eq!(
            routes_key(&k),
            "route:1:1000:USDC:exactIn:mixed,v4:19000000:true_routes"
        );
    }

    #[test]
    fn quote_token_is_kept_verbatim() {
        let mut k = key(vec![Protocol::V3]);
        k.quote_token = "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48".into();
        assert!(route_key(&k).contains("0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48"));
    }

    #[test]
    fn entity_keys_lower_case_addresses() {
        let pool = address!("88e6A0c2dDD26FEEb64F039a2c41296FcB3f5640");
        assert_eq!(
            v3_pool_key(ChainId::MAINNET, &pool),
            "v3pool:1:0x88e6a0c2ddd26feeb64f039a2c41296fcb3f5640"
        );
        assert!(v2_pair_key(ChainId::BASE, &pool).starts_with("v2pair:8453:0x88e6a0"));
        assert!(token_properties_key(ChainId::BASE, &pool).starts_with("tokenprops:8453:"));
    }
}
