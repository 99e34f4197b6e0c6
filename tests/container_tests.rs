//! Container build and request-time resolution, end to end.

mod support;

use routekeeper::application::resolver::{ChainResolver, UnresolvedChainPolicy};
use routekeeper::domain::{ChainId, SUPPORTED_CHAINS};
use routekeeper::error::{Error, ErrorResponse, ResolveError};
use routekeeper::infrastructure::builder::ContainerBuilder;
use routekeeper::testkit::config::config;
use support::store::TempStore;

const TWO_CHAINS: &str = r#"
[rpc.endpoints]
"1" = "http://127.0.0.1:1/mainnet"
"42161" = "http://127.0.0.1:1/arbitrum"
"#;

#[tokio::test]
async fn missing_endpoints_leave_only_those_chains_empty() {
    let temp = TempStore::open(0);
    let container = ContainerBuilder::new(config(TWO_CHAINS))
        .store(temp.store.clone())
        .clock(temp.clock.clone())
        .build()
        .await
        .unwrap();

    assert_eq!(container.graphs().count(), SUPPORTED_CHAINS.len());
    assert_eq!(
        container.loaded_chains(),
        vec![ChainId::MAINNET, ChainId::ARBITRUM_ONE]
    );
    for chain_id in SUPPORTED_CHAINS {
        let graph = container.graph(chain_id).unwrap();
        let expected = chain_id == ChainId::MAINNET || chain_id == ChainId::ARBITRUM_ONE;
        assert_eq!(graph.is_loaded(), expected, "chain {chain_id}");
    }
}

#[tokio::test]
async fn feature_flags_follow_the_allow_lists() {
    let container = ContainerBuilder::new(config(TWO_CHAINS))
        .chains([ChainId::MAINNET, ChainId::ARBITRUM_ONE, ChainId::POLYGON])
        .build()
        .await
        .unwrap();

    let mainnet = container.graph(ChainId::MAINNET).unwrap().features();
    assert!(mainnet.v2_supported && mainnet.v4_supported && mainnet.mixed_supported);

    let arbitrum = container.graph(ChainId::ARBITRUM_ONE).unwrap().features();
    assert!(!arbitrum.v2_supported);
    assert!(!arbitrum.v4_supported);
    assert!(arbitrum.mixed_supported);

    // Flags are known even for a chain that failed to load.
    let polygon = container.graph(ChainId::POLYGON).unwrap();
    assert!(!polygon.is_loaded());
    assert!(polygon.features().v2_supported);
}

#[tokio::test]
async fn every_build_gets_a_fresh_activity_id() {
    let first = ContainerBuilder::new(config(""))
        .chains([ChainId::MAINNET])
        .build()
        .await
        .unwrap();
    let second = ContainerBuilder::new(config(""))
        .chains([ChainId::MAINNET])
        .build()
        .await
        .unwrap();

    assert_ne!(first.activity_id(), second.activity_id());
}

#[tokio::test]
async fn resolver_serves_loaded_chains_and_rejects_the_rest() {
    let container = ContainerBuilder::new(config(TWO_CHAINS))
        .chains([ChainId::MAINNET, ChainId::ARBITRUM_ONE, ChainId::BASE])
        .build()
        .await
        .unwrap();
    let resolver = ChainResolver::new(ChainId::MAINNET, UnresolvedChainPolicy::Reject);

    let graph = resolver
        .resolve(
            &container,
            Some(ChainId::ARBITRUM_ONE),
            Some(ChainId::ARBITRUM_ONE),
        )
        .unwrap();
    assert_eq!(graph.chain_id(), ChainId::ARBITRUM_ONE);

    let err = resolver
        .resolve(&container, Some(ChainId::BASE), Some(ChainId::BASE))
        .unwrap_err();
    assert_eq!(
        err,
        ResolveError::UnresolvedChain {
            requested: ChainId::BASE,
            loaded: vec![ChainId::MAINNET, ChainId::ARBITRUM_ONE],
        }
    );

    let response = ErrorResponse::from(&Error::from(err));
    assert_eq!(response.status, 400);
    assert_eq!(response.error_code, "UNSUPPORTED_CHAIN");
}

#[tokio::test]
async fn fallback_policy_from_config_routes_to_primary() {
    let config = config(
        r#"
[rpc.endpoints]
"1" = "http://127.0.0.1:1/mainnet"

[resolver]
unresolved_chain = "fallback"
"#,
    );
    let resolver = config.resolver.resolver();
    let container = ContainerBuilder::new(config)
        .chains([ChainId::MAINNET, ChainId::BASE])
        .build()
        .await
        .unwrap();

    let graph = resolver
        .resolve(&container, Some(ChainId::BASE), Some(ChainId::BASE))
        .unwrap();
    assert_eq!(graph.chain_id(), ChainId::MAINNET);

    let err = resolver
        .resolve(&container, Some(ChainId::MAINNET), Some(ChainId::BASE))
        .unwrap_err();
    let response = ErrorResponse::from(&Error::from(err));
    assert_eq!(response.status, 400);
    assert_eq!(response.error_code, "VALIDATION_ERROR");
    assert_eq!(
        serde_json::to_value(&response).unwrap(),
        serde_json::json!({
            "errorCode": "VALIDATION_ERROR",
            "detail": "All tokens must be on the same chain. TokenIn chain id: 1. TokenOut chain id: 8453.",
        })
    );
}
