//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all settings.
//! Configuration is loaded from a TOML file, then environment variables
//! override the database path (`DATABASE_PATH`) and per-chain RPC endpoints
//! (`WEB3_RPC_{chain_id}`).
//!
//! # Example
//!
//! ```no_run
//! use routekeeper::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::path::Path;

use serde::Deserialize;
use url::Url;

use super::cache::CacheConfig;
use super::logging::LoggingConfig;
use super::resolver::ResolverConfig;
use super::rpc::RpcConfig;
use super::store::StoreConfig;
use super::subgraph::SubgraphConfig;
use super::token::{TokenDetectionConfig, TokenListsConfig};
use crate::domain::{ChainId, SUPPORTED_CHAINS};
use crate::error::{ConfigError, Result};

/// Environment variable overriding `[store] path`.
pub const DATABASE_PATH_ENV: &str = "DATABASE_PATH";

/// Environment variable holding the RPC endpoint for a chain.
#[must_use]
pub fn rpc_env_var(chain_id: ChainId) -> String {
    format!("WEB3_RPC_{chain_id}")
}

/// Main application configuration.
///
/// Every section is optional; an empty document yields the defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// SQLite cache store.
    #[serde(default)]
    pub store: StoreConfig,

    /// RPC endpoints, timeouts, and multicall gas.
    #[serde(default)]
    pub rpc: RpcConfig,

    /// In-memory cache lifetimes.
    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub token_lists: TokenListsConfig,

    /// Validator and fee detector contracts per chain.
    #[serde(default)]
    pub token_detection: TokenDetectionConfig,

    #[serde(default)]
    pub subgraph: SubgraphConfig,

    /// Request-time chain resolution.
    #[serde(default)]
    pub resolver: ResolverConfig,
}

impl Config {
    /// Parse configuration from TOML content, applying process environment
    /// overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML content is malformed or validation fails.
    #[allow(clippy::result_large_err)]
    pub fn parse_toml(content: &str) -> Result<Self> {
        Self::parse_toml_with_env(content, |key| std::env::var(key).ok())
    }

    /// Parse configuration from TOML content with an explicit environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML content is malformed or validation fails.
    #[allow(clippy::result_large_err)]
    pub fn parse_toml_with_env(
        content: &str,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.apply_env_overrides(lookup);
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML content is malformed
    /// - Validation fails
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Load configuration from a TOML file, or the defaults when the file
    /// does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file cannot be parsed or validated.
    #[allow(clippy::result_large_err)]
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Self::parse_toml("")
        }
    }

    /// Overlay `DATABASE_PATH` and `WEB3_RPC_{chain_id}` from `lookup`.
    ///
    /// Blank values are ignored.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let present = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(path) = present(DATABASE_PATH_ENV) {
            self.store.path = path;
        }
        for chain_id in SUPPORTED_CHAINS {
            if let Some(url) = present(&rpc_env_var(chain_id)) {
                self.rpc.endpoints.insert(chain_id.to_string(), url);
            }
        }
    }

    /// Validate configuration values.
    #[allow(clippy::result_large_err)]
    fn validate(&self) -> Result<()> {
        if self.store.path.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "store.path" }.into());
        }
        if !(0.0..=1.0).contains(&self.store.vacuum_probability) {
            return Err(ConfigError::InvalidValue {
                field: "vacuum_probability",
                reason: "must be between 0 and 1".to_string(),
            }
            .into());
        }
        if self.store.max_connections == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_connections",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.store.cleanup_interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "cleanup_interval_secs",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.rpc.default_timeout_ms == 0 || self.rpc.extended_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "rpc_timeouts",
                reason: "timeouts must be greater than 0".to_string(),
            }
            .into());
        }
        if self.token_lists.fetch_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "fetch_timeout_ms",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if !SUPPORTED_CHAINS.contains(&self.resolver.primary_chain()) {
            return Err(ConfigError::InvalidValue {
                field: "primary_chain",
                reason: format!("chain {} is not supported", self.resolver.primary_chain),
            }
            .into());
        }

        for (key, url) in &self.rpc.endpoints {
            if key.parse::<u64>().is_err() {
                return Err(ConfigError::InvalidValue {
                    field: "rpc.endpoints",
                    reason: format!("key {key:?} is not a chain id"),
                }
                .into());
            }
            if !url.trim().is_empty() {
                Url::parse(url.trim()).map_err(|e| ConfigError::InvalidValue {
                    field: "rpc.endpoints",
                    reason: format!("chain {key}: {e}"),
                })?;
            }
        }

        if let Some(url) = &self.token_lists.allowed_url {
            Url::parse(url).map_err(|e| ConfigError::InvalidValue {
                field: "allowed_url",
                reason: e.to_string(),
            })?;
        }
        Ok(())
    }

    /// Endpoint for a chain, if one is configured.
    #[must_use]
    pub fn rpc_endpoint(&self, chain_id: ChainId) -> Option<Url> {
        self.rpc
            .endpoint(chain_id)
            .and_then(|url| Url::parse(url).ok())
    }

    /// Allowed token list URL, if one is configured.
    #[must_use]
    pub fn allowed_token_list_url(&self) -> Option<Url> {
        self.token_lists
            .allowed_url
            .as_deref()
            .and_then(|url| Url::parse(url).ok())
    }

    /// Initialize logging with the configured settings.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::resolver::UnresolvedChainPolicy;
    use crate::domain::ErrorCountPolicy;
    use crate::error::Error;
    use std::collections::HashMap;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn parse(content: &str) -> Result<Config> {
        Config::parse_toml_with_env(content, no_env)
    }

    fn invalid_field(err: Error) -> &'static str {
        match err {
            Error::Config(ConfigError::InvalidValue { field, .. }) => field,
            other => panic!("expected invalid value, got {other:?}"),
        }
    }

    #[test]
    fn empty_document_uses_defaults() {
        let config = parse("").unwrap();
        assert_eq!(config.store.path, "routing-api.db");
        assert_eq!(config.store.max_connections, 5);
        assert_eq!(config.store.cleanup_interval_secs, 3600);
        assert_eq!(config.store.error_count_policy, ErrorCountPolicy::Accumulate);
        assert_eq!(config.rpc.multicall_gas_limit_per_call, 375_000);
        assert_eq!(config.cache.gas_price_ttl_secs, 15);
        assert_eq!(config.resolver.primary_chain(), ChainId::MAINNET);
        assert_eq!(config.resolver.unresolved_chain, UnresolvedChainPolicy::Reject);
        assert!(config.rpc_endpoint(ChainId::MAINNET).is_none());
    }

    #[test]
    fn sections_override_defaults() {
        let config = parse(
            r#"
            [store]
            path = "/tmp/cache.db"
            error_count_policy = "reset_on_healthy"

            [rpc.endpoints]
            "8453" = "https://base-mainnet.g.alchemy.com/v2/key"

            [resolver]
            unresolved_chain = "fallback"
            "#,
        )
        .unwrap();
        assert_eq!(config.store.path, "/tmp/cache.db");
        assert_eq!(config.store.error_count_policy, ErrorCountPolicy::ResetOnHealthy);
        assert_eq!(config.resolver.unresolved_chain, UnresolvedChainPolicy::Fallback);
        assert_eq!(
            config.rpc_endpoint(ChainId::BASE).map(|u| u.to_string()),
            Some("https://base-mainnet.g.alchemy.com/v2/key".to_string())
        );
    }

    #[test]
    fn environment_wins_over_file() {
        let env: HashMap<&str, &str> = [
            ("DATABASE_PATH", "/data/env.db"),
            ("WEB3_RPC_1", "https://mainnet.infura.io/v3/env"),
            ("WEB3_RPC_137", "  "),
        ]
        .into_iter()
        .collect();
        let config = Config::parse_toml_with_env(
            r#"
            [rpc.endpoints]
            "1" = "https://file.example/rpc"
            "#,
            |key| env.get(key).map(|v| (*v).to_string()),
        )
        .unwrap();
        assert_eq!(config.store.path, "/data/env.db");
        assert_eq!(
            config.rpc_endpoint(ChainId::MAINNET).map(|u| u.to_string()),
            Some("https://mainnet.infura.io/v3/env".to_string())
        );
        assert!(config.rpc_endpoint(ChainId::POLYGON).is_none());
    }

    #[test]
    fn vacuum_probability_is_bounded() {
        let err = parse("[store]\nvacuum_probability = 1.5").unwrap_err();
        assert_eq!(invalid_field(err), "vacuum_probability");
    }

    #[test]
    fn unsupported_primary_chain_is_rejected() {
        let err = parse("[resolver]\nprimary_chain = 999").unwrap_err();
        assert_eq!(invalid_field(err), "primary_chain");
    }

    #[test]
    fn endpoint_keys_must_be_chain_ids() {
        let err = parse("[rpc.endpoints]\nmainnet = \"https://rpc.example\"").unwrap_err();
        assert_eq!(invalid_field(err), "rpc.endpoints");

        let err = parse("[rpc.endpoints]\n\"1\" = \"not a url\"").unwrap_err();
        assert_eq!(invalid_field(err), "rpc.endpoints");
    }

    #[test]
    fn zero_timeouts_are_rejected() {
        let err = parse("[rpc]\ndefault_timeout_ms = 0").unwrap_err();
        assert_eq!(invalid_field(err), "rpc_timeouts");
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = parse("[store\npath = 1").unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::Parse(_))));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_default(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.rpc.default_timeout_ms, 5000);
        assert!(Config::load(dir.path().join("absent.toml")).is_err());
    }
}
