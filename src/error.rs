use serde::Serialize;
use thiserror::Error;

use crate::domain::ChainId;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("no RPC endpoint configured for chain {chain_id}")]
    MissingRpcEndpoint { chain_id: ChainId },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Cache store errors.
///
/// These never cross the cache facade boundary; facades log them and report
/// a miss instead.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("cache store is not open")]
    NotOpen,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("migration error: {0}")]
    Migration(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<diesel::result::Error> for StoreError {
    fn from(err: diesel::result::Error) -> Self {
        StoreError::Database(err.to_string())
    }
}

impl From<diesel::r2d2::PoolError> for StoreError {
    fn from(err: diesel::r2d2::PoolError) -> Self {
        StoreError::Connection(err.to_string())
    }
}

/// Errors raised while resolving a request to a chain dependency graph.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error(
        "All tokens must be on the same chain. TokenIn chain id: {}. TokenOut chain id: {}.",
        format_optional(.token_in),
        format_optional(.token_out)
    )]
    Validation {
        token_in: Option<ChainId>,
        token_out: Option<ChainId>,
    },

    #[error("chain {requested} is not available, loaded chains: {}", format_chains(.loaded))]
    UnresolvedChain {
        requested: ChainId,
        loaded: Vec<ChainId>,
    },
}

fn format_optional(chain: &Option<ChainId>) -> String {
    chain.map_or_else(|| "undefined".to_string(), |c| c.to_string())
}

fn format_chains(chains: &[ChainId]) -> String {
    if chains.is_empty() {
        return "none".to_string();
    }
    chains
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// RPC call failures.
#[derive(Error, Debug, Clone)]
pub enum RpcError {
    #[error("{method} on {provider} timed out after {timeout_ms}ms")]
    Timeout {
        provider: String,
        method: &'static str,
        timeout_ms: u64,
    },

    #[error("{method} on {provider} failed: {reason}")]
    Call {
        provider: String,
        method: &'static str,
        reason: String,
    },

    #[error("failed to decode {what}: {reason}")]
    Decode { what: &'static str, reason: String },

    #[error("{feature} is not available on chain {chain_id}")]
    Unsupported {
        feature: &'static str,
        chain_id: ChainId,
    },
}

/// Container construction failures that abort startup.
#[derive(Error, Debug)]
pub enum BuildError {
    #[error("fatal error building container: {0}")]
    Fatal(String),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Rpc(#[from] RpcError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),
}

pub type Result<T> = std::result::Result<T, Error>;

/// User-facing error body: a short code, a message, and an HTTP status.
///
/// Internal failures are reported with a generic detail so traces never leak
/// to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error_code: &'static str,
    pub detail: String,
    #[serde(skip)]
    pub status: u16,
}

impl From<&Error> for ErrorResponse {
    fn from(err: &Error) -> Self {
        match err {
            Error::Resolve(e @ ResolveError::Validation { .. }) => Self {
                error_code: "VALIDATION_ERROR",
                detail: e.to_string(),
                status: 400,
            },
            Error::Resolve(e @ ResolveError::UnresolvedChain { .. }) => Self {
                error_code: "UNSUPPORTED_CHAIN",
                detail: e.to_string(),
                status: 400,
            },
            _ => Self {
                error_code: "INTERNAL_ERROR",
                detail: "Unexpected error".to_string(),
                status: 500,
            },
        }
    }
}
