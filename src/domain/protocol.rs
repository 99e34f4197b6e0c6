//! Liquidity protocol versions and trade direction.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Liquidity protocol a route or pool belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    V2,
    V3,
    V4,
    Mixed,
}

impl Protocol {
    /// Protocols that have a dedicated pool provider.
    pub const POOL_VERSIONS: [Protocol; 3] = [Protocol::V2, Protocol::V3, Protocol::V4];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Protocol::V2 => "v2",
            Protocol::V3 => "v3",
            Protocol::V4 => "v4",
            Protocol::Mixed => "mixed",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Protocol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "v2" => Ok(Protocol::V2),
            "v3" => Ok(Protocol::V3),
            "v4" => Ok(Protocol::V4),
            "mixed" => Ok(Protocol::Mixed),
            other => Err(format!("unknown protocol: {other}")),
        }
    }
}

/// Direction of a swap request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TradeType {
    #[serde(rename = "exactIn")]
    ExactIn,
    #[serde(rename = "exactOut")]
    ExactOut,
}

impl fmt::Display for TradeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeType::ExactIn => f.write_str("exactIn"),
            TradeType::ExactOut => f.write_str("exactOut"),
        }
    }
}

impl FromStr for TradeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "exactIn" => Ok(TradeType::ExactIn),
            "exactOut" => Ok(TradeType::ExactOut),
            other => Err(format!("unknown trade type: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protocol_parses_case_insensitively() {
        assert_eq!("V3".parse::<Protocol>().unwrap(), Protocol::V3);
        assert_eq!(" mixed ".parse::<Protocol>().unwrap(), Protocol::Mixed);
        assert!("v1".parse::<Protocol>().is_err());
    }

    #[test]
    fn trade_type_uses_camel_case_names() {
        assert_eq!(TradeType::ExactIn.to_string(), "exactIn");
        assert_eq!(
            serde_json::to_string(&TradeType::ExactOut).unwrap(),
            "\"exactOut\""
        );
        assert_eq!("exactOut".parse::<TradeType>().unwrap(), TradeType::ExactOut);
    }
}
