//! Handler for the `chains` command.

use std::path::Path;

use serde_json::json;
use tabled::{Table, Tabled};

use crate::adapter::inbound::cli::{operator, output};
use crate::error::Result;
use crate::port::inbound::operator::status::ChainStatus;

#[derive(Tabled)]
struct ChainRow {
    #[tabled(rename = "Chain")]
    chain_id: u64,
    #[tabled(rename = "Name")]
    name: &'static str,
    #[tabled(rename = "Provider")]
    provider: String,
    #[tabled(rename = "V2")]
    v2: &'static str,
    #[tabled(rename = "V4")]
    v4: &'static str,
    #[tabled(rename = "Mixed")]
    mixed: &'static str,
}

fn flag(enabled: bool) -> &'static str {
    if enabled {
        "yes"
    } else {
        "-"
    }
}

impl From<&ChainStatus> for ChainRow {
    fn from(status: &ChainStatus) -> Self {
        Self {
            chain_id: status.chain_id.get(),
            name: status.name,
            provider: status
                .provider_name
                .clone()
                .unwrap_or_else(|| "not configured".to_string()),
            v2: flag(status.v2_supported),
            v4: flag(status.v4_supported),
            mixed: flag(status.mixed_supported),
        }
    }
}

/// Execute the chains command.
pub async fn execute(config_path: &Path) -> Result<()> {
    let config_toml = operator::read_config_toml(config_path)?;
    let snapshot = operator::operator().chains(&config_toml).await?;

    if output::is_json() {
        let chains: Vec<_> = snapshot
            .chains
            .iter()
            .map(|c| {
                json!({
                    "chainId": c.chain_id.get(),
                    "name": c.name,
                    "loaded": c.loaded,
                    "provider": c.provider_name,
                    "v2Supported": c.v2_supported,
                    "v4Supported": c.v4_supported,
                    "mixedSupported": c.mixed_supported,
                })
            })
            .collect();
        output::json_output(json!({
            "command": "chains",
            "activityId": snapshot.activity_id,
            "chains": chains,
        }));
        return Ok(());
    }

    let loaded = snapshot.chains.iter().filter(|c| c.loaded).count();
    if !output::is_quiet() {
        output::header(env!("CARGO_PKG_VERSION"));
        output::field("Activity", &snapshot.activity_id);
        output::field("Loaded", format!("{loaded}/{}", snapshot.chains.len()));
        let rows: Vec<ChainRow> = snapshot.chains.iter().map(ChainRow::from).collect();
        output::table(Table::new(rows));
    }
    if loaded == 0 {
        output::warning("No RPC endpoints configured; set WEB3_RPC_{chain_id}");
    }
    Ok(())
}
