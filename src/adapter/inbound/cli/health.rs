//! Handler for the `health` command.

use std::path::Path;

use serde_json::json;

use crate::adapter::inbound::cli::command::HealthArgs;
use crate::adapter::inbound::cli::{operator, output};
use crate::domain::ChainId;
use crate::error::Result;

/// Execute the health command.
pub async fn execute(config_path: &Path, args: &HealthArgs) -> Result<()> {
    let config_toml = operator::read_config_toml(config_path)?;
    let chain_id = ChainId::new(args.chain);
    let record = operator::operator()
        .provider_health(&config_toml, &args.provider, chain_id)
        .await?;

    if output::is_json() {
        output::json_output(json!({
            "command": "health",
            "provider": args.provider,
            "chainId": args.chain,
            "record": record,
        }));
        return Ok(());
    }

    output::header(env!("CARGO_PKG_VERSION"));
    output::field("Provider", &args.provider);
    output::field("Chain", format!("{chain_id} ({})", chain_id.name()));
    match record {
        Some(record) => {
            output::field("Healthy", record.is_healthy);
            output::field("Errors", record.error_count);
            output::field("Last check", record.last_check);
            if let Some(error) = record.last_error {
                output::field("Last error", error);
            }
        }
        None => output::warning("No health recorded; providers never seen are assumed healthy"),
    }
    Ok(())
}
