//! Handler for the `sweep` command.

use std::path::Path;

use serde_json::json;

use crate::adapter::inbound::cli::{operator, output};
use crate::error::Result;

/// Execute the sweep command.
pub async fn execute(config_path: &Path) -> Result<()> {
    let config_toml = operator::read_config_toml(config_path)?;
    let report = operator::operator().sweep(&config_toml).await?;

    if output::is_json() {
        let tables: serde_json::Map<String, serde_json::Value> = report
            .removed
            .iter()
            .map(|(table, n)| ((*table).to_string(), json!(n)))
            .collect();
        output::json_output(json!({
            "command": "sweep",
            "removed": tables,
            "total": report.total_removed(),
            "vacuumed": report.vacuumed,
        }));
        return Ok(());
    }

    output::header(env!("CARGO_PKG_VERSION"));
    for (table, removed) in &report.removed {
        output::field(table, removed);
    }
    output::success(&format!(
        "Removed {} expired rows{}",
        report.total_removed(),
        if report.vacuumed { ", vacuumed" } else { "" }
    ));
    Ok(())
}
