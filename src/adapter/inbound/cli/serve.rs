//! Handler for the `serve` command.

use std::path::Path;

use crate::adapter::inbound::cli::command::ServeArgs;
use crate::adapter::inbound::cli::operator;
use crate::error::Result;
use crate::port::inbound::operator::runtime::ServeRequest;

/// Execute the serve command.
pub async fn execute(config_path: &Path, args: &ServeArgs, force_json_logs: bool) -> Result<()> {
    let config_toml = operator::read_config_toml(config_path)?;
    let request = build_serve_request(args, config_toml, force_json_logs);
    operator::operator().serve(request).await
}

fn build_serve_request(
    args: &ServeArgs,
    config_toml: String,
    force_json_logs: bool,
) -> ServeRequest {
    ServeRequest {
        config_toml,
        log_level: args.log_level.clone(),
        json_logs: args.json_logs || force_json_logs,
        database_path: args
            .database
            .as_ref()
            .map(|path| path.to_string_lossy().to_string()),
    }
}
