//! Routes a parsed command line to its handler.

use crate::adapter::inbound::cli::command::{Cli, Commands, ServeArgs};
use crate::adapter::inbound::cli::output::{self, OutputConfig};
use crate::adapter::inbound::cli::{chains, health, serve, sweep};
use crate::error::Result;

/// Configure output and run the selected command.
pub async fn execute(cli: Cli) -> Result<()> {
    output::configure(OutputConfig::new(cli.json, cli.quiet));

    match cli.command {
        None => serve::execute(&cli.config, &ServeArgs::default(), cli.json).await,
        Some(Commands::Serve(args)) => serve::execute(&cli.config, &args, cli.json).await,
        Some(Commands::Sweep) => sweep::execute(&cli.config).await,
        Some(Commands::Chains) => chains::execute(&cli.config).await,
        Some(Commands::Health(args)) => health::execute(&cli.config, &args).await,
    }
}
