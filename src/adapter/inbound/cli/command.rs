//! Command-line interface definitions.
//!
//! Defines the CLI structure for routekeeper using `clap`. Without a
//! subcommand the binary serves.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Persistent route cache and per-chain provider container
#[derive(Parser, Debug)]
#[command(name = "routekeeper")]
#[command(version)]
pub struct Cli {
    /// Path to the configuration file (missing file means defaults)
    #[arg(short, long, global = true, default_value = "config.toml")]
    pub config: PathBuf,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Open the store, build the chain container, and run until interrupted
    Serve(ServeArgs),

    /// Remove expired cache rows once and print what was removed
    Sweep,

    /// Build the chain container and list every supported chain
    Chains,

    /// Show the stored health of one RPC provider
    Health(HealthArgs),
}

/// Arguments for the `serve` subcommand.
#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// Log level override (e.g. debug, info, warn)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long)]
    pub json_logs: bool,

    /// Database file override
    #[arg(long)]
    pub database: Option<PathBuf>,
}

/// Arguments for the `health` subcommand.
#[derive(Args, Debug)]
pub struct HealthArgs {
    /// Provider name as derived from the RPC host (e.g. alchemy, infura)
    pub provider: String,

    /// Chain id
    pub chain: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["routekeeper"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.config, PathBuf::from("config.toml"));
    }

    #[test]
    fn health_takes_provider_and_chain() {
        let cli =
            Cli::try_parse_from(["routekeeper", "health", "alchemy", "8453", "--json"]).unwrap();
        assert!(cli.json);
        match cli.command {
            Some(Commands::Health(args)) => {
                assert_eq!(args.provider, "alchemy");
                assert_eq!(args.chain, 8453);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn serve_accepts_overrides() {
        let cli = Cli::try_parse_from([
            "routekeeper",
            "--config",
            "/etc/routekeeper.toml",
            "serve",
            "--log-level",
            "debug",
            "--database",
            "/tmp/cache.db",
        ])
        .unwrap();
        assert_eq!(cli.config, PathBuf::from("/etc/routekeeper.toml"));
        let Some(Commands::Serve(args)) = cli.command else {
            panic!("expected serve");
        };
        assert_eq!(args.log_level.as_deref(), Some("debug"));
        assert_eq!(args.database, Some(PathBuf::from("/tmp/cache.db")));
    }
}
