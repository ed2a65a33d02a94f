//! credset - manage credential sets for bundles
//!
//! Credential sets map the credentials a bundle declares to where their
//! values live on this machine. Sets are kept in the user's data directory
//! (override with `--data-dir`).

use clap::Parser;
use tracing_subscriber::EnvFilter;

use credset_cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so command output stays parseable
    let level = if cli.debug { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    credset_cli::run(cli).await
}
