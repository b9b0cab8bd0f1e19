//! h1-surge - Concurrent synthetic HTTP/1.1 traffic generator
//!
//! Command-line entry point for driving randomized keep-alive GET load
//! against a target you are authorized to test.

use anyhow::Result;
use clap::Parser;
use h1_surge::cli::Cli;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    cli.run().await?;

    Ok(())
}
