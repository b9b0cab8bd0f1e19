//! CLI argument parsing and run dispatch

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::time::Duration;

use crate::config::{RunConfig, Target, Variant};
use crate::launcher::LauncherBuilder;

/// h1-surge - Concurrent synthetic HTTP/1.1 traffic generator
///
/// Drives raw keep-alive GET traffic with randomized browser fingerprints
/// against a server you are authorized to load-test.
#[derive(Parser, Debug)]
#[command(name = "h1-surge")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Target hostname or IP address
    #[arg(long)]
    pub host: String,

    /// Target port (443 enables TLS with certificate verification)
    #[arg(short, long, default_value = "80")]
    pub port: u16,

    /// Request path
    #[arg(long, default_value = "/")]
    pub path: String,

    /// Number of concurrent workers
    #[arg(short, long, default_value = "10")]
    pub workers: usize,

    /// Requests written per connection before the connection is closed
    #[arg(short, long, default_value = "100")]
    pub requests_per_connection: usize,

    /// Run mode
    #[arg(short, long, value_enum, default_value_t = Mode::Bounded)]
    pub mode: Mode,

    /// Stop the run after this many seconds (sustained mode)
    #[arg(short, long)]
    pub duration: Option<u64>,

    /// Per-worker request rate limit in requests per second
    #[arg(long)]
    pub rate_limit: Option<f64>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// How long each worker keeps going
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// One connection cycle per worker, then stop
    Bounded,
    /// Reconnect and repeat until shutdown
    Sustained,
}

impl From<Mode> for Variant {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Bounded => Variant::Bounded,
            Mode::Sustained => Variant::Sustained,
        }
    }
}

impl Cli {
    /// Build the run configuration from the parsed arguments.
    pub fn run_config(&self) -> RunConfig {
        let mut config = RunConfig::new(Target::new(&self.host, self.port, &self.path))
            .with_worker_count(self.workers)
            .with_requests_per_connection(self.requests_per_connection)
            .with_variant(self.mode.into());
        if let Some(rps) = self.rate_limit {
            config = config.with_rate_limit(rps);
        }
        if let Some(secs) = self.duration {
            config = config.with_duration(Duration::from_secs(secs));
        }
        config
    }

    /// Run the traffic generation based on CLI arguments
    pub async fn run(&self) -> Result<()> {
        let config = self.run_config();
        let duration = config.duration;
        let variant = config.variant;

        let (launcher, mut records_rx) = LauncherBuilder::new(config)
            .build()
            .context("invalid run configuration")?;

        // Drain per-connection records so workers never block on the channel.
        let drain_handle = tokio::spawn(async move {
            while let Some(record) = records_rx.recv().await {
                tracing::debug!(
                    worker_id = record.worker_id,
                    requests = record.requests_written,
                    tls = record.tls,
                    elapsed_ms = record.elapsed_ms,
                    completed = record.completed,
                    "connection closed"
                );
            }
        });

        let results = match (duration, variant) {
            (Some(deadline), _) => launcher.run_with_timeout(deadline).await?,
            (None, Variant::Sustained) => launcher.run_with_signal_handling().await?,
            (None, Variant::Bounded) => launcher.run().await?,
        };

        drop(launcher);
        drain_handle
            .await
            .context("record drain task panicked")?;

        let aggregated = crate::launcher::aggregate_worker_stats(&results);
        println!("{aggregated}");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["h1-surge", "--host", "example.test"]);
        assert_eq!(cli.port, 80);
        assert_eq!(cli.path, "/");
        assert_eq!(cli.workers, 10);
        assert_eq!(cli.requests_per_connection, 100);
        assert_eq!(cli.mode, Mode::Bounded);
        assert!(cli.duration.is_none());
        assert!(cli.rate_limit.is_none());
    }

    #[test]
    fn test_cli_builds_run_config() {
        let cli = Cli::parse_from([
            "h1-surge",
            "--host",
            "example.test",
            "--port",
            "443",
            "--workers",
            "3",
            "--requests-per-connection",
            "5",
            "--mode",
            "sustained",
            "--duration",
            "30",
        ]);
        let config = cli.run_config();
        assert_eq!(config.target.port, 443);
        assert!(config.target.is_tls());
        assert_eq!(config.worker_count, 3);
        assert_eq!(config.requests_per_connection, 5);
        assert_eq!(config.variant, Variant::Sustained);
        assert_eq!(config.duration, Some(Duration::from_secs(30)));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cli_requires_host() {
        assert!(Cli::try_parse_from(["h1-surge"]).is_err());
    }
}
