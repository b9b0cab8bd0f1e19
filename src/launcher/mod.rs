//! Launcher module
//!
//! The launcher owns the run lifecycle: it spawns the configured number of
//! workers, holds the shutdown signal they all subscribe to, waits for every
//! worker to reach its closed state, and aggregates their stats.

mod aggregator;
mod builder;
mod executor;

pub use aggregator::{aggregate_worker_stats, AggregatedStats};
pub use builder::LauncherBuilder;
pub use executor::Launcher;
