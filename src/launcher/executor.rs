//! Launcher execution logic

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{broadcast, mpsc};

use crate::config::RunConfig;
use crate::error::Result;
use crate::record::ConnectionRecord;
use crate::transport::Connector;
use crate::worker::{WorkerBuilder, WorkerStats};

use super::aggregator::aggregate_worker_stats;

/// Launcher manages the run lifecycle
///
/// Responsible for spawning workers, owning the shutdown signal, and
/// collecting results. Join semantics are strict: [`Launcher::run`] returns
/// only after every worker task has finished, so no worker is ever left
/// dangling.
pub struct Launcher {
    /// Run configuration
    pub(crate) config: RunConfig,

    /// Connection factory (shared read-only across workers)
    pub(crate) connector: Arc<Connector>,

    /// Records sender (cloned for each worker)
    pub(crate) records_tx: mpsc::Sender<ConnectionRecord>,

    /// Shutdown signal sender
    pub(crate) shutdown_tx: broadcast::Sender<()>,
}

impl Launcher {
    /// Create a new launcher
    ///
    /// Use [`super::LauncherBuilder`] for validated construction.
    pub fn new(
        config: RunConfig,
        connector: Arc<Connector>,
        records_tx: mpsc::Sender<ConnectionRecord>,
    ) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);
        Self {
            config,
            connector,
            records_tx,
            shutdown_tx,
        }
    }

    /// Get a shutdown signal receiver
    pub fn shutdown_receiver(&self) -> broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    /// Trigger shutdown of all workers
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }

    /// Get the run configuration
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Run the load generation
    ///
    /// Spawns the configured number of workers, waits for all of them, and
    /// returns their per-worker stats. Transport failures are already folded
    /// into each worker's stats; only a panicked worker task is reported
    /// here, and it never aborts the rest of the run.
    pub async fn run(&self) -> Result<Vec<WorkerStats>> {
        let start = Instant::now();

        tracing::info!(
            host = %self.config.target.host,
            port = self.config.target.port,
            path = %self.config.target.path,
            tls = self.connector.is_tls(),
            workers = self.config.worker_count,
            requests_per_connection = self.config.requests_per_connection,
            variant = ?self.config.variant,
            rate_limit = ?self.config.rate_limit,
            "starting run"
        );

        let mut handles = Vec::with_capacity(self.config.worker_count);
        for worker_id in 0..self.config.worker_count {
            let worker = WorkerBuilder::new(worker_id)
                .connector(Arc::clone(&self.connector))
                .records_tx(self.records_tx.clone())
                .requests_per_connection(self.config.requests_per_connection)
                .variant(self.config.variant)
                .rate_limit(self.config.rate_limit)
                .build()?;

            let shutdown_rx = self.shutdown_tx.subscribe();
            handles.push(tokio::spawn(async move { worker.run(shutdown_rx).await }));
        }

        let mut results = Vec::with_capacity(handles.len());
        for (worker_id, handle) in handles.into_iter().enumerate() {
            match handle.await {
                Ok(stats) => results.push(stats),
                Err(e) => {
                    tracing::error!(worker_id, error = %e, "worker task panicked");
                }
            }
        }

        let aggregated = aggregate_worker_stats(&results);
        tracing::info!(
            elapsed_secs = start.elapsed().as_secs_f64(),
            connections = aggregated.total_connections,
            requests = aggregated.total_requests,
            errors = aggregated.total_errors,
            rps = aggregated.requests_per_second,
            "run completed"
        );

        Ok(results)
    }

    /// Run with Ctrl+C handling: the first signal triggers a graceful
    /// shutdown that every worker honors within one request's latency.
    pub async fn run_with_signal_handling(&self) -> Result<Vec<WorkerStats>> {
        let shutdown_tx = self.shutdown_tx.clone();
        let signal_handle = tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    tracing::info!("received Ctrl+C, shutting down workers");
                    let _ = shutdown_tx.send(());
                }
                Err(e) => {
                    tracing::error!(error = %e, "failed to listen for Ctrl+C");
                }
            }
        });

        let results = self.run().await;
        signal_handle.abort();
        results
    }

    /// Run with a deadline: shutdown is triggered when the timeout elapses.
    pub async fn run_with_timeout(&self, timeout: Duration) -> Result<Vec<WorkerStats>> {
        let shutdown_tx = self.shutdown_tx.clone();
        let timeout_handle = tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            tracing::info!(?timeout, "run duration reached, shutting down workers");
            let _ = shutdown_tx.send(());
        });

        let results = self.run().await;
        timeout_handle.abort();
        results
    }
}

impl std::fmt::Debug for Launcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Launcher")
            .field("config", &self.config)
            .field("connector", &self.connector)
            .finish()
    }
}
