//! Worker execution loop

use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::{broadcast, mpsc};

use crate::config::Variant;
use crate::error::{Error, Result};
use crate::record::ConnectionRecord;
use crate::request;
use crate::transport::Connector;

use super::rate_limiter::RequestRateLimiter;
use super::stats::WorkerStats;

/// Pause before a sustained worker re-dials after a failed cycle.
const RECONNECT_BACKOFF: Duration = Duration::from_millis(250);

/// A sustained worker gives up after this many failed cycles in a row.
/// The counter resets on any cycle that completes its batch.
const MAX_CONSECUTIVE_FAILURES: usize = 5;

/// How a connection cycle ended, short of a transport error.
enum CycleEnd {
    /// The full request batch was written and the connection closed
    Completed,
    /// The shutdown signal arrived mid-cycle
    Shutdown,
}

/// Worker drives one connection at a time: connect -> write batch -> close.
///
/// Workers are independent tokio tasks spawned by the Launcher. Beyond the
/// shared read-only [`Connector`], each worker owns all of its state: its
/// connection, its random source, its stats. Transport errors end the
/// current cycle and are folded into the returned stats rather than
/// propagated; a worker's `run` never fails the overall run.
pub struct Worker {
    /// Unique worker identifier
    id: usize,

    /// Connection factory for the fixed target (shared, read-only)
    connector: Arc<Connector>,

    /// Requests written per connection before it is closed
    requests_per_connection: usize,

    /// Bounded: one cycle then stop. Sustained: cycle until shutdown.
    variant: Variant,

    /// Channel for per-connection records (worker -> launcher side)
    records_tx: mpsc::Sender<ConnectionRecord>,

    /// Per-worker rate limiter
    rate_limiter: RequestRateLimiter,
}

impl Worker {
    /// Create a new worker. Prefer [`super::WorkerBuilder`].
    pub fn new(
        id: usize,
        connector: Arc<Connector>,
        requests_per_connection: usize,
        variant: Variant,
        records_tx: mpsc::Sender<ConnectionRecord>,
        rate_limiter: RequestRateLimiter,
    ) -> Self {
        Self {
            id,
            connector,
            requests_per_connection,
            variant,
            records_tx,
            rate_limiter,
        }
    }

    /// Get the worker ID
    pub fn id(&self) -> usize {
        self.id
    }

    /// Run the worker until its variant's stop point or the shutdown signal.
    ///
    /// The signal is honored within one request's latency: it is checked
    /// before connecting, before every write, and during error backoff.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) -> WorkerStats {
        let mut stats = WorkerStats::new();
        stats.start();

        tracing::debug!(worker_id = self.id, variant = ?self.variant, "worker started");

        let mut rng = StdRng::from_entropy();
        let mut consecutive_failures = 0usize;

        loop {
            let stop = match self
                .connection_cycle(&mut stats, &mut rng, &mut shutdown)
                .await
            {
                Ok(CycleEnd::Shutdown) => {
                    tracing::debug!(worker_id = self.id, "worker received shutdown signal");
                    true
                }
                Ok(CycleEnd::Completed) => {
                    consecutive_failures = 0;
                    matches!(self.variant, Variant::Bounded)
                }
                Err(e) => {
                    stats.record_error();
                    tracing::warn!(worker_id = self.id, error = %e, "connection cycle failed");
                    match self.variant {
                        Variant::Bounded => true,
                        Variant::Sustained => {
                            consecutive_failures += 1;
                            if consecutive_failures >= MAX_CONSECUTIVE_FAILURES {
                                tracing::error!(
                                    worker_id = self.id,
                                    failures = consecutive_failures,
                                    "giving up after repeated failures"
                                );
                                true
                            } else {
                                // Backoff before re-dialing, still interruptible.
                                tokio::select! {
                                    biased;
                                    _ = shutdown.recv() => true,
                                    _ = tokio::time::sleep(RECONNECT_BACKOFF) => false,
                                }
                            }
                        }
                    }
                }
            };

            if stop {
                break;
            }
        }

        stats.stop();
        tracing::debug!(
            worker_id = self.id,
            connections = stats.connections,
            requests = stats.requests,
            errors = stats.errors,
            elapsed_ms = ?stats.elapsed().map(|d| d.as_millis()),
            "worker finished"
        );

        stats
    }

    /// Drive one full connection lifecycle.
    ///
    /// Sends a [`ConnectionRecord`] for every connection that was opened,
    /// whether the batch completed, was interrupted, or failed mid-write.
    async fn connection_cycle(
        &self,
        stats: &mut WorkerStats,
        rng: &mut StdRng,
        shutdown: &mut broadcast::Receiver<()>,
    ) -> Result<CycleEnd> {
        let started = Instant::now();

        let mut conn = tokio::select! {
            biased;
            _ = shutdown.recv() => return Ok(CycleEnd::Shutdown),
            res = self.connector.connect() => res?,
        };
        stats.record_connection();
        let tls = conn.is_tls();

        let mut written = 0usize;
        let mut end = CycleEnd::Completed;
        let mut failure: Option<Error> = None;

        while written < self.requests_per_connection {
            let target = self.connector.target();
            let request = request::render(target, rng);
            let write = async {
                self.rate_limiter.wait().await;
                conn.write_all(request.as_bytes()).await
            };

            tokio::select! {
                biased;
                _ = shutdown.recv() => {
                    end = CycleEnd::Shutdown;
                    break;
                }
                res = write => match res {
                    Ok(()) => {
                        written += 1;
                        stats.record_request();
                    }
                    Err(e) => {
                        failure = Some(e);
                        break;
                    }
                }
            }
        }

        // Graceful close on the clean paths; a failed connection is just
        // dropped.
        if failure.is_none() {
            if let Err(e) = conn.close().await {
                tracing::debug!(worker_id = self.id, error = %e, "close failed");
            }
        }

        let completed = failure.is_none() && matches!(end, CycleEnd::Completed);
        let record = ConnectionRecord {
            worker_id: self.id,
            requests_written: written,
            tls,
            elapsed_ms: started.elapsed().as_secs_f64() * 1000.0,
            completed,
            timestamp: chrono::Utc::now(),
        };
        if self.records_tx.send(record).await.is_err() {
            // Records are telemetry only; keep running without a consumer.
            tracing::debug!(worker_id = self.id, "records channel closed");
        }

        match failure {
            Some(e) => Err(e),
            None => Ok(end),
        }
    }
}

impl std::fmt::Debug for Worker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Worker")
            .field("id", &self.id)
            .field("target", self.connector.target())
            .field("requests_per_connection", &self.requests_per_connection)
            .field("variant", &self.variant)
            .field("rate_limiter", &self.rate_limiter)
            .finish()
    }
}
