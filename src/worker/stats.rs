//! Per-worker statistics

use std::time::Instant;

/// Statistics tracked by each worker
#[derive(Debug, Default, Clone)]
pub struct WorkerStats {
    /// Connections successfully opened
    pub connections: usize,

    /// Requests successfully written
    pub requests: usize,

    /// Failed connection cycles (connect, handshake, or write errors)
    pub errors: usize,

    /// Worker start time
    pub started_at: Option<Instant>,

    /// Worker end time
    pub ended_at: Option<Instant>,
}

impl WorkerStats {
    /// Create new empty stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the start time
    pub fn start(&mut self) {
        self.started_at = Some(Instant::now());
    }

    /// Record the end time
    pub fn stop(&mut self) {
        self.ended_at = Some(Instant::now());
    }

    /// Record an opened connection
    pub fn record_connection(&mut self) {
        self.connections += 1;
    }

    /// Record one written request
    pub fn record_request(&mut self) {
        self.requests += 1;
    }

    /// Record a failed connection cycle
    pub fn record_error(&mut self) {
        self.errors += 1;
    }

    /// Elapsed time since start (until stop, or now if still running)
    pub fn elapsed(&self) -> Option<std::time::Duration> {
        self.started_at.map(|start| {
            self.ended_at
                .map(|end| end.duration_since(start))
                .unwrap_or_else(|| start.elapsed())
        })
    }

    /// Requests written per second over the worker's lifetime
    pub fn requests_per_second(&self) -> f64 {
        self.elapsed()
            .map(|d| {
                let secs = d.as_secs_f64();
                if secs > 0.0 {
                    self.requests as f64 / secs
                } else {
                    0.0
                }
            })
            .unwrap_or(0.0)
    }

    /// Merge stats from another worker
    pub fn merge(&mut self, other: &WorkerStats) {
        self.connections += other.connections;
        self.requests += other.requests;
        self.errors += other.errors;
    }
}
