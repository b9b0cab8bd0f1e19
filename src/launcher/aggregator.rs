//! Result aggregation from multiple workers

use std::time::Duration;

use crate::worker::WorkerStats;

/// Aggregated statistics from all workers
#[derive(Debug, Clone, Default)]
pub struct AggregatedStats {
    /// Number of workers that completed
    pub total_workers: usize,

    /// Total connections opened
    pub total_connections: usize,

    /// Total requests written
    pub total_requests: usize,

    /// Total failed connection cycles
    pub total_errors: usize,

    /// Maximum elapsed time across all workers
    pub total_duration: Duration,

    /// Overall requests written per second
    pub requests_per_second: f64,
}

impl std::fmt::Display for AggregatedStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} workers, {} connections, {} requests ({:.1} req/s), {} errors in {:.2}s",
            self.total_workers,
            self.total_connections,
            self.total_requests,
            self.requests_per_second,
            self.total_errors,
            self.total_duration.as_secs_f64()
        )
    }
}

/// Aggregate statistics from multiple workers
pub fn aggregate_worker_stats(stats: &[WorkerStats]) -> AggregatedStats {
    if stats.is_empty() {
        return AggregatedStats::default();
    }

    let total_connections: usize = stats.iter().map(|s| s.connections).sum();
    let total_requests: usize = stats.iter().map(|s| s.requests).sum();
    let total_errors: usize = stats.iter().map(|s| s.errors).sum();

    // Workers run in parallel, so wall time is the slowest worker's time.
    let total_duration = stats
        .iter()
        .filter_map(|s| s.elapsed())
        .max()
        .unwrap_or(Duration::ZERO);

    let secs = total_duration.as_secs_f64();
    let requests_per_second = if secs > 0.0 {
        total_requests as f64 / secs
    } else {
        0.0
    };

    AggregatedStats {
        total_workers: stats.len(),
        total_connections,
        total_requests,
        total_errors,
        total_duration,
        requests_per_second,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregate_empty() {
        let agg = aggregate_worker_stats(&[]);
        assert_eq!(agg.total_workers, 0);
        assert_eq!(agg.total_requests, 0);
        assert_eq!(agg.requests_per_second, 0.0);
    }

    #[test]
    fn test_aggregate_sums_workers() {
        let mut a = WorkerStats::new();
        a.start();
        a.connections = 1;
        a.requests = 100;
        a.stop();

        let mut b = WorkerStats::new();
        b.start();
        b.connections = 2;
        b.requests = 200;
        b.errors = 1;
        b.stop();

        let agg = aggregate_worker_stats(&[a, b]);
        assert_eq!(agg.total_workers, 2);
        assert_eq!(agg.total_connections, 3);
        assert_eq!(agg.total_requests, 300);
        assert_eq!(agg.total_errors, 1);
    }

    #[test]
    fn test_aggregate_display() {
        let agg = AggregatedStats {
            total_workers: 3,
            total_connections: 3,
            total_requests: 15,
            total_errors: 0,
            total_duration: Duration::from_secs(1),
            requests_per_second: 15.0,
        };
        let rendered = agg.to_string();
        assert!(rendered.contains("3 workers"));
        assert!(rendered.contains("15 requests"));
    }
}
