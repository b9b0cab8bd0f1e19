//! Per-connection records sent from workers to the launcher

use serde::{Deserialize, Serialize};

/// Record of one completed (or aborted) connection cycle
///
/// Workers send one of these over the records channel after every
/// connection they drive, whether it finished its batch or ended early.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionRecord {
    /// Worker that owned the connection
    pub worker_id: usize,

    /// Requests actually written on this connection
    pub requests_written: usize,

    /// Whether the connection was TLS-wrapped
    pub tls: bool,

    /// Wall time the connection was open, in milliseconds
    pub elapsed_ms: f64,

    /// Whether the connection completed its full request batch
    pub completed: bool,

    /// When the connection was closed
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_serialization() {
        let record = ConnectionRecord {
            worker_id: 3,
            requests_written: 100,
            tls: true,
            elapsed_ms: 12.5,
            completed: true,
            timestamp: chrono::Utc::now(),
        };

        let json = serde_json::to_string(&record).unwrap();
        let deserialized: ConnectionRecord = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized.worker_id, 3);
        assert_eq!(deserialized.requests_written, 100);
        assert!(deserialized.tls);
        assert!(deserialized.completed);
    }
}
