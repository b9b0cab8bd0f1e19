//! Builder pattern for Worker construction

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::config::Variant;
use crate::error::{Error, Result};
use crate::record::ConnectionRecord;
use crate::transport::Connector;

use super::executor::Worker;
use super::rate_limiter::RequestRateLimiter;

/// Builder for creating Worker instances
///
/// # Example
/// ```ignore
/// let worker = WorkerBuilder::new(0)
///     .connector(connector)
///     .records_tx(tx)
///     .requests_per_connection(100)
///     .variant(Variant::Bounded)
///     .build()?;
/// ```
pub struct WorkerBuilder {
    id: usize,
    connector: Option<Arc<Connector>>,
    records_tx: Option<mpsc::Sender<ConnectionRecord>>,
    requests_per_connection: Option<usize>,
    variant: Option<Variant>,
    rate_limit: Option<f64>,
}

impl WorkerBuilder {
    /// Create a new builder with the given worker ID
    pub fn new(id: usize) -> Self {
        Self {
            id,
            connector: None,
            records_tx: None,
            requests_per_connection: None,
            variant: None,
            rate_limit: None,
        }
    }

    /// Set the shared connector
    pub fn connector(mut self, connector: Arc<Connector>) -> Self {
        self.connector = Some(connector);
        self
    }

    /// Set the records channel sender
    pub fn records_tx(mut self, tx: mpsc::Sender<ConnectionRecord>) -> Self {
        self.records_tx = Some(tx);
        self
    }

    /// Set the per-connection request batch size
    pub fn requests_per_connection(mut self, count: usize) -> Self {
        self.requests_per_connection = Some(count);
        self
    }

    /// Set the connection lifecycle variant
    pub fn variant(mut self, variant: Variant) -> Self {
        self.variant = Some(variant);
        self
    }

    /// Set the per-worker rate limit (requests per second)
    pub fn rate_limit(mut self, rps: Option<f64>) -> Self {
        self.rate_limit = rps;
        self
    }

    /// Build the Worker
    ///
    /// # Errors
    /// Returns an error if any required field is missing or zero.
    pub fn build(self) -> Result<Worker> {
        let connector = self
            .connector
            .ok_or_else(|| Error::missing_config("connector"))?;
        let records_tx = self
            .records_tx
            .ok_or_else(|| Error::missing_config("records_tx"))?;
        let requests_per_connection = self
            .requests_per_connection
            .ok_or_else(|| Error::missing_config("requests_per_connection"))?;
        let variant = self
            .variant
            .ok_or_else(|| Error::missing_config("variant"))?;

        if requests_per_connection == 0 {
            return Err(Error::config("requests_per_connection must be at least 1"));
        }

        Ok(Worker::new(
            self.id,
            connector,
            requests_per_connection,
            variant,
            records_tx,
            RequestRateLimiter::new(self.rate_limit),
        ))
    }
}
