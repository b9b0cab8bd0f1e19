//! Run configuration types

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// The fixed host/port/path tuple under test
///
/// Built once at startup and shared read-only by every worker; the only
/// state workers ever share.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    /// Host name or address the workers connect to
    pub host: String,

    /// TCP port; 443 selects the TLS transport
    pub port: u16,

    /// Request path, must start with '/'
    pub path: String,
}

impl Target {
    /// Create a new target
    pub fn new(host: impl Into<String>, port: u16, path: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port,
            path: path.into(),
        }
    }

    /// Whether connections to this target are TLS-wrapped
    ///
    /// Single port-based heuristic; there is no protocol negotiation.
    pub fn is_tls(&self) -> bool {
        self.port == 443
    }

    /// URL scheme implied by the port
    pub fn scheme(&self) -> &'static str {
        if self.is_tls() {
            "https"
        } else {
            "http"
        }
    }

    /// Referer value derived from scheme and host
    pub fn referer(&self) -> String {
        format!("{}://{}", self.scheme(), self.host)
    }

    /// Socket address string for connecting
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Validate the target fields
    pub fn validate(&self) -> Result<()> {
        if self.host.is_empty() {
            return Err(Error::config("host must not be empty"));
        }
        // Host and path end up on the wire inside header lines; reject
        // anything that could break HTTP framing.
        if self.host.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(Error::config("host must not contain whitespace"));
        }
        if self.port == 0 {
            return Err(Error::config("port must be in [1, 65535]"));
        }
        if !self.path.starts_with('/') {
            return Err(Error::config("path must start with '/'"));
        }
        if self.path.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(Error::config("path must not contain whitespace"));
        }
        Ok(())
    }
}

/// Connection lifecycle variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// One connection per worker: connect, write the configured number of
    /// requests, close, stop.
    Bounded,

    /// Reconnect after each batch of requests until shutdown. Workers with
    /// this variant only stop via the shutdown signal or a run duration.
    Sustained,
}

impl Default for Variant {
    fn default() -> Self {
        Variant::Bounded
    }
}

/// Run configuration
///
/// Defines a complete load-generation run: the target, how many workers,
/// how many requests each connection carries, and how workers cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Target under test
    pub target: Target,

    /// Number of concurrent workers (one connection each)
    pub worker_count: usize,

    /// Requests written per connection before it is closed
    pub requests_per_connection: usize,

    /// Connection lifecycle variant
    pub variant: Variant,

    /// Optional per-worker rate limit (requests per second)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_limit: Option<f64>,

    /// Optional run duration; required to bound a sustained run that is not
    /// driven interactively
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<Duration>,
}

impl RunConfig {
    /// Default requests per connection when not configured
    pub const DEFAULT_REQUESTS_PER_CONNECTION: usize = 100;

    /// Create a config for the given target with defaults
    pub fn new(target: Target) -> Self {
        Self {
            target,
            worker_count: 1,
            requests_per_connection: Self::DEFAULT_REQUESTS_PER_CONNECTION,
            variant: Variant::default(),
            rate_limit: None,
            duration: None,
        }
    }

    /// Set the worker count
    pub fn with_worker_count(mut self, count: usize) -> Self {
        self.worker_count = count;
        self
    }

    /// Set the number of requests written per connection
    pub fn with_requests_per_connection(mut self, count: usize) -> Self {
        self.requests_per_connection = count;
        self
    }

    /// Set the connection lifecycle variant
    pub fn with_variant(mut self, variant: Variant) -> Self {
        self.variant = variant;
        self
    }

    /// Set the per-worker rate limit
    pub fn with_rate_limit(mut self, rps: f64) -> Self {
        self.rate_limit = Some(rps);
        self
    }

    /// Set the run duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.target.validate()?;

        if self.worker_count == 0 {
            return Err(Error::config("worker_count must be at least 1"));
        }
        if self.requests_per_connection == 0 {
            return Err(Error::config("requests_per_connection must be at least 1"));
        }
        if let Some(rps) = self.rate_limit {
            if rps <= 0.0 {
                return Err(Error::config("rate limit must be positive"));
            }
        }
        if let Some(duration) = self.duration {
            if duration.is_zero() {
                return Err(Error::config("duration must be positive"));
            }
        }
        Ok(())
    }
}
