//! Worker module
//!
//! The Worker is the unit of concurrency in h1-surge: one worker owns one
//! connection at a time and drives its whole lifecycle, **connect ->
//! write batch -> close** (and, in the sustained variant, **-> reconnect**).
//! Every request in a batch carries a freshly generated fingerprint.
//!
//! Workers never coordinate with each other. They share only the read-only
//! [`Connector`](crate::transport::Connector) and the records channel; the
//! connection, the random source, and the stats are private to each worker.
//!
//! # Example
//!
//! ```ignore
//! use h1_surge::worker::WorkerBuilder;
//! use h1_surge::Variant;
//!
//! let worker = WorkerBuilder::new(0)
//!     .connector(connector)
//!     .records_tx(tx)
//!     .requests_per_connection(100)
//!     .variant(Variant::Bounded)
//!     .build()?;
//!
//! let stats = worker.run(shutdown_rx).await;
//! println!("requests written: {}", stats.requests);
//! ```

mod builder;
mod executor;
mod rate_limiter;
mod stats;

pub use builder::WorkerBuilder;
pub use executor::Worker;
pub use rate_limiter::RequestRateLimiter;
pub use stats::WorkerStats;
