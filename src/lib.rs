//! h1-surge: concurrent synthetic HTTP/1.1 traffic generator
//!
//! This crate provides the building blocks for generating sustained,
//! randomized HTTP request load against a single target:
//!
//! - Immutable run configuration (target, worker count, variant)
//! - Randomized client fingerprints (user-agent + accept headers)
//! - Plain-TCP / TLS connection handling
//! - Workers and the launcher that spawns and joins them
//!
//! The tool is write-only from the transport's perspective: it emits
//! request headers and never parses responses. It is intended for
//! load-testing targets the operator owns or is authorized to test.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod channel;
pub mod cli;
pub mod config;
pub mod error;
pub mod fingerprint;
pub mod launcher;
pub mod record;
pub mod request;
pub mod transport;
pub mod worker;

pub use channel::ChannelConfig;
pub use config::{RunConfig, Target, Variant};
pub use error::{Error, Result};
pub use launcher::{aggregate_worker_stats, AggregatedStats, Launcher, LauncherBuilder};
pub use record::ConnectionRecord;
pub use transport::{Connection, Connector};
pub use worker::{RequestRateLimiter, Worker, WorkerBuilder, WorkerStats};
