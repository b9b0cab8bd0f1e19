//! Builder pattern for Launcher construction

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::channel::ChannelConfig;
use crate::config::RunConfig;
use crate::error::Result;
use crate::record::ConnectionRecord;
use crate::transport::Connector;

use super::executor::Launcher;

/// Builder for creating a Launcher with a validated configuration
///
/// # Example
///
/// ```ignore
/// let config = RunConfig::new(Target::new("example.test", 443, "/"))
///     .with_worker_count(3)
///     .with_requests_per_connection(5);
///
/// let (launcher, records_rx) = LauncherBuilder::new(config).build()?;
/// let stats = launcher.run().await?;
/// ```
pub struct LauncherBuilder {
    config: RunConfig,
    channel_config: ChannelConfig,
}

impl LauncherBuilder {
    /// Create a builder for the given run configuration
    pub fn new(config: RunConfig) -> Self {
        Self {
            config,
            channel_config: ChannelConfig::default(),
        }
    }

    /// Set the channel configuration
    pub fn channel_config(mut self, config: ChannelConfig) -> Self {
        self.channel_config = config;
        self
    }

    /// Build the launcher and return it with the records receiver
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or if the target
    /// host cannot serve as a TLS server name (port 443 only).
    pub fn build(self) -> Result<(Launcher, mpsc::Receiver<ConnectionRecord>)> {
        self.config.validate()?;

        let connector = Arc::new(Connector::new(self.config.target.clone())?);
        let (records_tx, records_rx) = mpsc::channel(self.channel_config.records_buffer);

        let launcher = Launcher::new(self.config, connector, records_tx);
        Ok((launcher, records_rx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Target;

    #[test]
    fn test_builder_validates_config() {
        let config = RunConfig::new(Target::new("example.test", 80, "/")).with_worker_count(0);
        assert!(LauncherBuilder::new(config).build().is_err());
    }

    #[test]
    fn test_builder_rejects_invalid_host() {
        let config = RunConfig::new(Target::new("exa mple", 443, "/"));
        assert!(LauncherBuilder::new(config).build().is_err());
    }

    #[test]
    fn test_builder_success() {
        let config = RunConfig::new(Target::new("example.test", 443, "/")).with_worker_count(3);
        let (launcher, _records_rx) = LauncherBuilder::new(config).build().unwrap();
        assert_eq!(launcher.config().worker_count, 3);
    }
}
