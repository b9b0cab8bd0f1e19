//! Channel configuration for worker/launcher communication

/// Buffer sizing for the connection-records channel (workers -> launcher)
#[derive(Debug, Clone)]
pub struct ChannelConfig {
    /// Records channel buffer size
    pub records_buffer: usize,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            records_buffer: 10_000,
        }
    }
}

impl ChannelConfig {
    /// Create a channel config with a custom records buffer size
    pub fn with_records_buffer(mut self, size: usize) -> Self {
        self.records_buffer = size;
        self
    }
}
