//! Realtime configuration module
//!
//! Tunables of the messaging core: history page size, per-connection
//! buffers, frame limits, heartbeat and retention.

use std::time::Duration;
use thiserror::Error;

/// Default number of messages returned by a history read
pub const DEFAULT_HISTORY_LIMIT: usize = 10;
/// Default capacity of each connection's outbound buffer
pub const DEFAULT_OUTBOUND_BUFFER: usize = 64;
/// Default maximum accepted inbound frame size in bytes
pub const DEFAULT_MAX_FRAME_BYTES: usize = 4096;
/// Default capacity of the global notification queue
pub const DEFAULT_GLOBAL_QUEUE_CAPACITY: usize = 1000;
/// Default heartbeat ping interval
pub const DEFAULT_HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);
/// Default heartbeat timeout
pub const DEFAULT_HEARTBEAT_TIMEOUT: Duration = Duration::from_secs(90);

/// Realtime configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RealtimeConfig {
    /// Messages returned by a history read when no limit is given
    pub history_limit: usize,
    /// Frames buffered per connection before writes are dropped
    pub outbound_buffer: usize,
    /// Largest inbound frame accepted, in bytes
    pub max_frame_bytes: usize,
    /// Capacity of the global notification queue
    pub global_queue_capacity: usize,
    /// Ping interval; `Duration::ZERO` disables the heartbeat
    pub heartbeat_interval: Duration,
    /// Silence after which a connection is evicted
    pub heartbeat_timeout: Duration,
    /// Retention applied to every conversation log key after an append
    pub history_ttl: Option<Duration>,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
            outbound_buffer: DEFAULT_OUTBOUND_BUFFER,
            max_frame_bytes: DEFAULT_MAX_FRAME_BYTES,
            global_queue_capacity: DEFAULT_GLOBAL_QUEUE_CAPACITY,
            heartbeat_interval: DEFAULT_HEARTBEAT_INTERVAL,
            heartbeat_timeout: DEFAULT_HEARTBEAT_TIMEOUT,
            history_ttl: None,
        }
    }
}

impl RealtimeConfig {
    /// Create a new RealtimeConfigBuilder
    pub fn builder() -> RealtimeConfigBuilder {
        RealtimeConfigBuilder::default()
    }

    /// Whether the heartbeat watchdog runs
    pub fn heartbeat_enabled(&self) -> bool {
        !self.heartbeat_interval.is_zero()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.history_limit == 0 {
            return Err(ConfigError::InvalidValue("history_limit", "must be greater than zero".into()));
        }
        if self.outbound_buffer == 0 {
            return Err(ConfigError::InvalidValue("outbound_buffer", "must be greater than zero".into()));
        }
        if self.max_frame_bytes == 0 {
            return Err(ConfigError::InvalidValue("max_frame_bytes", "must be greater than zero".into()));
        }
        if self.global_queue_capacity == 0 {
            return Err(ConfigError::InvalidValue(
                "global_queue_capacity",
                "must be greater than zero".into(),
            ));
        }
        if self.heartbeat_enabled() && self.heartbeat_timeout < self.heartbeat_interval {
            return Err(ConfigError::InvalidValue(
                "heartbeat_timeout",
                "must not be shorter than heartbeat_interval".into(),
            ));
        }
        if self.history_ttl.is_some_and(|ttl| ttl.is_zero()) {
            return Err(ConfigError::InvalidValue("history_ttl", "must be greater than zero".into()));
        }
        Ok(())
    }
}

/// Builder for RealtimeConfig
#[derive(Debug, Default)]
pub struct RealtimeConfigBuilder {
    config: RealtimeConfig,
}

impl RealtimeConfigBuilder {
    /// Set the default history page size
    pub fn history_limit(mut self, limit: usize) -> Self {
        self.config.history_limit = limit;
        self
    }

    /// Set the per-connection outbound buffer
    pub fn outbound_buffer(mut self, capacity: usize) -> Self {
        self.config.outbound_buffer = capacity;
        self
    }

    /// Set the maximum inbound frame size
    pub fn max_frame_bytes(mut self, bytes: usize) -> Self {
        self.config.max_frame_bytes = bytes;
        self
    }

    /// Set the global queue capacity
    pub fn global_queue_capacity(mut self, capacity: usize) -> Self {
        self.config.global_queue_capacity = capacity;
        self
    }

    /// Set heartbeat interval and timeout
    pub fn heartbeat(mut self, interval: Duration, timeout: Duration) -> Self {
        self.config.heartbeat_interval = interval;
        self.config.heartbeat_timeout = timeout;
        self
    }

    /// Set the conversation log retention
    pub fn history_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.config.history_ttl = ttl;
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<RealtimeConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// Configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
    #[error("missing value: {0}")]
    MissingValue(&'static str),
}
