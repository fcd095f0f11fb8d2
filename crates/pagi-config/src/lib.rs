//! Shared configuration for the PAGI world client and its CLI.
//!
//! Values are layered by `ortho_config`: built-in defaults are overridden by
//! a configuration file (`--config-path` or `PAGI_CONFIG_PATH`), then by
//! `PAGI_*` environment variables, and finally by command-line flags. The
//! client crate consumes the resolved [`Config`] through accessor methods so
//! the field layout can evolve without touching call sites.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

mod defaults;
mod endpoint;
mod logging;

pub use defaults::{
    DEFAULT_COMMAND_LOG_CAPACITY, DEFAULT_CONNECT_TIMEOUT_MS, DEFAULT_LOG_FILTER,
    DEFAULT_MAX_MESSAGE_BYTES, DEFAULT_PACE_INTERVAL_MS, DEFAULT_READ_CHUNK_BYTES,
    DEFAULT_WORLD_PORT, default_command_log_capacity, default_connect_timeout_ms,
    default_log_filter, default_log_filter_string, default_log_format,
    default_max_message_bytes, default_pace_interval_ms, default_read_chunk_bytes,
    default_world_port,
};
pub use endpoint::{WorldEndpoint, local_host_name};
pub use logging::{LogFormat, LogFormatParseError};

/// Resolved configuration shared by the client library and the CLI.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "PAGI")]
pub struct Config {
    /// Host running the world. `None` targets the local machine's own name.
    #[serde(default)]
    pub world_host: Option<String>,
    /// TCP port the world listens on.
    #[serde(default = "default_world_port")]
    pub world_port: u16,
    /// Upper bound for establishing the TCP connection, in milliseconds.
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    /// Overall bound for a blocking receive, in milliseconds. Unset waits
    /// indefinitely.
    #[serde(default)]
    pub receive_timeout_ms: Option<u64>,
    /// Maximum bytes pulled from the socket per read.
    #[serde(default = "default_read_chunk_bytes")]
    pub read_chunk_bytes: usize,
    /// Largest unterminated message the read buffer may hold.
    #[serde(default = "default_max_message_bytes")]
    pub max_message_bytes: usize,
    /// Number of dispatched commands retained for diagnostics. Zero disables
    /// the log.
    #[serde(default = "default_command_log_capacity")]
    pub command_log_capacity: usize,
    /// Pause between the force pulses of a scripted pace, in milliseconds.
    #[serde(default = "default_pace_interval_ms")]
    pub pace_interval_ms: u64,
    /// `tracing` filter expression applied by the CLI.
    #[serde(default = "default_log_filter_string")]
    pub log_filter: String,
    /// Output format for structured logs.
    #[serde(default = "default_log_format")]
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            world_host: None,
            world_port: DEFAULT_WORLD_PORT,
            connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT_MS,
            receive_timeout_ms: None,
            read_chunk_bytes: DEFAULT_READ_CHUNK_BYTES,
            max_message_bytes: DEFAULT_MAX_MESSAGE_BYTES,
            command_log_capacity: DEFAULT_COMMAND_LOG_CAPACITY,
            pace_interval_ms: DEFAULT_PACE_INTERVAL_MS,
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
        }
    }
}

impl Config {
    /// Endpoint of the world described by `world_host` and `world_port`.
    #[must_use]
    pub fn world_endpoint(&self) -> WorldEndpoint {
        WorldEndpoint::new(self.world_host.clone(), self.world_port)
    }

    /// Connection establishment bound.
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    /// Overall bound for blocking receives, when configured.
    #[must_use]
    pub fn receive_timeout(&self) -> Option<Duration> {
        self.receive_timeout_ms.map(Duration::from_millis)
    }

    /// Pause inserted after each pace pulse.
    #[must_use]
    pub const fn pace_interval(&self) -> Duration {
        Duration::from_millis(self.pace_interval_ms)
    }

    /// Read chunk size, never below one byte.
    #[must_use]
    pub fn read_chunk_bytes(&self) -> usize {
        self.read_chunk_bytes.max(1)
    }

    /// Largest unterminated message the read buffer may hold.
    #[must_use]
    pub const fn max_message_bytes(&self) -> usize {
        self.max_message_bytes
    }

    /// Capacity of the diagnostic command log.
    #[must_use]
    pub const fn command_log_capacity(&self) -> usize {
        self.command_log_capacity
    }

    /// Log filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Structured log format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }
}
