use crate::logging::LogFormat;

/// Port the PAGI world listens on unless configured otherwise.
pub const DEFAULT_WORLD_PORT: u16 = 42209;

/// Default bound for establishing the TCP connection.
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 5_000;

/// Default number of bytes requested from the socket per read.
pub const DEFAULT_READ_CHUNK_BYTES: usize = 4_096;

/// Default ceiling for a single unterminated message.
pub const DEFAULT_MAX_MESSAGE_BYTES: usize = 1024 * 1024;

/// Default number of dispatched commands retained for diagnostics.
pub const DEFAULT_COMMAND_LOG_CAPACITY: usize = 256;

/// Default pause between pace pulses.
pub const DEFAULT_PACE_INTERVAL_MS: u64 = 2_000;

/// Default log filter expression used by the CLI.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Default world port (serde helper).
#[must_use]
pub const fn default_world_port() -> u16 {
    DEFAULT_WORLD_PORT
}

/// Default connection bound in milliseconds (serde helper).
#[must_use]
pub const fn default_connect_timeout_ms() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_MS
}

/// Default read chunk size (serde helper).
#[must_use]
pub const fn default_read_chunk_bytes() -> usize {
    DEFAULT_READ_CHUNK_BYTES
}

/// Default message ceiling (serde helper).
#[must_use]
pub const fn default_max_message_bytes() -> usize {
    DEFAULT_MAX_MESSAGE_BYTES
}

/// Default command log capacity (serde helper).
#[must_use]
pub const fn default_command_log_capacity() -> usize {
    DEFAULT_COMMAND_LOG_CAPACITY
}

/// Default pace interval in milliseconds (serde helper).
#[must_use]
pub const fn default_pace_interval_ms() -> u64 {
    DEFAULT_PACE_INTERVAL_MS
}

/// Default log filter expression used by the CLI.
#[must_use]
pub const fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned log filter value used where allocation is required (e.g. serde).
#[must_use]
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format for the CLI.
#[must_use]
pub const fn default_log_format() -> LogFormat {
    LogFormat::Json
}
