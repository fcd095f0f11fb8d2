//! Error types surfaced by the world client.

use std::fmt;
use std::io;
use std::time::Duration;

use camino::Utf8PathBuf;
use thiserror::Error;

/// Transport step that was executing when an I/O failure occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportOperation {
    /// Writing a command to the socket.
    Send,
    /// Reading reply bytes from the socket.
    Receive,
    /// Adjusting the read deadline.
    Configure,
    /// Shutting the socket down.
    Close,
}

impl fmt::Display for TransportOperation {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Send => "send",
            Self::Receive => "receive",
            Self::Configure => "configure",
            Self::Close => "close",
        };
        formatter.write_str(label)
    }
}

/// Errors returned by [`crate::Connection`] and the world facade.
#[derive(Debug, Error)]
pub enum WorldError {
    /// An operation needed an open connection and none was available.
    #[error("no open connection to the world; use connect() to open one")]
    NotConnected,

    /// The world's host name could not be resolved.
    #[error("failed to resolve world address {endpoint}: {source}")]
    Resolve {
        /// Endpoint being resolved.
        endpoint: String,
        /// Underlying resolver error.
        #[source]
        source: io::Error,
    },

    /// The world refused the connection or was unreachable.
    #[error("failed to connect to world at {endpoint}: {source}")]
    Connect {
        /// Endpoint being dialled.
        endpoint: String,
        /// Underlying socket error.
        #[source]
        source: io::Error,
    },

    /// Reading from or writing to the socket failed.
    #[error("transport {operation} failed: {source}")]
    Transport {
        /// Step that failed.
        operation: TransportOperation,
        /// Underlying socket error.
        #[source]
        source: io::Error,
    },

    /// The world closed the stream.
    #[error("the world closed the connection")]
    ConnectionClosed,

    /// No matching reply arrived before the configured receive deadline.
    #[error("no '{code}' message arrived within {timeout:?}")]
    Timeout {
        /// Response code being awaited (empty for any message).
        code: String,
        /// Configured bound.
        timeout: Duration,
    },

    /// The read buffer grew past its limit without a message terminator.
    #[error("buffered {size} bytes without a message terminator (limit {limit})")]
    MessageTooLarge {
        /// Size of the unterminated tail.
        size: usize,
        /// Configured ceiling.
        limit: usize,
    },

    /// The command name is not part of the world's vocabulary.
    #[error("invalid command found in the message '{message}'")]
    InvalidCommand {
        /// Offending outgoing message.
        message: String,
    },

    /// A sensor request named an unknown sensor.
    #[error("invalid sensor '{sensor}' in message '{message}'")]
    InvalidSensor {
        /// Rejected sensor code.
        sensor: String,
        /// Offending outgoing message.
        message: String,
    },

    /// A force command named an unknown force.
    #[error("invalid force '{force}' in message '{message}'")]
    InvalidForce {
        /// Rejected force code.
        force: String,
        /// Offending outgoing message.
        message: String,
    },

    /// The task file to load does not exist locally.
    #[error("task file at '{path}' was not found")]
    TaskFileNotFound {
        /// Requested task path.
        path: Utf8PathBuf,
    },

    /// A task reset was requested before any task was loaded.
    #[error("cannot reset task, no previous task file found")]
    NoPreviousTask,

    /// A reply did not fit the schema of the operation that requested it.
    #[error("malformed '{code}' response: {reason}")]
    MalformedResponse {
        /// Response code of the offending message.
        code: String,
        /// What was wrong with it.
        reason: String,
    },

    /// The protocol reserves the operation but the client does not provide it.
    #[error("{operation} is not supported yet")]
    Unsupported {
        /// Name of the reserved operation.
        operation: &'static str,
    },

    /// A hand or movement direction was neither left nor right.
    #[error("only L or R (LEFT or RIGHT) are valid directions, got '{0}'")]
    InvalidDirection(String),
}

impl WorldError {
    pub(crate) fn transport(operation: TransportOperation, source: io::Error) -> Self {
        Self::Transport { operation, source }
    }

    pub(crate) fn malformed(code: &str, reason: impl Into<String>) -> Self {
        Self::MalformedResponse {
            code: code.to_owned(),
            reason: reason.into(),
        }
    }

    pub(crate) const fn unsupported(operation: &'static str) -> Self {
        Self::Unsupported { operation }
    }
}
