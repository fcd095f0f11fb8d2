//! Command dispatch and response correlation over one transport.
//!
//! A [`Connection`] owns the transport handle, the framer holding partial
//! reads, and the command log. Callers send one validated command and then
//! pull the reply whose leading field carries the expected response code.

use std::io;
use std::time::{Duration, Instant};

use pagi_config::{Config, WorldEndpoint};
use tracing::{debug, info, trace};

use crate::CONNECTION_TARGET;
use crate::command::Command;
use crate::command_log::CommandLog;
use crate::error::{TransportOperation, WorldError};
use crate::framer::MessageFramer;
use crate::message::{Message, line_matches};
use crate::transport::{ShutdownHandle, TcpTransport, Transport};

/// Client-side projection of the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    /// Bytes requested from the transport per read.
    pub read_chunk_bytes: usize,
    /// Largest unterminated message the framer buffers.
    pub max_message_bytes: usize,
    /// Entries retained by the command log; `0` disables it.
    pub command_log_capacity: usize,
    /// Overall bound on a blocking receive; `None` waits indefinitely.
    pub receive_timeout: Option<Duration>,
    /// Pause after each pace of movement.
    pub pace_interval: Duration,
    /// Bound on establishing the TCP connection.
    pub connect_timeout: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for ClientSettings {
    fn from(config: &Config) -> Self {
        Self {
            read_chunk_bytes: config.read_chunk_bytes(),
            max_message_bytes: config.max_message_bytes(),
            command_log_capacity: config.command_log_capacity(),
            receive_timeout: config.receive_timeout(),
            pace_interval: config.pace_interval(),
            connect_timeout: config.connect_timeout(),
        }
    }
}

/// How [`Connection::receive`] treats the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReceiveMode {
    /// Wait for a matching message, discarding non-matching ones.
    #[default]
    Blocking,
    /// Inspect the head of the buffer after at most one poll; nothing is
    /// discarded.
    NonBlocking,
}

/// Exclusive owner of one transport, its read buffer, and the command log.
#[derive(Debug)]
pub struct Connection<T = TcpTransport> {
    transport: Option<T>,
    framer: MessageFramer,
    log: CommandLog,
    settings: ClientSettings,
    scratch: Vec<u8>,
}

impl Connection<TcpTransport> {
    /// Connects to the world at `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns `Resolve` or `Connect` when the world cannot be reached.
    pub fn connect(endpoint: &WorldEndpoint, settings: ClientSettings) -> Result<Self, WorldError> {
        let transport = TcpTransport::connect(endpoint, settings.connect_timeout)?;
        info!(
            target: CONNECTION_TARGET,
            endpoint = %endpoint,
            "connected to world"
        );
        Ok(Self::new(transport, settings))
    }

    /// Handle that closes the socket from another thread.
    ///
    /// # Errors
    ///
    /// Returns `NotConnected` after a disconnect and `Transport` when the
    /// socket handle cannot be duplicated.
    pub fn shutdown_handle(&self) -> Result<ShutdownHandle, WorldError> {
        self.transport
            .as_ref()
            .ok_or(WorldError::NotConnected)?
            .shutdown_handle()
            .map_err(|source| WorldError::transport(TransportOperation::Configure, source))
    }
}

impl<T: Transport> Connection<T> {
    /// Wraps an open transport.
    #[must_use]
    pub fn new(transport: T, settings: ClientSettings) -> Self {
        Self {
            transport: Some(transport),
            framer: MessageFramer::with_limit(settings.max_message_bytes),
            log: CommandLog::with_capacity(settings.command_log_capacity),
            scratch: vec![0; settings.read_chunk_bytes.max(1)],
            settings,
        }
    }

    /// Whether the transport is still open.
    #[must_use]
    pub const fn is_connected(&self) -> bool {
        self.transport.is_some()
    }

    /// Settings this connection was opened with.
    #[must_use]
    pub const fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    /// Commands sent so far, oldest first.
    #[must_use]
    pub const fn command_log(&self) -> &CommandLog {
        &self.log
    }

    /// Bytes received but not yet consumed.
    #[must_use]
    pub fn buffered_bytes(&self) -> usize {
        self.framer.len()
    }

    /// Validates and sends a raw message such as `sensorRequest,BP`.
    ///
    /// # Errors
    ///
    /// Returns `NotConnected` first, then any validation error, then
    /// `Transport` when the write fails. Nothing is written unless the
    /// message validates.
    pub fn dispatch(&mut self, raw: &str) -> Result<Command, WorldError> {
        if !self.is_connected() {
            return Err(WorldError::NotConnected);
        }
        let command = Command::parse(raw)?;
        self.send(&command)?;
        Ok(command)
    }

    /// Records and sends a validated command.
    ///
    /// # Errors
    ///
    /// Returns `NotConnected` when the transport is closed and `Transport`
    /// when the write fails.
    pub fn send(&mut self, command: &Command) -> Result<(), WorldError> {
        let transport = self.transport.as_mut().ok_or(WorldError::NotConnected)?;
        self.log.record(command);
        debug!(
            target: CONNECTION_TARGET,
            command = %command,
            "dispatching command"
        );
        transport
            .send(command.encode().as_bytes())
            .map_err(|source| WorldError::transport(TransportOperation::Send, source))
    }

    /// Pulls the next message answering `code` (empty matches anything).
    ///
    /// Blocking mode always yields `Some`; non-blocking mode yields `None`
    /// when the head of the buffer is missing or answers something else.
    ///
    /// # Errors
    ///
    /// See [`Connection::receive_blocking`].
    pub fn receive(
        &mut self,
        code: &str,
        mode: ReceiveMode,
    ) -> Result<Option<Message>, WorldError> {
        match mode {
            ReceiveMode::Blocking => self.receive_blocking(code).map(Some),
            ReceiveMode::NonBlocking => self.receive_non_blocking(code),
        }
    }

    /// Waits for a message answering `code`, discarding any that do not.
    ///
    /// # Errors
    ///
    /// Returns `NotConnected` when the transport is closed,
    /// `ConnectionClosed` when the world hangs up, `Timeout` when a receive
    /// timeout is configured and expires, `MessageTooLarge` when a line
    /// exceeds the buffer limit, and `Transport` for other read failures.
    pub fn receive_blocking(&mut self, code: &str) -> Result<Message, WorldError> {
        if !self.is_connected() {
            return Err(WorldError::NotConnected);
        }
        let deadline = self
            .settings
            .receive_timeout
            .map(|timeout| (Instant::now() + timeout, timeout));
        loop {
            if let Some(line) = self.framer.extract_one() {
                if line_matches(&line, code) {
                    return Ok(Message::new(line));
                }
                debug!(
                    target: CONNECTION_TARGET,
                    expected = code,
                    discarded = %line,
                    "discarding non-matching message"
                );
                continue;
            }
            self.fill(code, deadline)?;
        }
    }

    /// Closes the transport and resets the buffer and command log.
    ///
    /// # Errors
    ///
    /// Returns `NotConnected` when already closed and `Transport` when the
    /// shutdown fails; the connection is reset either way.
    pub fn disconnect(&mut self) -> Result<(), WorldError> {
        let mut transport = self.transport.take().ok_or(WorldError::NotConnected)?;
        self.framer.clear();
        self.log.clear();
        info!(target: CONNECTION_TARGET, "disconnected from world");
        transport
            .close()
            .map_err(|source| WorldError::transport(TransportOperation::Close, source))
    }

    fn receive_non_blocking(&mut self, code: &str) -> Result<Option<Message>, WorldError> {
        let Some(transport) = self.transport.as_mut() else {
            return Err(WorldError::NotConnected);
        };
        if !self.framer.has_message() {
            let polled = transport
                .poll(&mut self.scratch)
                .map_err(|source| WorldError::transport(TransportOperation::Receive, source))?;
            match polled {
                Some(0) => return Err(self.peer_closed()),
                Some(read) => self.feed(read)?,
                None => {}
            }
        }
        let head_matches = self
            .framer
            .peek_one()
            .is_some_and(|line| line_matches(&line, code));
        Ok(head_matches
            .then(|| self.framer.extract_one())
            .flatten()
            .map(Message::new))
    }

    fn fill(&mut self, code: &str, deadline: Option<(Instant, Duration)>) -> Result<(), WorldError> {
        let transport = self.transport.as_mut().ok_or(WorldError::NotConnected)?;
        if let Some((at, timeout)) = deadline {
            let remaining = at.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(WorldError::Timeout {
                    code: code.to_owned(),
                    timeout,
                });
            }
            transport
                .set_receive_timeout(Some(remaining))
                .map_err(|source| WorldError::transport(TransportOperation::Configure, source))?;
        }

        let read = match transport.receive(&mut self.scratch) {
            Ok(read) => read,
            // Deadline reached mid-read; the next pass reports the timeout.
            Err(error) if deadline.is_some() && is_read_timeout(&error) => return Ok(()),
            Err(source) => {
                return Err(WorldError::transport(TransportOperation::Receive, source));
            }
        };
        if read == 0 {
            return Err(self.peer_closed());
        }
        self.feed(read)
    }

    fn feed(&mut self, read: usize) -> Result<(), WorldError> {
        let chunk = self.scratch.get(..read).unwrap_or(self.scratch.as_slice());
        trace!(
            target: CONNECTION_TARGET,
            bytes = read,
            chunk = %String::from_utf8_lossy(chunk),
            "received bytes"
        );
        self.framer.feed(chunk)
    }

    fn peer_closed(&mut self) -> WorldError {
        self.transport = None;
        self.framer.clear();
        info!(target: CONNECTION_TARGET, "world closed the connection");
        WorldError::ConnectionClosed
    }
}

fn is_read_timeout(error: &io::Error) -> bool {
    matches!(
        error.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut
    )
}
