//! Byte-stream transport to the world.
//!
//! The [`Transport`] trait isolates the socket so the connection logic can be
//! exercised against scripted streams; [`TcpTransport`] is the production
//! implementation.

use std::io::{self, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use pagi_config::WorldEndpoint;
use tracing::debug;

use crate::CONNECTION_TARGET;
use crate::error::WorldError;

const LOOPBACK: &str = "127.0.0.1";

/// Bidirectional byte stream to the world.
pub trait Transport {
    /// Writes every byte of `bytes` and flushes.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error.
    fn send(&mut self, bytes: &[u8]) -> io::Result<()>;

    /// Blocks until at least one byte is available and reads it into
    /// `buffer`. `Ok(0)` means the peer closed the stream.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error; a read deadline surfaces as
    /// `WouldBlock` or `TimedOut`.
    fn receive(&mut self, buffer: &mut [u8]) -> io::Result<usize>;

    /// Reads whatever is already available without waiting.
    ///
    /// Returns `Ok(None)` when nothing is pending.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error.
    fn poll(&mut self, buffer: &mut [u8]) -> io::Result<Option<usize>>;

    /// Bounds each blocking read; `None` waits indefinitely.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error.
    fn set_receive_timeout(&mut self, timeout: Option<Duration>) -> io::Result<()>;

    /// Shuts the stream down.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error.
    fn close(&mut self) -> io::Result<()>;
}

/// TCP stream to a world process.
#[derive(Debug)]
pub struct TcpTransport {
    stream: TcpStream,
}

impl TcpTransport {
    /// Resolves `endpoint` and connects within `timeout`.
    ///
    /// # Errors
    ///
    /// Returns `Resolve` when no address can be found and `Connect` when the
    /// world refuses or does not answer in time.
    pub fn connect(endpoint: &WorldEndpoint, timeout: Duration) -> Result<Self, WorldError> {
        let host = endpoint.host();
        let resolved = resolve_tcp_address(&host, endpoint.port());
        // An unresolvable own host name still reaches a world on loopback.
        let resolved = match resolved {
            Err(_) if endpoint.is_local() => resolve_tcp_address(LOOPBACK, endpoint.port()),
            other => other,
        };
        let address = resolved.map_err(|source| WorldError::Resolve {
            endpoint: endpoint.to_string(),
            source,
        })?;
        let stream = TcpStream::connect_timeout(&address, timeout).map_err(|source| {
            WorldError::Connect {
                endpoint: endpoint.to_string(),
                source,
            }
        })?;
        // Commands are tiny; do not let Nagle hold them back.
        if let Err(error) = stream.set_nodelay(true) {
            debug!(
                target: CONNECTION_TARGET,
                endpoint = %endpoint,
                %error,
                "could not disable Nagle's algorithm"
            );
        }
        Ok(Self { stream })
    }

    /// Wraps an already connected stream.
    #[must_use]
    pub const fn from_stream(stream: TcpStream) -> Self {
        Self { stream }
    }

    /// Handle that can close this stream from another thread.
    ///
    /// # Errors
    ///
    /// Returns the I/O error raised while duplicating the socket handle.
    pub fn shutdown_handle(&self) -> io::Result<ShutdownHandle> {
        Ok(ShutdownHandle {
            stream: self.stream.try_clone()?,
        })
    }
}

impl Transport for TcpTransport {
    fn send(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.stream.write_all(bytes)?;
        self.stream.flush()
    }

    fn receive(&mut self, buffer: &mut [u8]) -> io::Result<usize> {
        loop {
            match self.stream.read(buffer) {
                Err(error) if error.kind() == io::ErrorKind::Interrupted => {}
                result => return result,
            }
        }
    }

    fn poll(&mut self, buffer: &mut [u8]) -> io::Result<Option<usize>> {
        self.stream.set_nonblocking(true)?;
        let result = self.stream.read(buffer);
        self.stream.set_nonblocking(false)?;
        match result {
            Ok(read) => Ok(Some(read)),
            Err(error)
                if matches!(
                    error.kind(),
                    io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted
                ) =>
            {
                Ok(None)
            }
            Err(error) => Err(error),
        }
    }

    fn set_receive_timeout(&mut self, timeout: Option<Duration>) -> io::Result<()> {
        // A zero duration is rejected by the socket API; treat it as 1ms.
        let timeout = timeout.map(|value| value.max(Duration::from_millis(1)));
        self.stream.set_read_timeout(timeout)
    }

    fn close(&mut self) -> io::Result<()> {
        match self.stream.shutdown(Shutdown::Both) {
            Err(error) if error.kind() == io::ErrorKind::NotConnected => Ok(()),
            result => result,
        }
    }
}

/// Cloneable handle that shuts a [`TcpTransport`] down from another thread.
///
/// Shutting down unblocks a pending receive, which then reports
/// [`WorldError::ConnectionClosed`].
#[derive(Debug)]
pub struct ShutdownHandle {
    stream: TcpStream,
}

impl ShutdownHandle {
    /// Shuts both directions of the stream down.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error; an already closed stream is not an
    /// error.
    pub fn shutdown(&self) -> io::Result<()> {
        match self.stream.shutdown(Shutdown::Both) {
            Err(error) if error.kind() == io::ErrorKind::NotConnected => Ok(()),
            result => result,
        }
    }

    /// Duplicates the handle.
    ///
    /// # Errors
    ///
    /// Returns the I/O error raised while duplicating the socket handle.
    pub fn try_clone(&self) -> io::Result<Self> {
        Ok(Self {
            stream: self.stream.try_clone()?,
        })
    }
}

fn resolve_tcp_address(host: &str, port: u16) -> io::Result<SocketAddr> {
    let addresses: Vec<SocketAddr> = (host, port).to_socket_addrs()?.collect();
    addresses
        .iter()
        .find(|address| address.is_ipv4())
        .or_else(|| addresses.first())
        .copied()
        .ok_or_else(|| io::Error::new(io::ErrorKind::AddrNotAvailable, "no resolved addresses"))
}
