use std::fmt;

use serde::{Deserialize, Serialize};

const FALLBACK_HOST: &str = "localhost";

/// Network location of the PAGI world.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct WorldEndpoint {
    host: Option<String>,
    port: u16,
}

impl WorldEndpoint {
    /// Builds an endpoint. A `None` or blank host targets the local machine.
    #[must_use]
    pub fn new(host: Option<String>, port: u16) -> Self {
        let host = host.filter(|value| !value.trim().is_empty());
        Self { host, port }
    }

    /// Builds an endpoint for an explicit host.
    #[must_use]
    pub fn tcp(host: impl Into<String>, port: u16) -> Self {
        Self::new(Some(host.into()), port)
    }

    /// Host name to resolve: the configured host, or this machine's own name.
    #[must_use]
    pub fn host(&self) -> String {
        self.host.clone().unwrap_or_else(local_host_name)
    }

    /// Whether the endpoint falls back to the local machine's name.
    #[must_use]
    pub const fn is_local(&self) -> bool {
        self.host.is_none()
    }

    /// TCP port of the world.
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }
}

impl fmt::Display for WorldEndpoint {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "tcp://{}:{}", self.host(), self.port)
    }
}

/// Returns the local machine's host name, or `localhost` when unavailable.
#[cfg(unix)]
#[must_use]
pub fn local_host_name() -> String {
    let mut buffer = [0_u8; 256];
    // SAFETY: the pointer and length describe a writable buffer we own.
    let status = unsafe { libc::gethostname(buffer.as_mut_ptr().cast(), buffer.len()) };
    if status != 0 {
        return FALLBACK_HOST.to_owned();
    }
    let end = buffer
        .iter()
        .position(|byte| *byte == 0)
        .unwrap_or(buffer.len());
    match buffer.get(..end).map(std::str::from_utf8) {
        Some(Ok(name)) if !name.is_empty() => name.to_owned(),
        _ => FALLBACK_HOST.to_owned(),
    }
}

/// Returns the local machine's host name, or `localhost` when unavailable.
#[cfg(not(unix))]
#[must_use]
pub fn local_host_name() -> String {
    std::env::var("COMPUTERNAME")
        .ok()
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| FALLBACK_HOST.to_owned())
}
