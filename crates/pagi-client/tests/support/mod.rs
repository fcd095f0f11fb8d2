//! Fake world server for socket-level tests.
//!
//! Accepts one connection, records each request line, and answers the n-th
//! request with the n-th batch of scripted reply lines. Requests beyond the
//! script are recorded without a reply until the client hangs up.

use std::io::{self, BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow};

const ACCEPT_DEADLINE: Duration = Duration::from_secs(2);

pub struct FakeWorld {
    port: u16,
    requests: Arc<Mutex<Vec<String>>>,
    handle: Option<thread::JoinHandle<Result<()>>>,
}

impl FakeWorld {
    pub fn spawn(replies: Vec<Vec<String>>) -> Result<Self> {
        let listener = TcpListener::bind(("127.0.0.1", 0)).context("bind fake world")?;
        listener
            .set_nonblocking(true)
            .context("fake world nonblocking")?;
        let port = listener.local_addr().context("local addr")?.port();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&requests);
        let handle = thread::spawn(move || Self::serve(&listener, &replies, &recorded));
        Ok(Self {
            port,
            requests,
            handle: Some(handle),
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Waits for the client to hang up and returns the recorded requests.
    pub fn take_requests(&mut self) -> Result<Vec<String>> {
        if let Some(handle) = self.handle.take() {
            handle
                .join()
                .map_err(|_| anyhow!("fake world thread panicked"))?
                .context("fake world failed")?;
        }
        let requests = self
            .requests
            .lock()
            .map_err(|error| anyhow!("lock requests: {error}"))?;
        Ok(requests.clone())
    }

    fn serve(
        listener: &TcpListener,
        replies: &[Vec<String>],
        requests: &Arc<Mutex<Vec<String>>>,
    ) -> Result<()> {
        let Some(stream) = Self::accept(listener)? else {
            return Ok(());
        };
        stream
            .set_nonblocking(false)
            .context("fake world blocking stream")?;
        let mut writer = stream.try_clone().context("clone stream")?;
        let reader = BufReader::new(stream);
        let mut batches = replies.iter();
        for line in reader.lines() {
            let line = match line {
                Ok(line) => line,
                // The client may reset the socket when it shuts down.
                Err(error) if error.kind() == io::ErrorKind::ConnectionReset => break,
                Err(error) => return Err(error).context("read request"),
            };
            requests
                .lock()
                .map_err(|error| anyhow!("lock requests: {error}"))?
                .push(line);
            if let Some(batch) = batches.next() {
                for reply in batch {
                    writer.write_all(reply.as_bytes())?;
                    writer.write_all(b"\n")?;
                }
                writer.flush()?;
            }
        }
        Ok(())
    }

    fn accept(listener: &TcpListener) -> Result<Option<TcpStream>> {
        let deadline = Instant::now() + ACCEPT_DEADLINE;
        loop {
            match listener.accept() {
                Ok((stream, _)) => return Ok(Some(stream)),
                Err(ref error)
                    if error.kind() == io::ErrorKind::WouldBlock && Instant::now() < deadline =>
                {
                    thread::sleep(Duration::from_millis(10));
                }
                Err(ref error) if error.kind() == io::ErrorKind::WouldBlock => return Ok(None),
                Err(error) => return Err(error).context("accept connection"),
            }
        }
    }
}

impl Drop for FakeWorld {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Reply batch from string literals.
pub fn replies(lines: &[&str]) -> Vec<String> {
    lines.iter().map(|line| (*line).to_owned()).collect()
}
