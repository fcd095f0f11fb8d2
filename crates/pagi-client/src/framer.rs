//! Newline framing over an arbitrarily chunked byte stream.
//!
//! Socket reads rarely align with message boundaries: one read may carry
//! half a message, several messages, or the tail of one and the head of the
//! next. The framer keeps whatever has not been consumed yet, so extraction
//! is a repeatable pull operation independent of read calls.

use std::borrow::Cow;

use crate::error::WorldError;

const TERMINATOR: u8 = b'\n';

/// Accumulates raw bytes and yields complete newline-terminated messages.
#[derive(Debug, Clone)]
pub struct MessageFramer {
    buffer: Vec<u8>,
    limit: usize,
    // Set after an overflow until the rejected line's terminator arrives.
    discarding: bool,
}

impl Default for MessageFramer {
    fn default() -> Self {
        Self::with_limit(usize::MAX)
    }
}

impl MessageFramer {
    /// Creates a framer that rejects unterminated tails longer than `limit`.
    #[must_use]
    pub const fn with_limit(limit: usize) -> Self {
        Self {
            buffer: Vec::new(),
            limit,
            discarding: false,
        }
    }

    /// Appends a chunk of received bytes.
    ///
    /// # Errors
    ///
    /// Returns `MessageTooLarge` when the unterminated tail exceeds the
    /// limit. The oversized tail is dropped, and so is the rest of that
    /// line when it arrives in later chunks; complete messages already
    /// buffered remain extractable.
    pub fn feed(&mut self, chunk: &[u8]) -> Result<(), WorldError> {
        let chunk = if self.discarding {
            match chunk.iter().position(|byte| *byte == TERMINATOR) {
                Some(index) => {
                    self.discarding = false;
                    chunk.get(index + 1..).unwrap_or_default()
                }
                None => return Ok(()),
            }
        } else {
            chunk
        };
        self.buffer.extend_from_slice(chunk);
        let complete = self
            .buffer
            .iter()
            .rposition(|byte| *byte == TERMINATOR)
            .map_or(0, |index| index + 1);
        let tail = self.buffer.len() - complete;
        if tail > self.limit {
            self.buffer.truncate(complete);
            self.discarding = true;
            return Err(WorldError::MessageTooLarge {
                size: tail,
                limit: self.limit,
            });
        }
        Ok(())
    }

    /// Removes and returns the first complete message without its terminator.
    ///
    /// Returns `None` when no terminator has arrived yet.
    pub fn extract_one(&mut self) -> Option<String> {
        let index = self.terminator_index()?;
        let mut line: Vec<u8> = self.buffer.drain(..=index).collect();
        line.pop();
        Some(String::from_utf8_lossy(&line).into_owned())
    }

    /// Returns the first complete message without consuming it.
    #[must_use]
    pub fn peek_one(&self) -> Option<Cow<'_, str>> {
        let index = self.terminator_index()?;
        self.buffer.get(..index).map(String::from_utf8_lossy)
    }

    /// Whether at least one complete message is buffered.
    #[must_use]
    pub fn has_message(&self) -> bool {
        self.terminator_index().is_some()
    }

    /// Number of buffered bytes, complete or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Whether the buffer is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Drops everything buffered, including any partially rejected line.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.discarding = false;
    }

    fn terminator_index(&self) -> Option<usize> {
        self.buffer.iter().position(|byte| *byte == TERMINATOR)
    }
}
