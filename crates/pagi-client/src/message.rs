//! Inbound message access.

use std::fmt;
use std::str::FromStr;

use crate::command::FIELD_SEPARATOR;
use crate::error::WorldError;

/// One framed line received from the world.
///
/// The first comma-separated field is the response code used for
/// correlation; the remaining fields are operation specific.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    line: String,
}

impl Message {
    /// Wraps a framed line (without its terminator).
    #[must_use]
    pub fn new(line: impl Into<String>) -> Self {
        Self { line: line.into() }
    }

    /// Leading response code.
    #[must_use]
    pub fn code(&self) -> &str {
        self.line
            .split_once(FIELD_SEPARATOR)
            .map_or(self.line.as_str(), |(code, _)| code)
    }

    /// Whether the message answers `code`. An empty code matches anything.
    ///
    /// The comparison is exact: `BP` matches `BP,1,2` and a bare `BP` line,
    /// but not `BPX,1`.
    #[must_use]
    pub fn matches(&self, code: &str) -> bool {
        line_matches(&self.line, code)
    }

    /// All fields, code included.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.line.split(FIELD_SEPARATOR)
    }

    /// Number of fields, code included.
    #[must_use]
    pub fn field_count(&self) -> usize {
        self.fields().count()
    }

    /// Field at `index` (the code is field 0).
    ///
    /// # Errors
    ///
    /// Returns `MalformedResponse` when the message has fewer fields.
    pub fn field(&self, index: usize) -> Result<&str, WorldError> {
        self.fields().nth(index).ok_or_else(|| {
            WorldError::malformed(
                self.code(),
                format!("expected field {index}, message has {}", self.field_count()),
            )
        })
    }

    /// Parses the field at `index`, describing it as `what` on failure.
    ///
    /// # Errors
    ///
    /// Returns `MalformedResponse` when the field is missing or does not
    /// parse as `T`.
    pub fn parse_field<T>(&self, index: usize, what: &str) -> Result<T, WorldError>
    where
        T: FromStr,
    {
        let raw = self.field(index)?;
        raw.trim().parse().map_err(|_| {
            WorldError::malformed(
                self.code(),
                format!("field {index} ({what}) is not valid: '{raw}'"),
            )
        })
    }

    /// Full line text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.line
    }

    /// Consumes the message, returning the line text.
    #[must_use]
    pub fn into_string(self) -> String {
        self.line
    }
}

impl fmt::Display for Message {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.line)
    }
}

pub(crate) fn line_matches(line: &str, code: &str) -> bool {
    if code.is_empty() {
        return true;
    }
    match line.strip_prefix(code) {
        Some(rest) => rest.is_empty() || rest.starts_with(FIELD_SEPARATOR),
        None => false,
    }
}
