//! Bounded audit trail of dispatched commands.

use std::collections::VecDeque;

use serde::Serialize;

use crate::command::Command;
use crate::vocabulary::CommandName;

/// One dispatched command: its name and primary argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoggedCommand {
    /// Command name as sent on the wire.
    #[serde(serialize_with = "serialize_name")]
    pub name: CommandName,
    /// First argument, empty when the command had none.
    pub primary: String,
}

/// Send-ordered record of dispatched commands.
///
/// The log holds at most `capacity` entries and evicts from the head when
/// full. A capacity of zero disables recording.
#[derive(Debug, Clone)]
pub struct CommandLog {
    entries: VecDeque<LoggedCommand>,
    capacity: usize,
}

impl CommandLog {
    /// Creates an empty log retaining up to `capacity` entries.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.min(64)),
            capacity,
        }
    }

    pub(crate) fn record(&mut self, command: &Command) {
        if self.capacity == 0 {
            return;
        }
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(LoggedCommand {
            name: command.name(),
            primary: command.primary().to_owned(),
        });
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    /// Entries from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &LoggedCommand> {
        self.entries.iter()
    }

    /// Most recently dispatched command.
    #[must_use]
    pub fn last(&self) -> Option<&LoggedCommand> {
        self.entries.back()
    }

    /// Number of retained entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of retained entries.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}

fn serialize_name<S>(name: &CommandName, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(name.as_ref())
}
