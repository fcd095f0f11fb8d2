//! Left/right selection for hands and pacing.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::WorldError;

/// Side of the agent a hand or movement refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// The agent's left.
    Left,
    /// The agent's right.
    Right,
}

impl Side {
    /// Single-letter prefix used in sensor and force codes.
    #[must_use]
    pub const fn prefix(self) -> char {
        match self {
            Self::Left => 'L',
            Self::Right => 'R',
        }
    }

    /// Hand position sensor (`LP`/`RP`).
    #[must_use]
    pub fn position_sensor(self) -> String {
        format!("{}P", self.prefix())
    }

    /// Hand force code with the given suffix, e.g. `Hvec` → `LHvec`.
    #[must_use]
    pub fn hand_force(self, suffix: &str) -> String {
        format!("{}H{suffix}", self.prefix())
    }

    /// Unit sign along the world x axis: left is negative.
    #[must_use]
    pub const fn sign(self) -> f64 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }
}

impl FromStr for Side {
    type Err = WorldError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_uppercase().as_str() {
            "L" | "LEFT" => Ok(Self::Left),
            "R" | "RIGHT" => Ok(Self::Right),
            _ => Err(WorldError::InvalidDirection(value.to_owned())),
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(match self {
            Self::Left => "left",
            Self::Right => "right",
        })
    }
}
