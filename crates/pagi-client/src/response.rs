//! Typed reply schemas.
//!
//! Each operation declares the shape of the reply it expects; fields are
//! validated when the message is parsed so a misbehaving world surfaces as
//! [`WorldError::MalformedResponse`] rather than a panic further down.

use serde::Serialize;

use crate::error::WorldError;
use crate::geometry::normalize_degrees;
use crate::message::Message;
use crate::vocabulary::sensor;

/// Conversion from a correlated reply into an operation's result.
pub trait FromMessage: Sized {
    /// Validates and converts `message`.
    ///
    /// # Errors
    ///
    /// Returns `MalformedResponse` when the message does not fit the schema.
    fn from_message(message: &Message) -> Result<Self, WorldError>;
}

impl FromMessage for Message {
    fn from_message(message: &Message) -> Result<Self, WorldError> {
        Ok(message.clone())
    }
}

/// Planar coordinates: fields 1 and 2 as floats.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl FromMessage for Point {
    fn from_message(message: &Message) -> Result<Self, WorldError> {
        Ok(Self {
            x: message.parse_field(1, "x")?,
            y: message.parse_field(2, "y")?,
        })
    }
}

/// Body rotation: field 1 in degrees, normalised into `[0, 360)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rotation {
    /// Rotation in degrees; 0 looks up, 90 left, 180 down, 270 right.
    pub degrees: f64,
}

impl Rotation {
    /// Rotation in radians.
    #[must_use]
    pub fn radians(self) -> f64 {
        self.degrees.to_radians()
    }
}

impl FromMessage for Rotation {
    fn from_message(message: &Message) -> Result<Self, WorldError> {
        let degrees: f64 = message.parse_field(1, "rotation")?;
        if !degrees.is_finite() {
            return Err(WorldError::malformed(
                message.code(),
                format!("rotation must be finite, got {degrees}"),
            ));
        }
        Ok(Self {
            degrees: normalize_degrees(degrees),
        })
    }
}

/// Boolean outcome: field 1 is an integer, `1` meaning success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Outcome(pub bool);

impl FromMessage for Outcome {
    fn from_message(message: &Message) -> Result<Self, WorldError> {
        let flag: i64 = message.parse_field(1, "outcome")?;
        Ok(Self(flag == 1))
    }
}

/// Names listed after the code (active states, reflexes).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct NameList(pub Vec<String>);

impl FromMessage for NameList {
    fn from_message(message: &Message) -> Result<Self, WorldError> {
        Ok(Self(message.fields().skip(1).map(str::to_owned).collect()))
    }
}

/// Vision fields the agent can sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VisionKind {
    /// Coarse 16-column field covering the agent's surroundings.
    Peripheral,
    /// Fine 21-column field in front of the agent.
    Detailed,
}

impl VisionKind {
    /// Cells per row.
    #[must_use]
    pub const fn columns(self) -> usize {
        match self {
            Self::Peripheral => 16,
            Self::Detailed => 21,
        }
    }

    /// Sensor queried for this field; the reply carries the same code.
    #[must_use]
    pub const fn sensor(self) -> &'static str {
        match self {
            Self::Peripheral => sensor::PERIPHERAL_VISION,
            Self::Detailed => sensor::DETAILED_VISION,
        }
    }
}

/// Vision field flattened by the world and rebuilt into rows.
///
/// Row 0 is the bottom of the field and column 0 its left edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisionGrid {
    kind: VisionKind,
    rows: Vec<Vec<String>>,
}

impl VisionGrid {
    /// Rebuilds the grid from `message`, skipping the header field.
    ///
    /// # Errors
    ///
    /// Returns `MalformedResponse` when the cell count is not a whole number
    /// of rows.
    pub fn parse(message: &Message, kind: VisionKind) -> Result<Self, WorldError> {
        let cells: Vec<&str> = message.fields().skip(1).collect();
        let columns = kind.columns();
        if cells.len() % columns != 0 {
            return Err(WorldError::malformed(
                message.code(),
                format!(
                    "{} vision cells do not fill rows of {columns}",
                    cells.len()
                ),
            ));
        }
        let rows = cells
            .chunks(columns)
            .map(|row| row.iter().map(|cell| (*cell).to_owned()).collect())
            .collect();
        Ok(Self { kind, rows })
    }

    /// Field that was sampled.
    #[must_use]
    pub const fn kind(&self) -> VisionKind {
        self.kind
    }

    /// Rows from bottom to top.
    #[must_use]
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of rows.
    #[must_use]
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Cells per row.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.kind.columns()
    }

    /// Cell at `row`, `column`, if inside the grid.
    #[must_use]
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .map(String::as_str)
    }
}
