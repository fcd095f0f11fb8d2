//! Angle and force-frame helpers.
//!
//! Rotation follows the world's convention: 0° looks up and angles grow
//! counter-clockwise, so 90° looks left and 270° looks right.

use serde::Serialize;

/// Unit of an angle supplied to or returned from the facade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AngleUnit {
    /// Degrees.
    #[default]
    Degrees,
    /// Radians.
    Radians,
}

impl AngleUnit {
    /// Converts `value` in this unit to degrees.
    #[must_use]
    pub fn to_degrees(self, value: f64) -> f64 {
        match self {
            Self::Degrees => value,
            Self::Radians => value.to_degrees(),
        }
    }

    /// Converts `degrees` into this unit.
    #[must_use]
    pub fn from_degrees(self, degrees: f64) -> f64 {
        match self {
            Self::Degrees => degrees,
            Self::Radians => degrees.to_radians(),
        }
    }
}

/// How a rotation request is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RotationMode {
    /// Rotate by the given amount from the current heading.
    #[default]
    Relative,
    /// Rotate to the given heading measured from 0° (looking up).
    Absolute,
}

/// Reference frame of a force vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ForceFrame {
    /// Axes follow the agent: +y towards its top, +x towards its right.
    #[default]
    Agent,
    /// Axes follow the world: +y up, +x right.
    World,
}

/// Wraps `degrees` into `[0, 360)`.
#[must_use]
pub fn normalize_degrees(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs.
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Expresses a world-frame vector in the frame of an agent rotated by
/// `rotation_degrees`.
#[must_use]
pub fn world_to_agent(x: f64, y: f64, rotation_degrees: f64) -> (f64, f64) {
    let (sin, cos) = rotation_degrees.to_radians().sin_cos();
    // Agent right = (cos, sin), agent up = (-sin, cos) in world coordinates.
    let right = x.mul_add(cos, y * sin);
    let up = (-x).mul_add(sin, y * cos);
    (right, up)
}
