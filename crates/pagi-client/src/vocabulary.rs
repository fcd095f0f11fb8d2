//! The world's closed command, sensor and force vocabularies.
//!
//! Only `sensorRequest` and `addForce` are checked against a secondary
//! vocabulary; every other command is forwarded with its arguments as-is.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use strum::{AsRefStr, Display, EnumString};

/// Commands the world accepts as the first field of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display, AsRefStr)]
pub enum CommandName {
    /// Queries a sensor.
    #[strum(serialize = "sensorRequest")]
    SensorRequest,
    /// Applies a force to the body or a hand.
    #[strum(serialize = "addForce")]
    AddForce,
    /// Loads a task file.
    #[strum(serialize = "loadTask")]
    LoadTask,
    /// Prints text in the world console.
    #[strum(serialize = "print")]
    Print,
    /// Locates a named object.
    #[strum(serialize = "findObj")]
    FindObj,
    /// Sets or clears (length `0`) an internal state.
    #[strum(serialize = "setState")]
    SetState,
    /// Lists active states.
    #[strum(serialize = "getActiveStates")]
    GetActiveStates,
    /// Registers a reflex.
    #[strum(serialize = "setReflex")]
    SetReflex,
    /// Removes a reflex.
    #[strum(serialize = "removeReflex")]
    RemoveReflex,
    /// Lists active reflexes.
    #[strum(serialize = "getActiveReflexes")]
    GetActiveReflexes,
}

/// Sensor codes used by the facade.
pub mod sensor {
    /// Body position.
    pub const BODY_POSITION: &str = "BP";
    /// Left hand position.
    pub const LEFT_HAND_POSITION: &str = "LP";
    /// Right hand position.
    pub const RIGHT_HAND_POSITION: &str = "RP";
    /// Body rotation; the world answers with a `BR` message.
    pub const ROTATION: &str = "A";
    /// Detailed vision field.
    pub const DETAILED_VISION: &str = "MDN";
    /// Peripheral vision field.
    pub const PERIPHERAL_VISION: &str = "MPN";
    /// Speech/state sensor.
    pub const SPEECH: &str = "S";

    pub(crate) const FIXED: &[&str] = &[
        SPEECH,
        BODY_POSITION,
        LEFT_HAND_POSITION,
        RIGHT_HAND_POSITION,
        ROTATION,
        DETAILED_VISION,
        PERIPHERAL_VISION,
    ];
}

/// Force codes used by the facade.
pub mod force {
    /// Body movement vector (`x,y`).
    pub const BODY_VECTOR: &str = "BMvec";
    /// Body rotation delta in degrees.
    pub const BODY_ROTATION: &str = "BR";
    /// Jump.
    pub const JUMP: &str = "J";
}

/// Force codes accepted in raw `addForce` messages.
pub const FORCES: &[&str] = &[
    "RHvec", "LHvec", "BMvec", "RHH", "LHH", "RHV", "LHV", "BMH", "BMV", "J", "BR", "RHG", "LHG",
];

/// Hand release codes. Only the release gesture sends these; raw messages
/// naming them are rejected like any other unknown force.
pub const HAND_RELEASE_FORCES: &[&str] = &["RHR", "LHR"];

/// Number of 0.15 increments in the vision field range `0.00..=30.00`.
pub const VISION_FIELD_STEPS: u32 = 200;

const VISION_FIELD_INCREMENT_HUNDREDTHS: u32 = 15;
const HAND_SENSOR_COUNT: u32 = 5;

static SENSORS: Lazy<HashSet<String>> = Lazy::new(|| {
    let mut sensors: HashSet<String> = sensor::FIXED.iter().map(|code| (*code).to_owned()).collect();
    for index in 0..HAND_SENSOR_COUNT {
        sensors.insert(format!("L{index}"));
        sensors.insert(format!("R{index}"));
    }
    sensors.extend((0..=VISION_FIELD_STEPS).filter_map(vision_field_code));
    sensors
});

/// Formats the vision field sensor for `step` increments of 0.15, e.g.
/// `V0.150000` for step 1. Returns `None` past [`VISION_FIELD_STEPS`].
#[must_use]
pub fn vision_field_code(step: u32) -> Option<String> {
    if step > VISION_FIELD_STEPS {
        return None;
    }
    let hundredths = step * VISION_FIELD_INCREMENT_HUNDREDTHS;
    Some(format!(
        "V{}.{:02}0000",
        hundredths / 100,
        hundredths % 100
    ))
}

/// Whether `code` names a sensor the world accepts.
#[must_use]
pub fn is_sensor(code: &str) -> bool {
    SENSORS.contains(code)
}

/// Whether `code` names a force the world accepts.
#[must_use]
pub fn is_force(code: &str) -> bool {
    FORCES.contains(&code)
}
