//! Agent body and hand gestures.

use std::thread;

use crate::command::Command;
use crate::error::WorldError;
use crate::geometry::{AngleUnit, ForceFrame, RotationMode, normalize_degrees, world_to_agent};
use crate::message::Message;
use crate::response::{Outcome, Point, Rotation, VisionGrid, VisionKind};
use crate::side::Side;
use crate::transport::Transport;
use crate::vocabulary::{CommandName, force, sensor};
use crate::world::World;

const JUMP_FORCE: &str = "1000";
const PACE_FORCE: f64 = 1000.0;
const GESTURE_VALUE: &str = "1";

/// The agent's body, borrowed from a [`World`].
#[derive(Debug)]
pub struct Agent<'w, T> {
    world: &'w mut World<T>,
}

impl<'w, T: Transport> Agent<'w, T> {
    pub(crate) const fn new(world: &'w mut World<T>) -> Self {
        Self { world }
    }

    /// Tries to jump; only succeeds when the agent stands on something.
    ///
    /// # Errors
    ///
    /// Returns send, receive or schema errors.
    pub fn jump(&mut self) -> Result<bool, WorldError> {
        let command = Command::new(CommandName::AddForce, [force::JUMP, JUMP_FORCE])?;
        self.world.request::<Outcome>(&command).map(|outcome| outcome.0)
    }

    /// Current rotation in `[0, 360)` degrees or the radian equivalent.
    ///
    /// # Errors
    ///
    /// Returns send, receive or schema errors.
    pub fn get_rotation(&mut self, unit: AngleUnit) -> Result<f64, WorldError> {
        current_rotation(self.world).map(|rotation| unit.from_degrees(rotation.degrees))
    }

    /// Rotates the agent.
    ///
    /// Relative mode turns by `value` from the current heading. Absolute
    /// mode turns to `value` measured from 0° (looking up), which costs an
    /// extra rotation query.
    ///
    /// # Errors
    ///
    /// Returns send, receive or schema errors.
    pub fn rotate(
        &mut self,
        value: f64,
        unit: AngleUnit,
        mode: RotationMode,
    ) -> Result<Message, WorldError> {
        let degrees = unit.to_degrees(value);
        let delta = match mode {
            RotationMode::Relative => degrees,
            RotationMode::Absolute => {
                normalize_degrees(degrees) - current_rotation(self.world)?.degrees
            }
        };
        let command = Command::force(force::BODY_ROTATION, &[delta])?;
        self.world.request(&command)
    }

    /// Turns the agent back to 0° (looking up).
    ///
    /// # Errors
    ///
    /// See [`Agent::rotate`].
    pub fn reset_rotation(&mut self) -> Result<Message, WorldError> {
        self.rotate(0.0, AngleUnit::Degrees, RotationMode::Absolute)
    }

    /// Returns the agent to its starting posture.
    ///
    /// # Errors
    ///
    /// See [`Agent::rotate`].
    pub fn reset_agent(&mut self) -> Result<Message, WorldError> {
        self.reset_rotation()
    }

    /// Pushes the body with force `(x, y)` in `frame`.
    ///
    /// # Errors
    ///
    /// Returns send, receive or schema errors.
    pub fn send_force(&mut self, x: f64, y: f64, frame: ForceFrame) -> Result<Message, WorldError> {
        send_vector(self.world, force::BODY_VECTOR, x, y, frame)
    }

    /// Moves `paces` body widths towards `side`, pausing after each pace.
    ///
    /// # Errors
    ///
    /// Stops at the first failing pace and returns its error.
    pub fn move_paces(&mut self, paces: u32, side: Side) -> Result<(), WorldError> {
        let interval = self.world.connection().settings().pace_interval;
        for _ in 0..paces {
            self.send_force(side.sign() * PACE_FORCE, 0.0, ForceFrame::World)?;
            if !interval.is_zero() {
                thread::sleep(interval);
            }
        }
        Ok(())
    }

    /// Body coordinates in the world.
    ///
    /// # Errors
    ///
    /// Returns send, receive or schema errors.
    pub fn get_position(&mut self) -> Result<Point, WorldError> {
        self.world.request(&Command::sensor(sensor::BODY_POSITION)?)
    }

    /// Peripheral vision: rows of 16 cells, bottom row first.
    ///
    /// # Errors
    ///
    /// Returns send, receive or schema errors.
    pub fn get_peripheral_vision(&mut self) -> Result<VisionGrid, WorldError> {
        self.vision(VisionKind::Peripheral)
    }

    /// Detailed vision: rows of 21 cells, bottom row first.
    ///
    /// # Errors
    ///
    /// Returns send, receive or schema errors.
    pub fn get_detailed_vision(&mut self) -> Result<VisionGrid, WorldError> {
        self.vision(VisionKind::Detailed)
    }

    /// Either vision field.
    ///
    /// # Errors
    ///
    /// Returns send, receive or schema errors.
    pub fn vision(&mut self, kind: VisionKind) -> Result<VisionGrid, WorldError> {
        let reply: Message = self.world.request(&Command::sensor(kind.sensor())?)?;
        VisionGrid::parse(&reply, kind)
    }

    /// Moves both hands back to their resting positions.
    ///
    /// # Errors
    ///
    /// Always returns `Unsupported`.
    pub fn center_hands(&mut self) -> Result<(), WorldError> {
        Err(WorldError::unsupported("center_hands"))
    }

    /// The left hand.
    pub fn left_hand(&mut self) -> Hand<'_, T> {
        self.hand(Side::Left)
    }

    /// The right hand.
    pub fn right_hand(&mut self) -> Hand<'_, T> {
        self.hand(Side::Right)
    }

    /// The hand on `side`.
    pub fn hand(&mut self, side: Side) -> Hand<'_, T> {
        Hand::new(self.world, side)
    }
}

/// One of the agent's hands, borrowed from a [`World`].
#[derive(Debug)]
pub struct Hand<'w, T> {
    world: &'w mut World<T>,
    side: Side,
}

impl<'w, T: Transport> Hand<'w, T> {
    pub(crate) const fn new(world: &'w mut World<T>, side: Side) -> Self {
        Self { world, side }
    }

    /// Which hand this is.
    #[must_use]
    pub const fn side(&self) -> Side {
        self.side
    }

    /// Hand coordinates in the world.
    ///
    /// # Errors
    ///
    /// Returns send, receive or schema errors.
    pub fn get_position(&mut self) -> Result<Point, WorldError> {
        let command = Command::sensor(&self.side.position_sensor())?;
        self.world.request(&command)
    }

    /// Closes the hand on whatever it touches.
    ///
    /// # Errors
    ///
    /// Returns send or receive errors.
    pub fn grab(&mut self) -> Result<Message, WorldError> {
        let code = self.side.hand_force("G");
        let command = Command::new(CommandName::AddForce, [code.as_str(), GESTURE_VALUE])?;
        self.world.request(&command)
    }

    /// Opens the hand.
    ///
    /// # Errors
    ///
    /// Returns send or receive errors.
    pub fn release(&mut self) -> Result<Message, WorldError> {
        let command = Command::hand_release(&self.side.hand_force("R"), GESTURE_VALUE)?;
        self.world.request(&command)
    }

    /// Pushes the hand with force `(x, y)` in `frame`.
    ///
    /// # Errors
    ///
    /// Returns send, receive or schema errors.
    pub fn send_force(&mut self, x: f64, y: f64, frame: ForceFrame) -> Result<Message, WorldError> {
        let code = self.side.hand_force("vec");
        send_vector(self.world, &code, x, y, frame)
    }
}

fn current_rotation<T: Transport>(world: &mut World<T>) -> Result<Rotation, WorldError> {
    world.request(&Command::sensor(sensor::ROTATION)?)
}

fn send_vector<T: Transport>(
    world: &mut World<T>,
    code: &str,
    x: f64,
    y: f64,
    frame: ForceFrame,
) -> Result<Message, WorldError> {
    let (x, y) = match frame {
        ForceFrame::Agent => (x, y),
        ForceFrame::World => world_to_agent(x, y, current_rotation(world)?.degrees),
    };
    world.request(&Command::force(code, &[x, y])?)
}
