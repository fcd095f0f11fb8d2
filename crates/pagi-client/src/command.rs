//! Outgoing command modelling and validation.

use std::fmt;

use crate::error::WorldError;
use crate::vocabulary::{CommandName, HAND_RELEASE_FORCES, is_force, is_sensor};

pub(crate) const FIELD_SEPARATOR: char = ',';
pub(crate) const TERMINATOR: char = '\n';

/// A validated instruction ready to be written to the world.
///
/// Construction always runs vocabulary validation, so a `Command` value can
/// be sent without further checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    name: CommandName,
    arguments: Vec<String>,
}

impl Command {
    /// Builds a command from a name and its arguments.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSensor`/`InvalidForce` when the primary argument of a
    /// `sensorRequest`/`addForce` is outside its vocabulary, and
    /// `InvalidCommand` when an argument would break message framing.
    pub fn new<I, S>(name: CommandName, arguments: I) -> Result<Self, WorldError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let command = Self {
            name,
            arguments: arguments.into_iter().map(Into::into).collect(),
        };
        command.validate()?;
        Ok(command)
    }

    /// Builds a `sensorRequest` for `sensor`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSensor` for codes outside the sensor vocabulary.
    pub fn sensor(sensor: &str) -> Result<Self, WorldError> {
        Self::new(CommandName::SensorRequest, [sensor])
    }

    /// Builds an `addForce` for `force` with fixed-point numeric values.
    ///
    /// # Errors
    ///
    /// Returns `InvalidForce` for codes outside the force vocabulary.
    pub fn force(force: &str, values: &[f64]) -> Result<Self, WorldError> {
        let arguments = std::iter::once(force.to_owned()).chain(values.iter().map(format_value));
        Self::new(CommandName::AddForce, arguments)
    }

    /// Builds the `addForce` that opens a hand, e.g. `addForce,LHR,1`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidForce` unless `force` is a hand release code.
    pub(crate) fn hand_release(force: &str, value: &str) -> Result<Self, WorldError> {
        let command = Self {
            name: CommandName::AddForce,
            arguments: vec![force.to_owned(), value.to_owned()],
        };
        if HAND_RELEASE_FORCES.contains(&force) {
            Ok(command)
        } else {
            Err(WorldError::InvalidForce {
                force: force.to_owned(),
                message: command.to_string(),
            })
        }
    }

    /// Parses and validates a raw outgoing message such as `print,hello`.
    ///
    /// A single trailing terminator is tolerated.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCommand` when the leading field is not a known command
    /// name, and the sensor/force errors described on [`Command::new`].
    pub fn parse(message: &str) -> Result<Self, WorldError> {
        let body = message.strip_suffix(TERMINATOR).unwrap_or(message);
        let (name_text, rest) = match body.split_once(FIELD_SEPARATOR) {
            Some((name, rest)) => (name, Some(rest)),
            None => (body, None),
        };
        let name: CommandName = name_text
            .parse()
            .map_err(|_| WorldError::InvalidCommand {
                message: message.to_owned(),
            })?;
        let arguments: Vec<&str> = rest
            .map(|text| text.split(FIELD_SEPARATOR).collect())
            .unwrap_or_default();
        Self::new(name, arguments)
    }

    /// Command name.
    #[must_use]
    pub const fn name(&self) -> CommandName {
        self.name
    }

    /// Arguments following the command name.
    #[must_use]
    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }

    /// First argument, or an empty string when there is none.
    #[must_use]
    pub fn primary(&self) -> &str {
        self.arguments.first().map_or("", String::as_str)
    }

    /// Wire encoding including the line terminator.
    #[must_use]
    pub fn encode(&self) -> String {
        let mut line = self.to_string();
        line.push(TERMINATOR);
        line
    }

    fn validate(&self) -> Result<(), WorldError> {
        if self
            .arguments
            .iter()
            .any(|argument| argument.contains(['\n', '\r']))
        {
            return Err(WorldError::InvalidCommand {
                message: self.to_string(),
            });
        }

        let primary = self.primary();
        match self.name {
            CommandName::SensorRequest if !is_sensor(primary) => Err(WorldError::InvalidSensor {
                sensor: primary.to_owned(),
                message: self.to_string(),
            }),
            CommandName::AddForce if !is_force(primary) => Err(WorldError::InvalidForce {
                force: primary.to_owned(),
                message: self.to_string(),
            }),
            _ => Ok(()),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.name.as_ref())?;
        for argument in &self.arguments {
            write!(formatter, "{FIELD_SEPARATOR}{argument}")?;
        }
        Ok(())
    }
}

fn format_value(value: &f64) -> String {
    format!("{value:.6}")
}
