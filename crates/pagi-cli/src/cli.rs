//! Command-line interface definitions for the `pagi` binary.

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand, ValueEnum};
use pagi_client::{AngleUnit, ForceFrame, RotationMode, Side, VisionKind};

/// Output format selection for command results.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// Selects `human` for terminal output and `json` for redirected output.
    #[default]
    Auto,
    /// Always render human-readable output.
    Human,
    /// Always emit one JSON object per result.
    Json,
}

/// Output format after resolving `auto` based on TTY detection.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ResolvedOutputFormat {
    /// Plain text for operators.
    Human,
    /// JSON lines for scripts.
    Json,
}

impl OutputFormat {
    /// Resolves the output format based on whether stdout is a terminal.
    #[must_use]
    pub const fn resolve(self, stdout_is_terminal: bool) -> ResolvedOutputFormat {
        match self {
            Self::Auto if stdout_is_terminal => ResolvedOutputFormat::Human,
            Self::Auto | Self::Json => ResolvedOutputFormat::Json,
            Self::Human => ResolvedOutputFormat::Human,
        }
    }
}

/// Command-line interface for driving a PAGI world.
///
/// Configuration flags such as `--world-port` must precede these arguments.
#[derive(Parser, Debug)]
#[command(name = "pagi", version, disable_help_subcommand = true)]
pub(crate) struct Cli {
    /// Controls how results are rendered.
    #[arg(long, value_enum, default_value_t = OutputFormat::Auto)]
    pub(crate) output: OutputFormat,
    /// Operation to perform against the world.
    #[command(subcommand)]
    pub(crate) command: CliCommand,
}

/// Operations exposed by the CLI.
#[derive(Subcommand, Debug, Clone)]
pub(crate) enum CliCommand {
    /// Sends a raw message such as `sensorRequest,BP` and waits for its reply.
    Send {
        /// Message to validate and send.
        #[arg(allow_hyphen_values = true)]
        message: String,
        /// Response code to wait for instead of the one implied by the command.
        #[arg(long)]
        code: Option<String>,
        /// Returns right after sending.
        #[arg(long, conflicts_with = "code")]
        no_wait: bool,
    },
    /// Reads the next message carrying a response code.
    Receive {
        /// Response code to match; empty matches any message.
        #[arg(long, default_value = "")]
        code: String,
        /// Returns immediately when no matching message is available.
        #[arg(long)]
        non_blocking: bool,
    },
    /// Prints text in the world's console.
    Print {
        /// Text to print.
        #[arg(allow_hyphen_values = true)]
        text: String,
    },
    /// Loads a task file into the world.
    LoadTask {
        /// Path to the task file, as seen by the world.
        path: Utf8PathBuf,
    },
    /// Lists active states.
    States,
    /// Lists active reflexes.
    Reflexes,
    /// Removes a state.
    RemoveState {
        /// State name.
        name: String,
    },
    /// Removes a reflex.
    RemoveReflex {
        /// Reflex name.
        name: String,
    },
    /// Prints the agent's body position.
    Position,
    /// Prints a hand position.
    HandPosition {
        /// `L`/`left` or `R`/`right`.
        side: Side,
    },
    /// Prints the agent's rotation.
    Rotation {
        /// Reports radians instead of degrees.
        #[arg(long)]
        radians: bool,
    },
    /// Rotates the agent.
    Rotate {
        /// Angle to rotate by, or to, with `--absolute`.
        #[arg(allow_negative_numbers = true)]
        angle: f64,
        /// Interprets the angle in radians.
        #[arg(long)]
        radians: bool,
        /// Rotates to the angle measured from 0 (looking up).
        #[arg(long)]
        absolute: bool,
    },
    /// Makes the agent jump.
    Jump,
    /// Pushes the agent's body.
    Force {
        /// Horizontal component.
        #[arg(allow_negative_numbers = true)]
        x: f64,
        /// Vertical component.
        #[arg(allow_negative_numbers = true)]
        y: f64,
        /// Treats the vector as world axes instead of the agent's.
        #[arg(long)]
        world_frame: bool,
    },
    /// Pushes one hand.
    HandForce {
        /// `L`/`left` or `R`/`right`.
        side: Side,
        /// Horizontal component.
        #[arg(allow_negative_numbers = true)]
        x: f64,
        /// Vertical component.
        #[arg(allow_negative_numbers = true)]
        y: f64,
        /// Treats the vector as world axes instead of the agent's.
        #[arg(long)]
        world_frame: bool,
    },
    /// Closes a hand.
    Grab {
        /// `L`/`left` or `R`/`right`.
        side: Side,
    },
    /// Opens a hand.
    Release {
        /// `L`/`left` or `R`/`right`.
        side: Side,
    },
    /// Walks the agent a number of body widths.
    Move {
        /// Number of paces.
        paces: u32,
        /// `L`/`left` or `R`/`right`.
        side: Side,
    },
    /// Prints a vision field.
    Vision {
        /// Which field to sample.
        #[arg(value_enum, default_value_t = VisionField::Peripheral)]
        field: VisionField,
    },
}

/// Vision fields selectable from the command line.
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub(crate) enum VisionField {
    /// 16-column field around the agent.
    Peripheral,
    /// 21-column field in front of the agent.
    Detailed,
}

impl From<VisionField> for VisionKind {
    fn from(field: VisionField) -> Self {
        match field {
            VisionField::Peripheral => Self::Peripheral,
            VisionField::Detailed => Self::Detailed,
        }
    }
}

pub(crate) const fn angle_unit(radians: bool) -> AngleUnit {
    if radians {
        AngleUnit::Radians
    } else {
        AngleUnit::Degrees
    }
}

pub(crate) const fn rotation_mode(absolute: bool) -> RotationMode {
    if absolute {
        RotationMode::Absolute
    } else {
        RotationMode::Relative
    }
}

pub(crate) const fn force_frame(world_frame: bool) -> ForceFrame {
    if world_frame {
        ForceFrame::World
    } else {
        ForceFrame::Agent
    }
}
