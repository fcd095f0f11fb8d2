//! Client for the PAGI world's line-delimited text protocol.
//!
//! The world speaks comma-separated, newline-terminated messages over a TCP
//! socket. This crate validates outgoing commands against the world's
//! vocabulary, frames the inbound byte stream into discrete messages, and
//! correlates replies with the command that produced them through the
//! message's leading response code.
//!
//! The layers, leaves first:
//!
//! - [`Transport`] moves raw bytes; [`TcpTransport`] is the production
//!   implementation.
//! - [`MessageFramer`] buffers partial reads and extracts complete lines.
//! - [`Connection`] validates and dispatches [`Command`]s, records them in a
//!   bounded [`CommandLog`], and correlates replies in either
//!   [`ReceiveMode`].
//! - [`World`], [`Agent`] and [`Hand`] compose those calls into typed
//!   operations such as reading the agent's position or rotating it.
//!
//! ```no_run
//! use pagi_client::{AngleUnit, RotationMode, World};
//! use pagi_config::Config;
//!
//! # fn main() -> Result<(), pagi_client::WorldError> {
//! let mut world = World::connect(&Config::default())?;
//! world.print_text("hello")?;
//! let mut agent = world.agent();
//! let position = agent.get_position()?;
//! agent.rotate(90.0, AngleUnit::Degrees, RotationMode::Absolute)?;
//! println!("agent at {}, {}", position.x, position.y);
//! # Ok(())
//! # }
//! ```

mod agent;
mod command;
mod command_log;
mod connection;
mod error;
mod framer;
mod geometry;
mod message;
mod reply;
mod response;
mod side;
mod transport;
mod vocabulary;
mod world;

pub use agent::{Agent, Hand};
pub use command::Command;
pub use command_log::{CommandLog, LoggedCommand};
pub use connection::{ClientSettings, Connection, ReceiveMode};
pub use error::{TransportOperation, WorldError};
pub use framer::MessageFramer;
pub use geometry::{AngleUnit, ForceFrame, RotationMode, normalize_degrees, world_to_agent};
pub use message::Message;
pub use reply::expected_reply;
pub use response::{FromMessage, NameList, Outcome, Point, Rotation, VisionGrid, VisionKind};
pub use side::Side;
pub use transport::{ShutdownHandle, TcpTransport, Transport};
pub use vocabulary::{
    CommandName, FORCES, HAND_RELEASE_FORCES, VISION_FIELD_STEPS, force, is_force, is_sensor,
    sensor, vision_field_code,
};
pub use world::World;

/// `tracing` target used for connection lifecycle and correlation events.
pub(crate) const CONNECTION_TARGET: &str = "pagi_client::connection";

#[cfg(test)]
mod tests;
