//! World-level operations: raw messaging, tasks, states and reflexes.

use camino::{Utf8Path, Utf8PathBuf};
use pagi_config::{Config, WorldEndpoint};
use tracing::info;

use crate::CONNECTION_TARGET;
use crate::agent::{Agent, Hand};
use crate::command::Command;
use crate::connection::{ClientSettings, Connection, ReceiveMode};
use crate::error::WorldError;
use crate::message::Message;
use crate::reply::expected_reply;
use crate::response::{FromMessage, NameList};
use crate::side::Side;
use crate::transport::{ShutdownHandle, TcpTransport, Transport};
use crate::vocabulary::CommandName;

/// Session with a running PAGI world.
///
/// Owns the [`Connection`] and remembers the last task file loaded so it can
/// be reloaded with [`World::reset_task`].
#[derive(Debug)]
pub struct World<T = TcpTransport> {
    connection: Connection<T>,
    task_file: Option<Utf8PathBuf>,
}

impl World<TcpTransport> {
    /// Connects to the world described by `config`.
    ///
    /// # Errors
    ///
    /// Returns `Resolve` or `Connect` when the world cannot be reached.
    pub fn connect(config: &Config) -> Result<Self, WorldError> {
        Self::connect_to(&config.world_endpoint(), ClientSettings::from(config))
    }

    /// Connects to `endpoint` with explicit settings.
    ///
    /// # Errors
    ///
    /// Returns `Resolve` or `Connect` when the world cannot be reached.
    pub fn connect_to(endpoint: &WorldEndpoint, settings: ClientSettings) -> Result<Self, WorldError> {
        Ok(Self {
            connection: Connection::connect(endpoint, settings)?,
            task_file: None,
        })
    }

    /// Handle that closes the socket from another thread, unblocking a
    /// pending receive with [`WorldError::ConnectionClosed`].
    ///
    /// # Errors
    ///
    /// See [`Connection::shutdown_handle`].
    pub fn shutdown_handle(&self) -> Result<ShutdownHandle, WorldError> {
        self.connection.shutdown_handle()
    }
}

impl<T: Transport> World<T> {
    /// Builds a session over an already open transport.
    #[must_use]
    pub fn from_transport(transport: T, settings: ClientSettings) -> Self {
        Self {
            connection: Connection::new(transport, settings),
            task_file: None,
        }
    }

    /// Underlying connection.
    #[must_use]
    pub const fn connection(&self) -> &Connection<T> {
        &self.connection
    }

    /// Whether the session still has an open transport.
    #[must_use]
    pub const fn is_connected(&self) -> bool {
        self.connection.is_connected()
    }

    /// Closes the connection and forgets the loaded task.
    ///
    /// # Errors
    ///
    /// See [`Connection::disconnect`].
    pub fn disconnect(&mut self) -> Result<(), WorldError> {
        self.task_file = None;
        self.connection.disconnect()
    }

    /// Validates and sends a raw message.
    ///
    /// # Errors
    ///
    /// See [`Connection::dispatch`].
    pub fn send_message(&mut self, raw: &str) -> Result<Command, WorldError> {
        self.connection.dispatch(raw)
    }

    /// Pulls the next message answering `code`.
    ///
    /// # Errors
    ///
    /// See [`Connection::receive`].
    pub fn get_message(
        &mut self,
        code: &str,
        mode: ReceiveMode,
    ) -> Result<Option<Message>, WorldError> {
        self.connection.receive(code, mode)
    }

    /// Sends `command`, waits for its reply and parses it as `R`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCommand` before sending when the world never answers
    /// `command`, plus any send, receive or schema error.
    pub fn request<R: FromMessage>(&mut self, command: &Command) -> Result<R, WorldError> {
        let code = expected_reply(command).ok_or_else(|| WorldError::InvalidCommand {
            message: command.to_string(),
        })?;
        self.connection.send(command)?;
        let reply = self.connection.receive_blocking(&code)?;
        R::from_message(&reply)
    }

    /// Asks the world to load the task file at `path`.
    ///
    /// The world sends no acknowledgement.
    ///
    /// # Errors
    ///
    /// Returns `TaskFileNotFound` when `path` is not a local file, plus any
    /// send error.
    pub fn load_task(&mut self, path: &Utf8Path) -> Result<(), WorldError> {
        if !path.is_file() {
            return Err(WorldError::TaskFileNotFound {
                path: path.to_owned(),
            });
        }
        let command = Command::new(CommandName::LoadTask, [path.as_str()])?;
        self.connection.send(&command)?;
        self.task_file = Some(path.to_owned());
        info!(target: CONNECTION_TARGET, task = %path, "requested task load");
        Ok(())
    }

    /// Reloads the last task file.
    ///
    /// # Errors
    ///
    /// Returns `NoPreviousTask` when no task has been loaded on this
    /// connection, plus the errors of [`World::load_task`].
    pub fn reset_task(&mut self) -> Result<(), WorldError> {
        let path = self.task_file.clone().ok_or(WorldError::NoPreviousTask)?;
        self.load_task(&path)
    }

    /// Last task file loaded on this connection.
    #[must_use]
    pub fn task_file(&self) -> Option<&Utf8Path> {
        self.task_file.as_deref()
    }

    /// Prints `text` in the world's console and waits for the echo.
    ///
    /// # Errors
    ///
    /// Returns send or receive errors.
    pub fn print_text(&mut self, text: &str) -> Result<Message, WorldError> {
        let command = Command::new(CommandName::Print, [text])?;
        self.request(&command)
    }

    /// Registers a timed state.
    ///
    /// # Errors
    ///
    /// Always returns `Unsupported`.
    pub fn set_state(&mut self, _name: &str, _length: u64) -> Result<(), WorldError> {
        Err(WorldError::unsupported("set_state"))
    }

    /// Removes the state `name` by setting its lifetime to zero.
    ///
    /// # Errors
    ///
    /// Returns send or receive errors.
    pub fn remove_state(&mut self, name: &str) -> Result<Message, WorldError> {
        let command = Command::new(CommandName::SetState, [name, "0"])?;
        self.request(&command)
    }

    /// Names of the states currently active.
    ///
    /// # Errors
    ///
    /// Returns send or receive errors.
    pub fn get_all_states(&mut self) -> Result<Vec<String>, WorldError> {
        let command = Command::new(CommandName::GetActiveStates, std::iter::empty::<String>())?;
        self.request::<NameList>(&command).map(|names| names.0)
    }

    /// Registers a reflex.
    ///
    /// # Errors
    ///
    /// Always returns `Unsupported`.
    pub fn set_reflex(
        &mut self,
        _name: &str,
        _conditions: &str,
        _actions: &str,
    ) -> Result<(), WorldError> {
        Err(WorldError::unsupported("set_reflex"))
    }

    /// Removes the reflex `name`.
    ///
    /// # Errors
    ///
    /// Returns send or receive errors.
    pub fn remove_reflex(&mut self, name: &str) -> Result<Message, WorldError> {
        let command = Command::new(CommandName::RemoveReflex, [name])?;
        self.request(&command)
    }

    /// Names of the reflexes currently active.
    ///
    /// # Errors
    ///
    /// Returns send or receive errors.
    pub fn get_all_reflexes(&mut self) -> Result<Vec<String>, WorldError> {
        let command =
            Command::new(CommandName::GetActiveReflexes, std::iter::empty::<String>())?;
        self.request::<NameList>(&command).map(|names| names.0)
    }

    /// Spawns an item in the world.
    ///
    /// # Errors
    ///
    /// Always returns `Unsupported`.
    pub fn create_item(&mut self) -> Result<(), WorldError> {
        Err(WorldError::unsupported("create_item"))
    }

    /// The agent's body.
    pub fn agent(&mut self) -> Agent<'_, T> {
        Agent::new(self)
    }

    /// One of the agent's hands.
    pub fn hand(&mut self, side: Side) -> Hand<'_, T> {
        Hand::new(self, side)
    }
}
