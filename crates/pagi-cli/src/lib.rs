//! Command-line runtime for driving a PAGI world.
//!
//! The runtime splits configuration flags from the command, loads layered
//! configuration, installs logging, connects to the world, performs one
//! operation and renders its result. Configuration loading and the IO
//! streams can be substituted so tests run the same path as the binary.

use std::ffi::OsString;
use std::io::{self, IsTerminal, Write};
use std::process::ExitCode;

use clap::Parser;
use pagi_client::{Message, ReceiveMode, Transport, World, expected_reply};
use pagi_config::Config;

mod cli;
mod config;
mod errors;
mod output;
mod telemetry;

pub use cli::{OutputFormat, ResolvedOutputFormat};
use cli::{Cli, CliCommand, angle_unit, force_frame, rotation_mode};
pub(crate) use config::{ConfigLoader, OrthoConfigLoader};
use config::split_config_arguments;
pub(crate) use errors::AppError;
use output::{Report, emit};

/// Bundles the IO streams provided to the CLI runtime.
pub(crate) struct IoStreams<'a, W: Write, E: Write> {
    pub(crate) stdout: &'a mut W,
    pub(crate) stderr: &'a mut E,
    stdout_is_terminal: bool,
}

impl<'a, W: Write, E: Write> IoStreams<'a, W, E> {
    pub(crate) fn new(stdout: &'a mut W, stderr: &'a mut E) -> Self {
        Self {
            stdout,
            stderr,
            stdout_is_terminal: io::stdout().is_terminal(),
        }
    }

    #[cfg(test)]
    pub(crate) const fn with_terminal_status(
        stdout: &'a mut W,
        stderr: &'a mut E,
        stdout_is_terminal: bool,
    ) -> Self {
        Self {
            stdout,
            stderr,
            stdout_is_terminal,
        }
    }

    pub(crate) const fn stdout_is_terminal(&self) -> bool {
        self.stdout_is_terminal
    }
}

struct CliRunner<'a, W: Write, E: Write, L: ConfigLoader> {
    io: &'a mut IoStreams<'a, W, E>,
    loader: &'a L,
}

impl<'a, W, E, L> CliRunner<'a, W, E, L>
where
    W: Write,
    E: Write,
    L: ConfigLoader,
{
    const fn new(io: &'a mut IoStreams<'a, W, E>, loader: &'a L) -> Self {
        Self { io, loader }
    }

    fn run<I>(&mut self, args: I) -> ExitCode
    where
        I: IntoIterator<Item = OsString>,
    {
        let args: Vec<OsString> = args.into_iter().collect();
        let split = split_config_arguments(&args);

        let result = Cli::try_parse_from(&split.command_arguments)
            .map_err(AppError::CliUsage)
            .and_then(|cli| {
                self.loader
                    .load(&split.config_arguments)
                    .map(|config| (cli, config))
            })
            .and_then(|(cli, config)| {
                telemetry::initialise(&config)?;
                let format = cli.output.resolve(self.io.stdout_is_terminal());
                let report = execute(cli.command, &config)?;
                emit(&report, format, self.io.stdout)
            });

        match result {
            Ok(()) => ExitCode::SUCCESS,
            // `--help` and `--version` are reported through clap errors.
            Err(AppError::CliUsage(error)) if !error.use_stderr() => {
                let _ = write!(self.io.stdout, "{error}");
                ExitCode::SUCCESS
            }
            Err(error) => {
                let _ = writeln!(self.io.stderr, "{error}");
                ExitCode::FAILURE
            }
        }
    }
}

/// Runs the CLI using the provided arguments and IO handles.
#[must_use]
pub fn run<I, W, E>(args: I, stdout: &mut W, stderr: &mut E) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
{
    let mut io = IoStreams::new(stdout, stderr);
    run_with_loader(args, &mut io, &OrthoConfigLoader)
}

/// Runs the CLI with a custom configuration loader.
pub(crate) fn run_with_loader<'a, I, W, E, L>(
    args: I,
    io: &'a mut IoStreams<'a, W, E>,
    loader: &'a L,
) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
    L: ConfigLoader,
{
    CliRunner::new(io, loader).run(args)
}

fn execute(command: CliCommand, config: &Config) -> Result<Report, AppError> {
    let mut world = World::connect(config)?;
    let report = perform(&mut world, command);
    // Keep the operation's error; a world that already hung up has nothing
    // left to close.
    if world.is_connected() {
        let closed = world.disconnect();
        let report = report?;
        closed?;
        return Ok(report);
    }
    report
}

fn perform<T: Transport>(world: &mut World<T>, command: CliCommand) -> Result<Report, AppError> {
    let report = match command {
        CliCommand::Send {
            message,
            code,
            no_wait,
        } => {
            let sent = world.send_message(&message)?;
            let awaited = if no_wait {
                None
            } else {
                code.or_else(|| expected_reply(&sent))
            };
            match awaited {
                Some(code) => message_report(world.get_message(&code, ReceiveMode::Blocking)?),
                None => Report::Sent {
                    command: sent.to_string(),
                },
            }
        }
        CliCommand::Receive { code, non_blocking } => {
            let mode = if non_blocking {
                ReceiveMode::NonBlocking
            } else {
                ReceiveMode::Blocking
            };
            message_report(world.get_message(&code, mode)?)
        }
        CliCommand::Print { text } => Report::Message {
            line: world.print_text(&text)?.into_string(),
        },
        CliCommand::LoadTask { path } => {
            world.load_task(&path)?;
            Report::Sent {
                command: format!("loadTask,{path}"),
            }
        }
        CliCommand::States => Report::Names {
            names: world.get_all_states()?,
        },
        CliCommand::Reflexes => Report::Names {
            names: world.get_all_reflexes()?,
        },
        CliCommand::RemoveState { name } => Report::Message {
            line: world.remove_state(&name)?.into_string(),
        },
        CliCommand::RemoveReflex { name } => Report::Message {
            line: world.remove_reflex(&name)?.into_string(),
        },
        CliCommand::Position => Report::Position {
            point: world.agent().get_position()?,
        },
        CliCommand::HandPosition { side } => Report::Position {
            point: world.hand(side).get_position()?,
        },
        CliCommand::Rotation { radians } => {
            let unit = angle_unit(radians);
            Report::Rotation {
                value: world.agent().get_rotation(unit)?,
                unit,
            }
        }
        CliCommand::Rotate {
            angle,
            radians,
            absolute,
        } => Report::Message {
            line: world
                .agent()
                .rotate(angle, angle_unit(radians), rotation_mode(absolute))?
                .into_string(),
        },
        CliCommand::Jump => Report::Jump {
            success: world.agent().jump()?,
        },
        CliCommand::Force { x, y, world_frame } => Report::Message {
            line: world
                .agent()
                .send_force(x, y, force_frame(world_frame))?
                .into_string(),
        },
        CliCommand::HandForce {
            side,
            x,
            y,
            world_frame,
        } => Report::Message {
            line: world
                .hand(side)
                .send_force(x, y, force_frame(world_frame))?
                .into_string(),
        },
        CliCommand::Grab { side } => Report::Message {
            line: world.hand(side).grab()?.into_string(),
        },
        CliCommand::Release { side } => Report::Message {
            line: world.hand(side).release()?.into_string(),
        },
        CliCommand::Move { paces, side } => {
            world.agent().move_paces(paces, side)?;
            Report::Moved { paces, side }
        }
        CliCommand::Vision { field } => Report::from(world.agent().vision(field.into())?),
    };
    Ok(report)
}

fn message_report(message: Option<Message>) -> Report {
    message.map_or(Report::Empty, |message| Report::Message {
        line: message.into_string(),
    })
}
