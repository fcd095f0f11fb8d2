//! Request → reply code mapping.
//!
//! Most replies echo the sensor, force or command name that produced them,
//! but a few do not (a rotation query on sensor `A` is answered with a `BR`
//! message). The table keeps those exceptions in one place.

use crate::command::Command;
use crate::vocabulary::{CommandName, sensor};

#[derive(Debug, Clone, Copy)]
enum ReplyCode {
    EchoPrimary,
    EchoCommand,
    Fixed(&'static str),
    Silent,
}

#[derive(Debug, Clone, Copy)]
struct ReplyRule {
    command: CommandName,
    primary: Option<&'static str>,
    reply: ReplyCode,
}

const fn rule(command: CommandName, primary: Option<&'static str>, reply: ReplyCode) -> ReplyRule {
    ReplyRule {
        command,
        primary,
        reply,
    }
}

// First match wins; rules with a primary argument precede the catch-alls.
const REPLY_TABLE: &[ReplyRule] = &[
    rule(
        CommandName::SensorRequest,
        Some(sensor::ROTATION),
        ReplyCode::Fixed("BR"),
    ),
    rule(CommandName::SensorRequest, None, ReplyCode::EchoPrimary),
    rule(CommandName::AddForce, None, ReplyCode::EchoPrimary),
    rule(CommandName::LoadTask, None, ReplyCode::Silent),
    rule(
        CommandName::GetActiveStates,
        None,
        ReplyCode::Fixed("activeStates"),
    ),
    rule(
        CommandName::GetActiveReflexes,
        None,
        ReplyCode::Fixed("activeReflexes"),
    ),
];

/// Response code the world uses when answering `command`.
///
/// Returns `None` for commands the world does not acknowledge (`loadTask`).
#[must_use]
pub fn expected_reply(command: &Command) -> Option<String> {
    let primary = command.primary();
    let reply = REPLY_TABLE
        .iter()
        .find(|rule| {
            rule.command == command.name()
                && rule.primary.is_none_or(|expected| expected == primary)
        })
        .map_or(ReplyCode::EchoCommand, |rule| rule.reply);

    match reply {
        ReplyCode::EchoPrimary => Some(primary.to_owned()),
        ReplyCode::EchoCommand => Some(command.name().as_ref().to_owned()),
        ReplyCode::Fixed(code) => Some(code.to_owned()),
        ReplyCode::Silent => None,
    }
}
