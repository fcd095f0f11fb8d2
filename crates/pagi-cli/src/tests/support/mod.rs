//! Harness for running the CLI against a scripted world.


use std::ffi::OsString;
use std::process::ExitCode;

use anyhow::Result;
use pagi_config::Config;

use crate::{AppError, ConfigLoader, IoStreams, run_with_loader};

pub(crate) use fake_world::{FakeWorld, replies};

pub(crate) struct StaticConfigLoader {
    config: Config,
}

impl StaticConfigLoader {
    pub(crate) fn new(config: Config) -> Self {
        Self { config }
    }
}

impl ConfigLoader for StaticConfigLoader {
    fn load(&self, _args: &[OsString]) -> Result<Config, AppError> {
        Ok(self.config.clone())
    }
}

/// Configuration pointing at a fake world on `port` with logging silenced.
pub(crate) fn local_config(port: u16) -> Config {
    Config {
        world_host: Some("127.0.0.1".to_owned()),
        world_port: port,
        receive_timeout_ms: Some(2_000),
        pace_interval_ms: 0,
        log_filter: "off".to_owned(),
        ..Config::default()
    }
}

/// Captured outcome of one CLI invocation.
pub(crate) struct Invocation {
    pub(crate) exit_code: ExitCode,
    pub(crate) stdout: String,
    pub(crate) stderr: String,
}

/// Runs the CLI with `args` (program name excluded) against `config`.
pub(crate) fn invoke(config: Config, args: &[&str]) -> Result<Invocation> {
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let loader = StaticConfigLoader::new(config);
    let argv = std::iter::once("pagi")
        .chain(args.iter().copied())
        .map(OsString::from);
    let exit_code = {
        let mut io = IoStreams::with_terminal_status(&mut stdout, &mut stderr, false);
        run_with_loader(argv, &mut io, &loader)
    };
    Ok(Invocation {
        exit_code,
        stdout: String::from_utf8(stdout)?,
        stderr: String::from_utf8(stderr)?,
    })
}
