//! Entry point for the `pagi` binary.
//!
//! Delegates to [`pagi_cli::run`], which loads configuration, connects to the
//! world, performs one operation and renders its result.

use std::io::{self, StderrLock, StdoutLock};
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut stdout: StdoutLock<'_> = io::stdout().lock();
    let mut stderr: StderrLock<'_> = io::stderr().lock();
    pagi_cli::run(std::env::args_os(), &mut stdout, &mut stderr)
}
