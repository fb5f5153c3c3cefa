//! External command execution
//!
//! This module provides the single choke point through which every external
//! process is spawned: the bind/unbind commands and the container-engine
//! build/run/remove steps all go through [`CommandRunner::run`]. Both output
//! streams of the child are wired to the run's configured sink; a non-zero
//! exit or spawn failure is mapped to an error carrying the invoked command
//! line for diagnostics.
//!
//! There are no retries and no timeout: a hanging external command hangs the
//! whole run.

use crate::errors::{CommandError, Result};
use crate::sink::OutputSink;
use std::process::{Command, Stdio};
use tracing::debug;

/// Runs external programs with both output streams wired to one sink
#[derive(Debug)]
pub struct CommandRunner {
    sink: OutputSink,
}

impl CommandRunner {
    /// Create a runner writing all spawned output to `sink`
    pub fn new(sink: OutputSink) -> Self {
        Self { sink }
    }

    /// Spawn `program` with `args` and block until it completes
    ///
    /// Stdin is closed. A spawn failure or non-zero exit becomes a
    /// [`CommandError`] carrying the shell-quoted command line.
    pub fn run(&self, program: &str, args: &[String]) -> Result<()> {
        let command_line = render_command_line(program, args);
        debug!(command = %command_line, "running external command");

        let (stdout, stderr) = self.sink.stdio_pair().map_err(|source| CommandError::Spawn {
            command_line: command_line.clone(),
            source,
        })?;

        let status = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(stdout)
            .stderr(stderr)
            .status()
            .map_err(|source| CommandError::Spawn {
                command_line: command_line.clone(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(CommandError::Exit {
                command_line,
                status,
            }
            .into())
        }
    }
}

/// Shell-quoted command line for error messages
fn render_command_line(program: &str, args: &[String]) -> String {
    shell_words::join(std::iter::once(program).chain(args.iter().map(String::as_str)))
}
