//! Bind-and-poll source attachment
//!
//! This module binds a real source directory read-only at a destination path
//! inside the work area, then polls until the destination is observably
//! populated. The bind mechanism is asynchronous on at least one supported
//! platform (bindfs on macOS), so success of the bind command alone proves
//! nothing; readiness means one directory entry could actually be listed at
//! the destination.
//!
//! The poll uses exponential backoff starting at 500ms and doubling each
//! attempt, and gives up once the next planned wait would reach the
//! 10-second ceiling. The cap bounds the step size used to decide whether to
//! keep trying, not a wall-clock stopwatch. Exhaustion is reported as a
//! distinct timeout error so operators can tell a slow environment from a
//! broken bind command.

use crate::errors::{AttachError, MultitestError, Result};
use crate::exec::CommandRunner;
use crate::platform::BindStrategy;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;
use tracing::{debug, instrument};

/// Initial readiness-poll wait
const POLL_START: Duration = Duration::from_millis(500);
/// Ceiling for the backoff step; polling stops once the next planned wait
/// would reach it
const POLL_MAX: Duration = Duration::from_secs(10);

/// An active bind of a source directory onto a path inside the work area
///
/// Released exactly once, on run teardown, by consuming the handle.
#[derive(Debug)]
pub struct AttachHandle<'a> {
    runner: &'a CommandRunner,
    strategy: BindStrategy,
    dest: PathBuf,
}

impl AttachHandle<'_> {
    /// Undo the bind
    ///
    /// Safe to call after the destination has already been torn down by an
    /// enclosing cleanup: the failure is returned for the caller to log,
    /// nothing panics.
    pub fn release(self) -> Result<()> {
        let (program, args) = self.strategy.release_command(&self.dest);
        debug!(dest = %self.dest.display(), "releasing source attach");
        self.runner.run(program, &args)
    }

    /// The attach destination inside the work area
    pub fn dest(&self) -> &Path {
        &self.dest
    }
}

/// Bind `source` read-only at `dest` and poll until the bind has taken effect
///
/// `dest` must already exist as an empty directory; the caller creates the
/// full subtree first. Exactly one external bind process is spawned per call;
/// the bind command itself is never retried.
#[instrument(skip(runner, strategy))]
pub fn attach<'a>(
    runner: &'a CommandRunner,
    strategy: BindStrategy,
    source: &Path,
    dest: &Path,
) -> Result<AttachHandle<'a>> {
    attach_with_backoff(runner, strategy, source, dest, POLL_START, POLL_MAX)
}

fn attach_with_backoff<'a>(
    runner: &'a CommandRunner,
    strategy: BindStrategy,
    source: &Path,
    dest: &Path,
    start: Duration,
    max: Duration,
) -> Result<AttachHandle<'a>> {
    let (program, args) = strategy.attach_command(source, dest);
    runner.run(program, &args).map_err(|err| match err {
        MultitestError::Command(command) => AttachError::Bind(command).into(),
        other => other,
    })?;

    let mut backoff = start;
    while backoff < max {
        match probe(dest) {
            Ok(true) => {
                debug!(dest = %dest.display(), "attach ready");
                return Ok(AttachHandle {
                    runner,
                    strategy,
                    dest: dest.to_path_buf(),
                });
            }
            Ok(false) => {
                debug!(
                    dest = %dest.display(),
                    wait_ms = backoff.as_millis() as u64,
                    "attach not ready yet"
                );
                thread::sleep(backoff);
                backoff *= 2;
            }
            Err(err) => {
                return Err(AttachError::Probe {
                    path: dest.display().to_string(),
                    source: err,
                }
                .into());
            }
        }
    }

    Err(AttachError::Timeout {
        path: dest.display().to_string(),
    }
    .into())
}

/// One readiness probe: attempt to list a single directory entry at `dest`
///
/// `Ok(true)` means populated, `Ok(false)` means no entries yet (not an
/// error), `Err` is any other read failure and aborts the poll.
fn probe(dest: &Path) -> io::Result<bool> {
    let mut entries = fs::read_dir(dest)?;
    match entries.next() {
        Some(Ok(_)) => Ok(true),
        Some(Err(err)) => Err(err),
        None => Ok(false),
    }
}
