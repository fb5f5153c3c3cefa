//! Output sinks for external command streams
//!
//! An [`OutputSink`] is the single destination for the combined stdout and
//! stderr of every external process spawned during a run: discarded, passed
//! through to one of this process's standard streams, or appended to a log
//! file opened once for the whole run. Selection of the concrete sink lives
//! in the CLI layer; the core only consumes the capability.
//!
//! Sink output is raw engine output. It is never interleaved with structured
//! logging, which goes to stderr via tracing (see [`crate::logging`]).

use std::fs::File;
use std::io;
use std::path::Path;
use std::process::Stdio;

/// Destination for the combined output streams of spawned commands
#[derive(Debug)]
pub enum OutputSink {
    /// Drop all output
    Discard,
    /// Pass output through to this process's stdout
    Stdout,
    /// Pass output through to this process's stderr
    Stderr,
    /// Append output to a file opened once for the whole run
    File(File),
}

impl OutputSink {
    /// Open `path` for writing and wrap it as a file sink
    pub fn create_file(path: &Path) -> io::Result<Self> {
        Ok(OutputSink::File(File::create(path)?))
    }

    /// Produce the (stdout, stderr) handles wiring a child process's streams
    /// into this sink
    ///
    /// Both streams of the child point at the same destination, so its output
    /// arrives combined, in write order, exactly as the engine produced it.
    pub(crate) fn stdio_pair(&self) -> io::Result<(Stdio, Stdio)> {
        match self {
            OutputSink::Discard => Ok((Stdio::null(), Stdio::null())),
            OutputSink::Stdout => Ok((io::stdout().into(), io::stdout().into())),
            OutputSink::Stderr => Ok((io::stderr().into(), io::stderr().into())),
            OutputSink::File(file) => {
                Ok((file.try_clone()?.into(), file.try_clone()?.into()))
            }
        }
    }
}
