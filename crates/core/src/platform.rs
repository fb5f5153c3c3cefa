//! Platform detection and bind capability lookup
//!
//! This module detects the host platform at runtime and maps it to the bind
//! mechanism used to attach a source directory into the work area. The lookup
//! is evaluated once per run; a platform with no known mechanism is a
//! constructor-time error, never a runtime panic.

use crate::errors::{AttachError, Result};
use std::env;
use std::path::Path;
use tracing::debug;

/// Host platform identifier, detected at runtime
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Platform {
    /// Native Linux
    Linux,
    /// macOS
    MacOS,
    /// Anything else, carrying the OS name for error reporting
    Other(String),
}

impl Platform {
    /// Detect the current platform environment
    pub fn detect() -> Self {
        match env::consts::OS {
            "linux" => Platform::Linux,
            "macos" => Platform::MacOS,
            other => Platform::Other(other.to_string()),
        }
    }

    /// OS name as reported in errors
    pub fn name(&self) -> &str {
        match self {
            Platform::Linux => "linux",
            Platform::MacOS => "macos",
            Platform::Other(os) => os,
        }
    }
}

/// Bind capability for one platform: how to attach a source directory
/// read-only at a destination path, and how to undo it
///
/// Linux uses a kernel bind mount; macOS uses bindfs (a user-space bind
/// filesystem, asynchronous to populate - hence the readiness poll in
/// [`crate::attach`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindStrategy {
    /// `mount --bind -r` (Linux)
    BindMount,
    /// `bindfs --perms=a-w` (macOS)
    Bindfs,
}

impl BindStrategy {
    /// Look up the bind capability for `platform`
    ///
    /// An unknown platform is a fatal, non-retryable error raised here,
    /// before anything has been attached.
    pub fn for_platform(platform: &Platform) -> Result<Self> {
        match platform {
            Platform::Linux => Ok(BindStrategy::BindMount),
            Platform::MacOS => Ok(BindStrategy::Bindfs),
            Platform::Other(os) => Err(AttachError::UnsupportedPlatform { os: os.clone() }.into()),
        }
    }

    /// Look up the bind capability for the detected host platform
    pub fn detect() -> Result<Self> {
        let platform = Platform::detect();
        debug!(platform = platform.name(), "selecting bind strategy");
        Self::for_platform(&platform)
    }

    /// Command line that attaches `source` read-only at `dest`
    pub fn attach_command(&self, source: &Path, dest: &Path) -> (&'static str, Vec<String>) {
        match self {
            BindStrategy::BindMount => (
                "mount",
                vec![
                    "--bind".to_string(),
                    "-r".to_string(),
                    source.display().to_string(),
                    dest.display().to_string(),
                ],
            ),
            BindStrategy::Bindfs => (
                "bindfs",
                vec![
                    "--perms=a-w".to_string(),
                    source.display().to_string(),
                    dest.display().to_string(),
                ],
            ),
        }
    }

    /// Command line that releases an attach at `dest`
    ///
    /// Both supported mechanisms release through umount.
    pub fn release_command(&self, dest: &Path) -> (&'static str, Vec<String>) {
        ("umount", vec![dest.display().to_string()])
    }
}
