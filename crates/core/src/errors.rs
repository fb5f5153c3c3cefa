//! Error types and handling
//!
//! This module provides domain-specific error types for each stage of a run
//! (configuration, source attachment, external commands, the version loop)
//! that are then wrapped in the main MultitestError enum for unified error
//! handling.

use thiserror::Error;

/// Configuration-related errors
///
/// All of these are raised before any side effect occurs: no work area has
/// been created and nothing has been attached or spawned.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A required option was not provided
    #[error("required option missing: {name}")]
    MissingOption { name: String },

    /// No source root could be determined
    #[error("no source root: pass --root or set GOPATH")]
    MissingRoot,

    /// The version tag list was empty
    #[error("must provide at least one version tag to test")]
    NoVersions,

    /// The package directory does not exist under the source root
    #[error("could not find package: {path}")]
    PackageNotFound { path: String },

    /// Inspecting the package directory failed for a reason other than absence
    #[error("error inspecting package {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Source-attachment errors
#[derive(Error, Debug)]
pub enum AttachError {
    /// No bind mechanism is known for the host platform
    #[error("{os} is not supported yet")]
    UnsupportedPlatform { os: String },

    /// The bind command itself failed
    #[error("bind command failed")]
    Bind(#[source] CommandError),

    /// Reading the attach destination failed while polling for readiness
    #[error("error probing attach point {path}")]
    Probe {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The bounded readiness poll was exhausted before the destination
    /// became populated. Distinct from [`AttachError::Bind`] so operators can
    /// tell a slow environment from a broken bind command.
    #[error("attach at {path} took too long")]
    Timeout { path: String },
}

/// External command execution errors
#[derive(Error, Debug)]
pub enum CommandError {
    /// The program could not be spawned at all
    #[error("failed to spawn `{command_line}`")]
    Spawn {
        command_line: String,
        #[source]
        source: std::io::Error,
    },

    /// The program ran but exited unsuccessfully
    #[error("`{command_line}` failed: {status}")]
    Exit {
        command_line: String,
        status: std::process::ExitStatus,
    },
}

/// Version loop errors
#[derive(Error, Debug)]
pub enum MatrixError {
    /// The controller was handed an empty tag list
    #[error("no version tags to run")]
    Empty,

    /// One engine step failed for one version tag; the loop stops here
    #[error("{step} step failed for version tag {tag}")]
    Step {
        tag: String,
        step: String,
        #[source]
        source: CommandError,
    },
}

/// Work-area and descriptor file errors
#[derive(Error, Debug)]
pub enum WorkspaceError {
    /// Creating the ephemeral work area failed
    #[error("could not create work area")]
    Create(#[source] std::io::Error),

    /// Removing the work area at teardown failed
    #[error("could not remove work area")]
    Cleanup(#[source] std::io::Error),

    /// Creating the build descriptor scratch file failed
    #[error("could not create build descriptor file")]
    Descriptor(#[source] std::io::Error),

    /// Rewriting the build descriptor failed
    #[error("re-writing build descriptor failed")]
    Render(#[source] std::io::Error),
}

/// Main error enum wrapping all domain-specific errors
#[derive(Error, Debug)]
pub enum MultitestError {
    /// Configuration-related errors
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Source-attachment errors
    #[error("attach error: {0}")]
    Attach(#[from] AttachError),

    /// External command execution errors
    #[error("command error: {0}")]
    Command(#[from] CommandError),

    /// Version loop errors
    #[error("version loop error: {0}")]
    Matrix(#[from] MatrixError),

    /// Work-area and descriptor errors
    #[error("work area error: {0}")]
    Workspace(#[from] WorkspaceError),
}

/// Convenience type alias for Results with MultitestError
pub type Result<T> = std::result::Result<T, MultitestError>;
