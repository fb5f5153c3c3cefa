//! Build descriptor rendering
//!
//! The build descriptor is the generated Dockerfile instructing the container
//! engine how to build a test image for one version tag. One scratch file is
//! created per run inside the work area and rewritten in place (truncate,
//! seek, write) for every tag; the file identity persists across iterations.
//! A single run writes it strictly sequentially, so the type hands out no
//! shared mutability.
//!
//! The three-line format interpolates the test command verbatim - no
//! escaping. A caller-supplied command with special characters propagates
//! as-is into the RUN instruction; that is an accepted trust boundary.

use crate::errors::{Result, WorkspaceError};
use std::io::{Seek, SeekFrom, Write};
use std::path::Path;
use tracing::debug;

/// The reused scratch Dockerfile for one run
#[derive(Debug)]
pub struct BuildDescriptor {
    file: tempfile::NamedTempFile,
}

impl BuildDescriptor {
    /// Create the descriptor scratch file inside the work area
    pub fn create_in(dir: &Path) -> Result<Self> {
        let file = tempfile::Builder::new()
            .prefix("Dockerfile")
            .tempfile_in(dir)
            .map_err(WorkspaceError::Descriptor)?;
        debug!(path = %file.path().display(), "created build descriptor");
        Ok(Self { file })
    }

    /// Path handed to the engine's `-f` flag
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Rewrite the descriptor for one version tag, truncating prior contents
    /// first
    ///
    /// A shorter render after a longer one must leave no trailing remnants.
    pub fn render(&mut self, image: &str, tag: &str, package_path: &str, command: &str) -> Result<()> {
        let file = self.file.as_file_mut();
        file.set_len(0).map_err(WorkspaceError::Render)?;
        file.seek(SeekFrom::Start(0)).map_err(WorkspaceError::Render)?;
        write!(
            file,
            "FROM {}:{}\nCOPY {} {}\nRUN cd {} && {}",
            image, tag, package_path, package_path, package_path, command
        )
        .map_err(WorkspaceError::Render)?;
        file.flush().map_err(WorkspaceError::Render)?;
        Ok(())
    }
}
