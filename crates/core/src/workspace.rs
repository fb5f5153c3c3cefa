//! Ephemeral work area for one run
//!
//! The work area is a fresh temporary directory tree owned exclusively by the
//! run. It contains a package-path-shaped subtree (e.g.
//! `<root>/src/example.com/widget`) into which the real source directory is
//! attached, and it doubles as the container build context. It is destroyed
//! recursively at run end regardless of outcome.

use crate::errors::{Result, WorkspaceError};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// The ephemeral directory tree created for one run
#[derive(Debug)]
pub struct WorkArea {
    dir: tempfile::TempDir,
    dest: PathBuf,
}

impl WorkArea {
    /// Create the work area root plus the package-path-shaped subtree that
    /// will receive the attach
    pub fn create(package_path: &Path) -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("multitest")
            .tempdir()
            .map_err(WorkspaceError::Create)?;
        let dest = dir.path().join(package_path);
        fs::create_dir_all(&dest).map_err(WorkspaceError::Create)?;
        debug!(root = %dir.path().display(), "created work area");
        Ok(Self { dir, dest })
    }

    /// The work-area root, used as the container build context
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// The attach destination: `<root>/<logical-package-path>`
    pub fn dest(&self) -> &Path {
        &self.dest
    }

    /// Recursively remove the work area
    ///
    /// Dropping the work area also removes it; `close` exists so the
    /// orchestrator can observe the error and log it.
    pub fn close(self) -> Result<()> {
        self.dir.close().map_err(WorkspaceError::Cleanup)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_builds_package_subtree() {
        let area = WorkArea::create(Path::new("src/example.com/widget")).unwrap();
        assert!(area.dest().is_dir());
        assert!(area.dest().starts_with(area.root()));
        assert_eq!(
            area.dest(),
            area.root().join("src/example.com/widget")
        );
    }

    #[test]
    fn test_dest_starts_empty() {
        let area = WorkArea::create(Path::new("src/pkg")).unwrap();
        assert_eq!(fs::read_dir(area.dest()).unwrap().count(), 0);
    }

    #[test]
    fn test_close_removes_tree() {
        let area = WorkArea::create(Path::new("src/pkg")).unwrap();
        let root = area.root().to_path_buf();
        area.close().unwrap();
        assert!(!root.exists());
    }

    #[test]
    fn test_close_removes_child_files_too() {
        let area = WorkArea::create(Path::new("src/pkg")).unwrap();
        let root = area.root().to_path_buf();
        fs::write(area.dest().join("main.go"), "package main").unwrap();
        area.close().unwrap();
        assert!(!root.exists());
    }
}
