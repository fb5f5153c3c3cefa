//! Run configuration
//!
//! A [`RunConfig`] is the explicit, immutable configuration value for one
//! run: source root, logical package, test command, version tags, base image,
//! and container engine. It is constructed once by the CLI layer and passed
//! into each component; there is no ambient global state.
//!
//! Validation happens at construction, before any side effect: a missing
//! package, an empty tag list, or an absent package directory is rejected
//! here, while no work area exists and nothing has been attached or spawned.

use crate::errors::{ConfigError, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Immutable configuration for one run
#[derive(Debug, Clone)]
pub struct RunConfig {
    source_root: PathBuf,
    package: String,
    command: String,
    tags: Vec<String>,
    image: String,
    engine: String,
}

impl RunConfig {
    /// Build and validate a run configuration
    ///
    /// `package` is the logical, import-path-shaped package identifier (e.g.
    /// `example.com/widget`); the package directory must already exist at
    /// `<source_root>/src/<package>`. `tags` must contain at least one entry;
    /// order and duplicates are preserved and processed as given.
    pub fn new(
        source_root: PathBuf,
        package: String,
        command: String,
        tags: Vec<String>,
        image: String,
        engine: String,
    ) -> Result<Self> {
        if package.is_empty() {
            return Err(ConfigError::MissingOption {
                name: "pkg".to_string(),
            }
            .into());
        }
        if tags.is_empty() {
            return Err(ConfigError::NoVersions.into());
        }

        let config = Self {
            source_root,
            package,
            command,
            tags,
            image,
            engine,
        };

        let source = config.source_path();
        match fs::metadata(&source) {
            Ok(metadata) if metadata.is_dir() => Ok(config),
            Ok(_) => Err(ConfigError::PackageNotFound {
                path: source.display().to_string(),
            }
            .into()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                Err(ConfigError::PackageNotFound {
                    path: source.display().to_string(),
                }
                .into())
            }
            Err(err) => Err(ConfigError::Io {
                path: source.display().to_string(),
                source: err,
            }
            .into()),
        }
    }

    /// Split a comma-delimited tag list, preserving order and duplicates
    pub fn parse_tags(tags: &str) -> Vec<String> {
        tags.split(',').map(str::to_string).collect()
    }

    /// The logical package identifier as given by the caller
    pub fn package(&self) -> &str {
        &self.package
    }

    /// Logical package path mirrored on both sides of the attach,
    /// e.g. `src/example.com/widget`
    pub fn package_path(&self) -> PathBuf {
        Path::new("src").join(&self.package)
    }

    /// The package path as it appears in the build descriptor
    pub fn package_path_str(&self) -> String {
        format!("src/{}", self.package)
    }

    /// Host location of the package: `<root>/src/<package>`
    pub fn source_path(&self) -> PathBuf {
        self.source_root.join(self.package_path())
    }

    /// Test command run inside the container
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Version tags, in caller-given order
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Base image name
    pub fn image(&self) -> &str {
        &self.image
    }

    /// Container engine executable
    pub fn engine(&self) -> &str {
        &self.engine
    }
}
