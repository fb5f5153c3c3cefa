//! CLI argument parsing and configuration assembly

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use multitest_core::config::RunConfig;
use multitest_core::errors::ConfigError;
use multitest_core::sink::OutputSink;
use std::env;
use std::path::{Path, PathBuf};

/// Log format options
#[derive(Debug, Clone, ValueEnum)]
pub enum LogFormat {
    /// Human-readable text format
    Text,
    /// JSON structured format
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Text => "text",
            LogFormat::Json => "json",
        }
    }
}

/// Test a package against multiple toolchain versions, each inside a
/// disposable container.
#[derive(Debug, Parser)]
#[command(
    name = "multitest",
    version,
    about = "Test a package against multiple toolchain versions in disposable containers",
    long_about = "multitest binds a package's source directory read-only into an ephemeral \
        work area, then for each requested version tag builds a test image from it, runs \
        the test command inside the container, and removes the image. The run stops on the \
        first failure and tears down its work area and attach point on every exit path."
)]
pub struct Cli {
    /// Package to test (import-path-shaped, resolved under <root>/src)
    #[arg(long)]
    pub pkg: String,

    /// Command to run inside the container
    #[arg(long, default_value = "go test -v")]
    pub cmd: String,

    /// Comma-delimited version tags to test, in order
    #[arg(long, default_value = "1.7,1.8,1.9,latest")]
    pub tags: String,

    /// Base image name
    #[arg(long, default_value = "golang")]
    pub image: String,

    /// Container engine executable
    #[arg(long, default_value = "docker")]
    pub engine: String,

    /// Source root containing src/<pkg>; defaults to $GOPATH
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Where container-engine output goes
    #[arg(long, value_name = "none|stdout|stderr|PATH", default_value = "none")]
    pub log_file: String,

    /// Log format for diagnostics on stderr
    #[arg(long, value_enum)]
    pub log_format: Option<LogFormat>,
}

impl Cli {
    /// Resolve the validated run configuration from flags and environment
    pub fn build_config(&self) -> Result<RunConfig> {
        let root = self.resolve_root()?;
        let config = RunConfig::new(
            root,
            self.pkg.clone(),
            self.cmd.clone(),
            RunConfig::parse_tags(&self.tags),
            self.image.clone(),
            self.engine.clone(),
        )?;
        Ok(config)
    }

    /// Source root: `--root` wins, then `$GOPATH`
    fn resolve_root(&self) -> Result<PathBuf> {
        if let Some(root) = &self.root {
            return Ok(root.clone());
        }
        match env::var_os("GOPATH") {
            Some(gopath) if !gopath.is_empty() => Ok(PathBuf::from(gopath)),
            _ => Err(ConfigError::MissingRoot.into()),
        }
    }

    /// Select the output sink for container-engine output
    ///
    /// `none` discards, `stdout`/`stderr` pass through to this process's
    /// standard streams, anything else names a file opened once for the run.
    pub fn select_sink(&self) -> Result<OutputSink> {
        match self.log_file.as_str() {
            "" | "none" => Ok(OutputSink::Discard),
            "stdout" => Ok(OutputSink::Stdout),
            "stderr" => Ok(OutputSink::Stderr),
            path => OutputSink::create_file(Path::new(path))
                .with_context(|| format!("error opening log file {}", path)),
        }
    }
}
