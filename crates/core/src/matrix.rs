//! Per-version build/run/cleanup control loop
//!
//! For each version tag, in caller-given order: rewrite the shared build
//! descriptor, then drive the container engine through build, run, and remove
//! via the Command Runner. The loop is strictly sequential and stops on the
//! first failure, returning the failing tag and step.
//!
//! A failing build or run aborts the loop before that tag's remove step, so a
//! partially-built image can be left on the host. That matches the documented
//! contract: callers must not assume artifacts are always removed on failure.

use crate::descriptor::BuildDescriptor;
use crate::errors::{MatrixError, MultitestError, Result};
use crate::exec::CommandRunner;
use std::fmt;
use std::path::Path;
use tracing::{debug, info};

/// Run label prefixed to every artifact name
const RUN_LABEL: &str = "multitest";

/// One engine operation within a version cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// `build` the test image from the descriptor
    Build,
    /// `run` the built image to completion
    Run,
    /// `rmi` the built image
    Remove,
}

impl Step {
    /// Step name as it appears in errors
    pub fn as_str(&self) -> &'static str {
        match self {
            Step::Build => "build",
            Step::Run => "run",
            Step::Remove => "remove",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Derive the per-tag artifact name: `multitest:<image>-<tag>`
///
/// The tag is embedded verbatim, so two tags in the same run can never
/// collide. Collision with images pre-existing on the host is left to the
/// engine's own overwrite/error semantics.
pub fn artifact_name(image: &str, tag: &str) -> String {
    format!("{}:{}-{}", RUN_LABEL, image, tag)
}

/// The version loop controller
///
/// Holds the per-run invariants (engine, image, package path, test command);
/// [`VersionMatrix::run_all`] iterates the tags. One instance serves one run:
/// the shared descriptor makes concurrent use unsafe and out of scope.
#[derive(Debug)]
pub struct VersionMatrix<'a> {
    runner: &'a CommandRunner,
    engine: &'a str,
    image: &'a str,
    package_path: &'a str,
    command: &'a str,
}

impl<'a> VersionMatrix<'a> {
    pub fn new(
        runner: &'a CommandRunner,
        engine: &'a str,
        image: &'a str,
        package_path: &'a str,
        command: &'a str,
    ) -> Self {
        Self {
            runner,
            engine,
            image,
            package_path,
            command,
        }
    }

    /// Run the build/run/remove cycle for every tag in order, stopping on the
    /// first failure
    ///
    /// `context` is the work-area root handed to the engine as the build
    /// context. An empty tag list is rejected before any external command is
    /// invoked.
    pub fn run_all(
        &self,
        tags: &[String],
        descriptor: &mut BuildDescriptor,
        context: &Path,
    ) -> Result<()> {
        if tags.is_empty() {
            return Err(MatrixError::Empty.into());
        }
        for tag in tags {
            self.run_tag(tag, descriptor, context)?;
        }
        Ok(())
    }

    fn run_tag(
        &self,
        tag: &str,
        descriptor: &mut BuildDescriptor,
        context: &Path,
    ) -> Result<()> {
        descriptor.render(self.image, tag, self.package_path, self.command)?;
        let artifact = artifact_name(self.image, tag);
        info!(tag = %tag, artifact = %artifact, "testing version");

        let build = vec![
            "build".to_string(),
            "-f".to_string(),
            descriptor.path().display().to_string(),
            "-t".to_string(),
            artifact.clone(),
            context.display().to_string(),
        ];
        let run = vec!["run".to_string(), "--rm".to_string(), artifact.clone()];
        let remove = vec!["rmi".to_string(), "-f".to_string(), artifact.clone()];

        for (step, args) in [(Step::Build, build), (Step::Run, run), (Step::Remove, remove)] {
            debug!(tag = %tag, step = %step, "engine step");
            self.runner
                .run(self.engine, &args)
                .map_err(|err| step_error(tag, step, err))?;
        }
        Ok(())
    }
}

fn step_error(tag: &str, step: Step, err: MultitestError) -> MultitestError {
    match err {
        MultitestError::Command(source) => MatrixError::Step {
            tag: tag.to_string(),
            step: step.as_str().to_string(),
            source,
        }
        .into(),
        other => other,
    }
}
