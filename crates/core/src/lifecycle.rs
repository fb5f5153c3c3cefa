//! Run orchestration and ordered teardown
//!
//! This module wires the components together for one run: platform capability
//! check, work area, source attach, build descriptor, version loop. Resources
//! are acquired in that order and released in strict reverse order on every
//! exit path, success or failure. Cleanup failures are logged and never
//! escalate: teardown happens during unwinding of an already-decided result,
//! and must not mask the original cause.

use crate::attach;
use crate::config::RunConfig;
use crate::descriptor::BuildDescriptor;
use crate::errors::Result;
use crate::exec::CommandRunner;
use crate::matrix::VersionMatrix;
use crate::platform::BindStrategy;
use crate::sink::OutputSink;
use crate::workspace::WorkArea;
use tracing::{debug, instrument, warn};

/// Execute a full run
///
/// The platform capability check runs first, so an unsupported host fails
/// before any side effect. The work area is removed regardless of outcome;
/// the attach handle is released before the work area is deleted.
#[instrument(skip(config, sink), fields(package = %config.package()))]
pub fn run(config: &RunConfig, sink: OutputSink) -> Result<()> {
    let runner = CommandRunner::new(sink);
    let strategy = BindStrategy::detect()?;

    let work_area = WorkArea::create(&config.package_path())?;
    let outcome = run_attached(config, &runner, strategy, &work_area);

    if let Err(err) = work_area.close() {
        warn!(error = %err, "failed to remove work area");
    }
    outcome
}

fn run_attached(
    config: &RunConfig,
    runner: &CommandRunner,
    strategy: BindStrategy,
    work_area: &WorkArea,
) -> Result<()> {
    let handle = attach::attach(runner, strategy, &config.source_path(), work_area.dest())?;
    debug!(
        source = %config.source_path().display(),
        dest = %work_area.dest().display(),
        "source attached"
    );

    let outcome = run_versions(config, runner, work_area);

    if let Err(err) = handle.release() {
        warn!(error = %err, "failed to release source attach");
    }
    outcome
}

fn run_versions(config: &RunConfig, runner: &CommandRunner, work_area: &WorkArea) -> Result<()> {
    let mut descriptor = BuildDescriptor::create_in(work_area.root())?;
    let package_path = config.package_path_str();
    let matrix = VersionMatrix::new(
        runner,
        config.engine(),
        config.image(),
        &package_path,
        config.command(),
    );
    matrix.run_all(config.tags(), &mut descriptor, work_area.root())
    // The descriptor drops here, before the attach release and work-area
    // removal: strict reverse-acquisition order.
}
