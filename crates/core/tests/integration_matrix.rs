//! Integration tests for the version loop controller against a stub engine
//!
//! The stub records every invocation, so these tests assert the exact
//! sequence of engine operations: N full build/run/remove cycles on success,
//! a halt on first failure, and the documented leaked-image gap when the run
//! step fails.
#![cfg(unix)]

mod common;

use multitest_core::descriptor::BuildDescriptor;
use multitest_core::errors::{MatrixError, MultitestError};
use multitest_core::exec::CommandRunner;
use multitest_core::matrix::VersionMatrix;
use multitest_core::sink::OutputSink;
use tempfile::TempDir;

struct MatrixHarness {
    _stub_dir: TempDir,
    work: TempDir,
    engine: String,
    log: std::path::PathBuf,
}

impl MatrixHarness {
    fn new(fail_pattern: Option<&str>) -> Self {
        let stub_dir = TempDir::new().unwrap();
        let log = stub_dir.path().join("engine.log");
        let engine = common::stub_engine(stub_dir.path(), &log, fail_pattern);
        Self {
            engine: engine.display().to_string(),
            _stub_dir: stub_dir,
            work: TempDir::new().unwrap(),
            log,
        }
    }

    fn run(&self, tags: &[&str]) -> multitest_core::errors::Result<()> {
        let mut descriptor = BuildDescriptor::create_in(self.work.path()).unwrap();
        let runner = CommandRunner::new(OutputSink::Discard);
        let matrix = VersionMatrix::new(&runner, &self.engine, "golang", "src/p", "go test -v");
        let tags: Vec<String> = tags.iter().map(|t| t.to_string()).collect();
        matrix.run_all(&tags, &mut descriptor, self.work.path())
    }

    fn log_lines(&self) -> Vec<String> {
        common::read_log(&self.log)
    }
}

#[test]
fn test_one_full_cycle_per_tag_in_order() {
    let harness = MatrixHarness::new(None);
    harness.run(&["1.7", "1.8", "latest"]).unwrap();

    let lines = harness.log_lines();
    assert_eq!(lines.len(), 9, "three engine steps per tag: {:?}", lines);

    for (cycle, tag) in ["1.7", "1.8", "latest"].iter().enumerate() {
        let artifact = format!("multitest:golang-{}", tag);
        assert!(lines[cycle * 3].starts_with("build "));
        assert!(lines[cycle * 3].contains(&artifact));
        assert_eq!(lines[cycle * 3 + 1], format!("run --rm {}", artifact));
        assert_eq!(lines[cycle * 3 + 2], format!("rmi -f {}", artifact));
    }
}

#[test]
fn test_build_context_and_descriptor_are_passed_to_build() {
    let harness = MatrixHarness::new(None);
    harness.run(&["1.7"]).unwrap();

    let lines = harness.log_lines();
    let build = &lines[0];
    assert!(build.contains("-f "));
    assert!(build.contains("Dockerfile"));
    assert!(build.ends_with(&harness.work.path().display().to_string()));
}

#[test]
fn test_duplicate_tags_are_processed_as_given() {
    let harness = MatrixHarness::new(None);
    harness.run(&["1.7", "1.7"]).unwrap();
    assert_eq!(harness.log_lines().len(), 6);
}

#[test]
fn test_halts_on_first_failing_build() {
    let harness = MatrixHarness::new(Some("build*multitest:golang-1.8*"));
    let err = harness.run(&["1.7", "1.8", "latest"]).unwrap_err();

    match err {
        MultitestError::Matrix(MatrixError::Step { tag, step, .. }) => {
            assert_eq!(tag, "1.8");
            assert_eq!(step, "build");
        }
        other => panic!("expected step error, got: {:?}", other),
    }

    // One full cycle for 1.7, then the failing build for 1.8; nothing for
    // "latest".
    let lines = harness.log_lines();
    assert_eq!(lines.len(), 4, "{:?}", lines);
    assert!(lines[3].starts_with("build "));
    assert!(lines[3].contains("multitest:golang-1.8"));
}

#[test]
fn test_failing_run_aborts_before_remove() {
    // Known gap: a failing run leaves that tag's image behind, because the
    // loop stops before the remove step.
    let harness = MatrixHarness::new(Some("run*multitest:golang-1.7*"));
    let err = harness.run(&["1.7", "1.8"]).unwrap_err();

    match err {
        MultitestError::Matrix(MatrixError::Step { tag, step, .. }) => {
            assert_eq!(tag, "1.7");
            assert_eq!(step, "run");
        }
        other => panic!("expected step error, got: {:?}", other),
    }

    let lines = harness.log_lines();
    assert_eq!(lines.len(), 2, "{:?}", lines);
    assert!(lines[0].starts_with("build "));
    assert!(lines[1].starts_with("run "));
    assert!(!lines.iter().any(|line| line.starts_with("rmi ")));
}

#[test]
fn test_empty_tag_list_invokes_no_engine() {
    let harness = MatrixHarness::new(None);
    let err = harness.run(&[]).unwrap_err();
    assert!(matches!(err, MultitestError::Matrix(MatrixError::Empty)));
    assert!(harness.log_lines().is_empty());
}
