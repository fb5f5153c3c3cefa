//! Shared helpers for integration tests: stub executables standing in for
//! the container engine and the bind tools.
#![cfg(unix)]
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

/// Write an executable shell script `name` into `dir`
pub fn stub_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// Stub engine that appends each invocation to `log`, then fails when its
/// arguments match `fail_pattern` (a shell `case` pattern), if given
pub fn stub_engine(dir: &Path, log: &Path, fail_pattern: Option<&str>) -> PathBuf {
    let mut body = format!("echo \"$@\" >> \"{}\"", log.display());
    if let Some(pattern) = fail_pattern {
        body.push_str(&format!(
            "\ncase \"$*\" in\n  {}) exit 1 ;;\nesac",
            pattern
        ));
    }
    stub_script(dir, "engine", &body)
}

/// Stub `mount` that logs its invocation and drops a file into the
/// destination (its last argument) so the readiness poll sees a populated
/// directory on the first probe
pub fn stub_bind_tools(dir: &Path, mount_log: &Path, umount_log: &Path) {
    stub_script(
        dir,
        "mount",
        &format!(
            "echo \"$@\" >> \"{}\"\nfor a in \"$@\"; do last=\"$a\"; done\ntouch \"$last/attached\"",
            mount_log.display()
        ),
    );
    stub_script(
        dir,
        "umount",
        &format!("echo \"$@\" >> \"{}\"", umount_log.display()),
    );
}

/// Read a stub log as one line per invocation
pub fn read_log(path: &Path) -> Vec<String> {
    match fs::read_to_string(path) {
        Ok(content) => content.lines().map(str::to_string).collect(),
        Err(_) => Vec::new(),
    }
}
