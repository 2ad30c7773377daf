#![allow(dead_code)]

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Command for the harness binary. Cargo runs integration tests from the
/// package root, so the default schema and the shipped suites resolve.
pub fn harness_cmd() -> Command {
    Command::cargo_bin("notecheck").unwrap()
}

/// Path to the reference note-taking binary the harness tests drive.
pub fn mock_target() -> PathBuf {
    assert_cmd::cargo::cargo_bin("mock_notes")
}

/// A suite document written to its own temporary directory. Keeps the
/// directory alive for as long as the path is needed.
pub struct SuiteFixture {
    _dir: TempDir,
    pub path: PathBuf,
}

/// Write a suite document built with `serde_json::json!` to disk.
pub fn write_suite(doc: &serde_json::Value) -> SuiteFixture {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("suite.json");
    fs::write(&path, serde_json::to_string_pretty(doc).unwrap()).unwrap();
    SuiteFixture { _dir: dir, path }
}

/// Write an executable shell script that stands in for the target binary,
/// for cases where the reference binary is too well-behaved to produce the
/// output under test.
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    fs::write(&path, body).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}
