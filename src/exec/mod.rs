//! Command runner module
//!
//! Invokes the target binary once per entry in a test case's command list:
//! - builds the `-p <profile>` / `-f <folder>` argument prefix
//! - pipes staged stdin to invocations that have an entry for it
//! - sleeps `cmd_interval` before each invocation of a fragment-capture run
//! - captures stdout in invocation order for the fragment check modes
//!
//! Invocations are strictly sequential; there are no timeouts, so a hung
//! target blocks the harness.

use crate::models::TestCase;

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::thread;
use thiserror::Error;

/// Failure launching or waiting on the target binary.
#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("failed to launch {target}: {source}")]
    Spawn {
        target: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("command #{index} failed: {source}")]
    Wait {
        index: usize,
        #[source]
        source: std::io::Error,
    },
    #[error("command #{index} exited with {status}{}", format_stderr(.stderr))]
    ExitStatus {
        index: usize,
        status: ExitStatus,
        stderr: String,
    },
}

fn format_stderr(stderr: &str) -> String {
    let trimmed = stderr.trim_end();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(": {trimmed}")
    }
}

/// Directory handed to the target's `-f` flag for one case.
fn profile_dir(case: &TestCase, scratch: &Path) -> PathBuf {
    match &case.profile_folder {
        Some(folder) => scratch.join(folder),
        None => scratch.to_path_buf(),
    }
}

/// Run every command of `case` against `target`, in order.
///
/// Returns one captured stdout per invocation when `capture_stdout` is
/// set, an empty list otherwise. A non-zero exit status fails immediately
/// unless the case declares `should_fail`. The case's `cmd_interval`
/// paces captured runs only; profile-mode runs never sleep.
pub fn run_case(
    target: &Path,
    scratch: &Path,
    case: &TestCase,
    capture_stdout: bool,
) -> Result<Vec<String>, ExecutionError> {
    let folder = profile_dir(case, scratch);
    let mut outputs = Vec::new();

    for (index, args) in case.cmds.iter().enumerate() {
        if capture_stdout {
            if let Some(interval) = case.cmd_interval {
                thread::sleep(interval);
            }
        }

        let stdin_data = case.stdin.get(index).and_then(|entry| entry.as_deref());

        let mut command = Command::new(target);
        if let Some(profile) = &case.profile {
            command.args(["-p", profile]);
        }
        command.arg("-f").arg(&folder);
        command.args(args);
        command.stdin(if stdin_data.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        });
        command.stdout(if capture_stdout {
            Stdio::piped()
        } else {
            Stdio::null()
        });
        command.stderr(Stdio::piped());

        let mut child = command.spawn().map_err(|source| ExecutionError::Spawn {
            target: target.to_path_buf(),
            source,
        })?;

        if let Some(data) = stdin_data {
            if let Some(mut handle) = child.stdin.take() {
                // The target may exit without draining stdin; a broken pipe
                // here is its exit status's problem, not ours.
                let _ = handle.write_all(data.as_bytes());
            }
        }

        let output = child
            .wait_with_output()
            .map_err(|source| ExecutionError::Wait { index, source })?;

        if capture_stdout {
            outputs.push(String::from_utf8_lossy(&output.stdout).into_owned());
        }
        if !output.status.success() && !case.should_fail {
            return Err(ExecutionError::ExitStatus {
                index,
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
    }

    Ok(outputs)
}
