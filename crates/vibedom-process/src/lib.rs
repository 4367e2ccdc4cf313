//! Synchronous child process execution shared by the runtime adapter and the
//! git bundle pipeline.
//!
//! The host controller is a straightforward, largely synchronous
//! orchestrator: each command spawns a child (the container runtime CLI, or
//! `git`), waits for it, and inspects its exit status before moving on. No
//! internal task parallelism is required on the host side, so this crate
//! wraps `std::process::Command` rather than an async runtime.

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;
use std::process::Command;

const MAX_SUMMARY_LEN: usize = 200;

/// Captured result of running a child process to completion.
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionResult {
    pub stdout: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub stderr: String,
    pub summary: String,
    pub exit_code: i32,
}

impl ExecutionResult {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Run `program` with `args` in `cwd` (or the current directory), capturing
/// stdout/stderr and the exit code. A process killed by a signal is reported
/// with exit code 128 + signal number, matching shell convention; one that
/// could not be spawned at all is surfaced as an `Err`.
pub fn run_and_capture(program: &str, args: &[&str], cwd: Option<&Path>) -> Result<ExecutionResult> {
    let mut command = Command::new(program);
    command.args(args);
    if let Some(cwd) = cwd {
        command.current_dir(cwd);
    }
    let output = command
        .output()
        .with_context(|| format!("failed to spawn '{program}'"))?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
    let exit_code = exit_code_of(&output.status);
    let summary = if exit_code == 0 {
        extract_summary(&stdout, &stderr)
    } else {
        failure_summary(&stderr, &stdout, exit_code)
    };

    tracing::debug!(program, exit_code, "child process exited");

    Ok(ExecutionResult {
        stdout,
        stderr,
        summary,
        exit_code,
    })
}

fn exit_code_of(status: &std::process::ExitStatus) -> i32 {
    match status.code() {
        Some(code) => code,
        None => {
            #[cfg(unix)]
            {
                use std::os::unix::process::ExitStatusExt;
                128 + status.signal().unwrap_or(0)
            }
            #[cfg(not(unix))]
            {
                1
            }
        }
    }
}

fn extract_summary(stdout: &str, stderr: &str) -> String {
    if let Some(line) = last_non_empty_line(stdout) {
        return truncate_line(line);
    }
    if let Some(line) = last_non_empty_line(stderr) {
        return truncate_line(line);
    }
    "(no output)".to_string()
}

fn failure_summary(stderr: &str, stdout: &str, exit_code: i32) -> String {
    if let Some(line) = last_non_empty_line(stderr) {
        return truncate_line(line);
    }
    if let Some(line) = last_non_empty_line(stdout) {
        return truncate_line(line);
    }
    format!("exit code {exit_code}")
}

fn last_non_empty_line(text: &str) -> Option<&str> {
    text.lines().rev().find(|line| !line.trim().is_empty())
}

fn truncate_line(line: &str) -> String {
    if line.chars().count() <= MAX_SUMMARY_LEN {
        line.to_string()
    } else {
        let truncated: String = line.chars().take(MAX_SUMMARY_LEN).collect();
        format!("{truncated}...")
    }
}

/// Check whether `program` resolves on `PATH` without running it.
pub fn is_on_path(program: &str) -> bool {
    which::which(program).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_and_capture_reports_success() {
        let result = run_and_capture("true", &[], None).unwrap();
        assert!(result.success());
        assert_eq!(result.exit_code, 0);
    }

    #[test]
    fn run_and_capture_reports_nonzero_exit() {
        let result = run_and_capture("false", &[], None).unwrap();
        assert!(!result.success());
        assert_eq!(result.exit_code, 1);
    }

    #[test]
    fn run_and_capture_collects_stdout() {
        let result = run_and_capture("echo", &["hello"], None).unwrap();
        assert_eq!(result.stdout.trim(), "hello");
        assert_eq!(result.summary, "hello");
    }

    #[test]
    fn run_and_capture_errors_on_missing_binary() {
        let result = run_and_capture("definitely-not-a-real-binary-xyz", &[], None);
        assert!(result.is_err());
    }

    #[test]
    fn run_and_capture_respects_cwd() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("marker.txt"), "x").unwrap();
        let result = run_and_capture("ls", &[], Some(dir.path())).unwrap();
        assert!(result.stdout.contains("marker.txt"));
    }

    #[test]
    fn truncate_line_leaves_short_lines_untouched() {
        assert_eq!(truncate_line("short"), "short");
    }

    #[test]
    fn truncate_line_truncates_long_lines() {
        let long = "a".repeat(250);
        let truncated = truncate_line(&long);
        assert!(truncated.ends_with("..."));
        assert_eq!(truncated.chars().count(), MAX_SUMMARY_LEN + 3);
    }

    #[test]
    fn failure_summary_prefers_stderr() {
        assert_eq!(failure_summary("boom\n", "ok\n", 1), "boom");
    }

    #[test]
    fn failure_summary_falls_back_to_exit_code() {
        assert_eq!(failure_summary("", "", 7), "exit code 7");
    }

    #[test]
    fn is_on_path_finds_common_utility() {
        assert!(is_on_path("ls") || is_on_path("cmd"));
    }

    #[test]
    fn is_on_path_rejects_bogus_name() {
        assert!(!is_on_path("definitely-not-a-real-binary-xyz"));
    }
}
