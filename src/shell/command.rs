//! External command execution.
//!
//! All invocations are blocking and have no timeout; a hung tool hangs
//! the run.

use crate::error::{ProbeError, Result};
use crate::probe::ProbeLog;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

/// Result of executing an external command.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Standard output.
    pub stdout: String,

    /// Standard error.
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether command succeeded (exit code 0).
    pub success: bool,
}

impl CommandResult {
    /// Create a success result.
    pub fn success(stdout: String, stderr: String, duration: Duration) -> Self {
        Self {
            exit_code: Some(0),
            stdout,
            stderr,
            duration,
            success: true,
        }
    }

    /// Create a failure result.
    pub fn failure(
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
        duration: Duration,
    ) -> Self {
        Self {
            exit_code,
            stdout,
            stderr,
            duration,
            success: false,
        }
    }
}

/// Run `program` with `args`, capturing both output streams.
///
/// Fails only if the process could not be launched; a non-zero exit is
/// reported through [`CommandResult::success`].
pub fn execute(program: &str, args: &[String]) -> Result<CommandResult> {
    let start = Instant::now();

    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .map_err(|e| {
            tracing::debug!("Failed to launch {}: {}", program, e);
            ProbeError::ToolInvocationFailure {
                command: program.to_string(),
                code: None,
            }
        })?;

    let duration = start.elapsed();
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    tracing::debug!("{} finished in {:?}", program, duration);

    if output.status.success() {
        Ok(CommandResult::success(stdout, stderr, duration))
    } else {
        Ok(CommandResult::failure(
            output.status.code(),
            stdout,
            stderr,
            duration,
        ))
    }
}

/// Run a command line through the platform shell.
pub fn execute_shell(command: &str) -> Result<CommandResult> {
    let (shell, flag) = shell();
    execute(&shell, &[flag.to_string(), command.to_string()])
}

/// Runs helper commands embedded in flag expressions.
pub trait CommandRunner {
    /// Run `command` and return its standard output.
    ///
    /// Any failure to launch the command or a non-zero exit yields
    /// [`ProbeError::ToolInvocationFailure`].
    fn capture_stdout(&self, log: &mut ProbeLog, command: &str) -> Result<String>;
}

/// [`CommandRunner`] that hands the command to the system shell.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellRunner;

impl CommandRunner for ShellRunner {
    fn capture_stdout(&self, log: &mut ProbeLog, command: &str) -> Result<String> {
        log.line(format_args!("Executing: {}", command));
        let result = execute_shell(command).inspect_err(|_| {
            log.line(format_args!("Failed to execute \"{}\"", command));
        })?;

        if !result.stderr.trim().is_empty() {
            log.block(&result.stderr);
        }

        if result.success {
            Ok(result.stdout.trim_end_matches(['\n', '\r']).to_string())
        } else {
            log.line(format_args!(
                "Execution failed with exit code {:?}",
                result.exit_code
            ));
            Err(ProbeError::ToolInvocationFailure {
                command: command.to_string(),
                code: result.exit_code,
            })
        }
    }
}

/// Shell program and the flag that passes it a command string.
fn shell() -> (String, &'static str) {
    if cfg!(target_os = "windows") {
        (
            std::env::var("COMSPEC").unwrap_or_else(|_| "cmd.exe".to_string()),
            "/C",
        )
    } else {
        ("/bin/sh".to_string(), "-c")
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn execute_successful_command() {
        let result = execute("echo", &["hello".to_string()]).unwrap();

        assert!(result.success);
        assert_eq!(result.exit_code, Some(0));
        assert!(result.stdout.contains("hello"));
    }

    #[test]
    fn execute_failing_command() {
        let result = execute_shell("exit 3").unwrap();

        assert!(!result.success);
        assert_eq!(result.exit_code, Some(3));
    }

    #[test]
    fn execute_missing_program_is_invocation_failure() {
        let err = execute("/nonexistent/sdl-config", &[]).unwrap_err();
        assert!(matches!(err, ProbeError::ToolInvocationFailure { .. }));
    }

    #[test]
    fn shell_runner_strips_trailing_newline() {
        let mut log = ProbeLog::memory();
        let out = ShellRunner.capture_stdout(&mut log, "echo -lz").unwrap();
        assert_eq!(out, "-lz");
        assert!(log.contains("Executing: echo -lz"));
    }

    #[test]
    fn shell_runner_reports_nonzero_exit() {
        let mut log = ProbeLog::memory();
        let err = ShellRunner
            .capture_stdout(&mut log, "echo oops >&2; exit 1")
            .unwrap_err();

        assert!(matches!(
            err,
            ProbeError::ToolInvocationFailure { code: Some(1), .. }
        ));
        assert!(log.contains("oops"));
    }
}
