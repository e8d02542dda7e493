//! Subprocess execution utilities.

use std::io;
use std::process::Output;
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Result of a command execution.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal)
    pub exit_code: Option<i32>,
    /// Standard output
    pub stdout: String,
    /// Standard error
    pub stderr: String,
    /// Whether the command succeeded (exit code 0)
    pub success: bool,
}

impl CommandResult {
    /// Create from std::process::Output.
    pub fn from_output(output: &Output) -> Self {
        Self {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
        }
    }
}

/// Errors raised while running a command.
#[derive(Debug, Error)]
pub enum SubprocessError {
    #[error("failed to spawn `{cmd}`: {source}")]
    Spawn {
        cmd: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to wait for `{cmd}`: {source}")]
    Wait {
        cmd: String,
        #[source]
        source: io::Error,
    },

    #[error("`{cmd}` timed out after {timeout:?}")]
    TimedOut { cmd: String, timeout: Duration },
}

fn shell(cmd: &str) -> duct::Expression {
    if cfg!(target_os = "windows") {
        duct::cmd("cmd", ["/C", cmd])
    } else {
        duct::cmd("sh", ["-c", cmd])
    }
}

/// Run a shell command, feed `input` on stdin and wait at most `timeout`.
///
/// A non-zero exit status is reported through [`CommandResult::success`],
/// not as an error.
pub fn run_command_with_input(
    cmd: &str,
    input: &[u8],
    envs: &[(&str, &str)],
    timeout: Duration,
) -> Result<CommandResult, SubprocessError> {
    let expression = envs
        .iter()
        .fold(shell(cmd), |expr, &(key, value)| expr.env(key, value))
        .stdin_bytes(input.to_vec())
        .stdout_capture()
        .stderr_capture()
        .unchecked();

    let handle = expression.start().map_err(|source| SubprocessError::Spawn {
        cmd: cmd.to_string(),
        source,
    })?;

    let start = Instant::now();
    loop {
        match handle.try_wait() {
            Ok(Some(output)) => return Ok(CommandResult::from_output(output)),
            Ok(None) => {
                if start.elapsed() > timeout {
                    let _ = handle.kill();
                    return Err(SubprocessError::TimedOut {
                        cmd: cmd.to_string(),
                        timeout,
                    });
                }
                thread::sleep(Duration::from_millis(10));
            }
            Err(source) => {
                return Err(SubprocessError::Wait {
                    cmd: cmd.to_string(),
                    source,
                });
            }
        }
    }
}
