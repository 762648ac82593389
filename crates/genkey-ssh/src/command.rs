// ABOUTME: Runs external SSH tooling with a hard timeout.
// ABOUTME: Children are killed when the timeout elapses.

use crate::error::{Result, SshError};
use std::ffi::OsStr;
use std::process::{Output, Stdio};
use std::time::Duration;
use tokio::process::Command;

/// Run `program` with `args` and capture its output.
///
/// The exit status is not checked here; callers decide what a failure means.
///
/// # Errors
/// Returns `SshError::Spawn` if the program cannot be started and
/// `SshError::TimedOut` if it does not exit within `timeout`.
pub async fn run_command<I, S>(program: &str, args: I, timeout: Duration) -> Result<Output>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| SshError::Spawn {
            program: program.to_string(),
            source: e,
        })?;

    // Dropping the wait future on timeout drops the child, which kills it.
    match tokio::time::timeout(timeout, child.wait_with_output()).await {
        Ok(result) => result.map_err(|e| SshError::Spawn {
            program: program.to_string(),
            source: e,
        }),
        Err(_) => {
            tracing::warn!(program, timeout_secs = timeout.as_secs(), "External command timed out");
            Err(SshError::TimedOut {
                program: program.to_string(),
                timeout,
            })
        }
    }
}

/// Turn an unsuccessful `Output` into `SshError::CommandFailed`.
pub(crate) fn check_status(program: &str, output: Output) -> Result<Output> {
    if output.status.success() {
        Ok(output)
    } else {
        Err(SshError::CommandFailed {
            program: program.to_string(),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}
