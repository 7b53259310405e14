// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use tokio::process::Command;

use crate::error::ShellError;

/// Captured result of one `/bin/sh -c <command>` run.
///
/// A non-zero `exit_code` is not itself an error: a failing job command is
/// a normal outcome, recorded on the `Job` and rebroadcast. [`ShellError`]
/// is reserved for the process never having started at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

/// Run `command` under `/bin/sh -c`, awaiting completion and capturing its
/// output. A killed-by-signal process reports exit code -1.
pub async fn run(command: &str) -> Result<RunOutput, ShellError> {
    let output = Command::new("/bin/sh")
        .arg("-c")
        .arg(command)
        .output()
        .await
        .map_err(|source| ShellError::Spawn { command: command.to_string(), source })?;

    Ok(RunOutput {
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
