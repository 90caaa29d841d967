//! Infrastructure implementation of the `PrivilegedExecutor` port.
//!
//! On unix the command line runs under `sudo sh -c`, inheriting the
//! terminal so sudo can prompt for credentials. Other platforms report
//! [`PrivilegedError::Unsupported`].

use anyhow::Result;

use crate::application::ports::{PrivilegedExecutor, PrivilegedOutput};
#[cfg(not(unix))]
use crate::domain::error::PrivilegedError;

/// Escalates through `sudo`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SudoExecutor;

impl PrivilegedExecutor for SudoExecutor {
    #[cfg(unix)]
    async fn exec(&self, command_line: &str) -> Result<PrivilegedOutput> {
        use std::process::Stdio;

        use anyhow::Context;

        tracing::info!(command_line, "running with sudo");
        let output = tokio::process::Command::new("sudo")
            .args(["sh", "-c", command_line])
            .stdin(Stdio::inherit())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .context("failed to spawn sudo")?;

        Ok(PrivilegedOutput {
            code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    #[cfg(not(unix))]
    async fn exec(&self, _command_line: &str) -> Result<PrivilegedOutput> {
        Err(PrivilegedError::Unsupported.into())
    }
}
