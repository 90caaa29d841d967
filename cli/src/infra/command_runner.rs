//! Infrastructure implementation of the `CommandRunner` port.
//!
//! `TokioCommandRunner` spawns the child with piped stdout/stderr and drains
//! both concurrently while waiting for exit, so a chatty tool cannot block
//! on a full pipe.

use std::process::{Output, Stdio};

use anyhow::{Context, Result};
use tokio::io::AsyncReadExt;
use tokio::process::Command;

use crate::application::ports::CommandRunner;
use crate::domain::MachineEnvironment;

/// Production `CommandRunner` backed by `tokio::process`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioCommandRunner;

impl TokioCommandRunner {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    async fn capture(program: &str, mut command: Command) -> Result<Output> {
        let mut child = command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("failed to spawn {program}"))?;

        let mut stdout_handle = child.stdout.take();
        let mut stderr_handle = child.stderr.take();

        let (status, stdout, stderr) = tokio::join!(
            child.wait(),
            async {
                let mut buf = Vec::new();
                if let Some(ref mut h) = stdout_handle {
                    let _ = h.read_to_end(&mut buf).await;
                }
                buf
            },
            async {
                let mut buf = Vec::new();
                if let Some(ref mut h) = stderr_handle {
                    let _ = h.read_to_end(&mut buf).await;
                }
                buf
            },
        );

        let status = status.with_context(|| format!("waiting for {program}"))?;
        tracing::debug!(program, ?status, "tool exited");
        Ok(Output {
            status,
            stdout,
            stderr,
        })
    }
}

impl CommandRunner for TokioCommandRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output> {
        let mut command = Command::new(program);
        command.args(args);
        Self::capture(program, command).await
    }

    async fn run_with_env(
        &self,
        program: &str,
        args: &[&str],
        env: &MachineEnvironment,
    ) -> Result<Output> {
        let mut command = Command::new(program);
        command.args(args).envs(env.iter());
        Self::capture(program, command).await
    }
}
