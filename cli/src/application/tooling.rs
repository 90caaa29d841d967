//! Tool availability gate.
//!
//! One [`ToolHandle`] per external executable, owned by the composition
//! root and passed explicitly to the services that need it. The probe runs
//! at most once per handle; the cached answer is authoritative afterwards.

use std::cell::Cell;
use std::process::Output;

use anyhow::Result;

use crate::application::ports::CommandRunner;
use crate::domain::error::{CommandError, ToolError};

/// Cached probe result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    Unknown,
    Available,
    Missing,
}

/// Gate object for one external command-line dependency.
#[derive(Debug)]
pub struct ToolHandle {
    program: &'static str,
    probe_args: &'static [&'static str],
    missing_message: &'static str,
    availability: Cell<Availability>,
}

impl ToolHandle {
    #[must_use]
    pub const fn new(
        program: &'static str,
        probe_args: &'static [&'static str],
        missing_message: &'static str,
    ) -> Self {
        Self {
            program,
            probe_args,
            missing_message,
            availability: Cell::new(Availability::Unknown),
        }
    }

    /// The container engine CLI.
    #[must_use]
    pub const fn docker() -> Self {
        Self::new(
            "docker",
            &["-v"],
            "Docker is missing from the current environment. Please check https://docs.docker.com/engine/install/",
        )
    }

    /// The machine virtualization CLI.
    #[must_use]
    pub const fn docker_machine() -> Self {
        Self::new(
            "docker-machine",
            &["-v"],
            "Docker machine is missing from the current environment. Please check https://docs.docker.com/machine/install-machine/",
        )
    }

    /// The compose CLI.
    #[must_use]
    pub const fn docker_compose() -> Self {
        Self::new(
            "docker-compose",
            &["-v"],
            "Docker compose is missing from the current environment. Please check https://docs.docker.com/compose/install/",
        )
    }

    /// Executable name passed to the runner.
    #[must_use]
    pub fn program(&self) -> &'static str {
        self.program
    }

    /// Current cached state, without probing.
    #[must_use]
    pub fn availability(&self) -> Availability {
        self.availability.get()
    }

    /// Probe on first use, then fail with the install guidance whenever the
    /// cached answer is negative.
    ///
    /// A probe that cannot be spawned counts as missing.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::Unavailable`] when the tool is not usable.
    pub async fn ensure_available(&self, runner: &impl CommandRunner) -> Result<()> {
        if self.availability.get() == Availability::Unknown {
            let available = match runner.run(self.program, self.probe_args).await {
                Ok(output) => output.status.success(),
                Err(e) => {
                    tracing::debug!(program = self.program, error = %e, "tool probe failed");
                    false
                }
            };
            self.availability.set(if available {
                Availability::Available
            } else {
                Availability::Missing
            });
        }

        match self.availability.get() {
            Availability::Missing => Err(ToolError::Unavailable {
                tool: self.program.to_string(),
                message: self.missing_message.to_string(),
            }
            .into()),
            _ => Ok(()),
        }
    }
}

/// The three handles wired up at process start.
#[derive(Debug)]
pub struct Toolchain {
    pub docker: ToolHandle,
    pub machine: ToolHandle,
    pub compose: ToolHandle,
}

impl Default for Toolchain {
    fn default() -> Self {
        Self {
            docker: ToolHandle::docker(),
            machine: ToolHandle::docker_machine(),
            compose: ToolHandle::docker_compose(),
        }
    }
}

/// Pass `output` through when it exited zero; otherwise fail with the
/// captured streams.
///
/// # Errors
///
/// Returns [`CommandError::Failed`] for a non-zero or signalled exit.
pub fn ensure_success(program: &str, args: &[&str], output: Output) -> Result<Output> {
    if output.status.success() {
        return Ok(output);
    }
    let status = match output.status.code() {
        Some(code) => format!("exit code {code}"),
        None => "terminated by signal".to_string(),
    };
    Err(CommandError::Failed {
        program: program.to_string(),
        args: args.join(" "),
        status,
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    }
    .into())
}
