//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use thiserror::Error;

// ── Tool errors ───────────────────────────────────────────────────────────────

/// Errors raised by the tool availability gate.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The external executable is missing or its probe failed.
    #[error("{message}")]
    Unavailable {
        /// Program name, e.g. `docker-machine`.
        tool: String,
        /// Install guidance shown to the operator.
        message: String,
    },
}

// ── Validation errors ─────────────────────────────────────────────────────────

/// Malformed arguments, rejected before any state is touched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("'{0}' is not a valid dns name")]
    InvalidDomain(String),

    #[error("'{0}' must be a valid ip address")]
    InvalidAddress(String),

    #[error("machine name must be set")]
    EmptyMachineName,

    #[error("Unknown field '{field}'\n\nValid fields: {valid}")]
    UnknownField { field: String, valid: String },
}

// ── Workspace errors ──────────────────────────────────────────────────────────

/// Errors related to workspace membership and its machines.
#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("Not in a blip workspace. Run 'blip init' to create one.")]
    NotAWorkspace,

    #[error("Machine '{0}' is not part of this workspace.")]
    MachineNotFound(String),

    #[error("No default machine set. Pass --machine or create one with 'blip machine create'.")]
    NoDefaultMachine,

    #[error("Cannot determine the address of machine '{0}' from its DOCKER_HOST.")]
    NoMachineAddress(String),
}

// ── Subprocess errors ─────────────────────────────────────────────────────────

/// An external invocation exited non-zero.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{program} {args} failed ({status})\n{stderr}{stdout}")]
    Failed {
        program: String,
        args: String,
        /// Human readable exit status (`exit code 1`, `signal`).
        status: String,
        stdout: String,
        stderr: String,
    },
}

// ── Privileged helper errors ──────────────────────────────────────────────────

/// The privilege-escalation path itself failed.
#[derive(Debug, Error)]
pub enum PrivilegedError {
    #[error("privileged command failed (exit code {code}): {stderr}")]
    Failed {
        code: i32,
        stdout: String,
        stderr: String,
    },

    #[error("privilege escalation is not supported on this platform")]
    Unsupported,
}
