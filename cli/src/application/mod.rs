//! Application layer: port trait definitions, the tool gate and use-case
//! orchestration.
//!
//! This module depends only on `crate::domain`: never on `crate::infra`,
//! `crate::commands`, or `crate::output`.

pub mod ports;
pub mod services;
pub mod tooling;

pub use ports::{
    CertificateIssuer, CommandRunner, ConfigStore, LocalFs, PrivilegedExecutor, PrivilegedOutput,
    ProgressReporter, WorkspaceStore,
};
pub use tooling::{Availability, ToolHandle, Toolchain};
