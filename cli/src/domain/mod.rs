//! Domain layer: pure types, parsers and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod config;
pub mod container;
pub mod error;
pub mod hosts;
pub mod machine;
pub mod workspace;

pub use config::{GlobalConfig, WorkspaceConfig, WorkspaceMachine};
pub use container::{ContainerField, ContainerRecord, ContainerStatus};
pub use error::{CommandError, PrivilegedError, ToolError, ValidationError, WorkspaceError};
pub use hosts::{HostsDocument, validate_address, validate_domain};
pub use machine::{MachineEnvironment, MachineField, MachineRecord, MachineState};
pub use workspace::{WorkspacePaths, locate_workspace_root};
