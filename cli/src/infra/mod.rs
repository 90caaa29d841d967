//! Infrastructure layer: concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: process execution,
//! privilege escalation, filesystem access, YAML stores and certificate
//! issuing.
//!
//! Imports from `crate::domain` and `crate::application` are allowed.
//! Imports from `crate::commands` or `crate::output` are forbidden.

pub mod certs;
pub mod command_runner;
pub mod config;
pub mod fs;
pub mod paths;
pub mod privileged;
