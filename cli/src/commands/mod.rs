//! Command implementations

pub mod cert;
pub mod compose;
pub mod config;
pub mod domain;
pub mod hosts;
pub mod init;
pub mod machine;
pub mod ps;
pub mod version;
