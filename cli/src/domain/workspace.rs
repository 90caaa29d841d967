//! Workspace root discovery.
//!
//! This module is intentionally free of I/O: the filesystem check is passed
//! in as a predicate so the search itself stays pure.

use std::path::{Path, PathBuf};

/// Workspace definition file, e.g. `<root>/blip.yml`.
pub const WORKSPACE_FILE: &str = "blip.yml";

/// Workspace state directory, e.g. `<root>/.blip`.
pub const WORKSPACE_STATE_DIR: &str = ".blip";

/// Certificates directory under the state directory or the config directory.
pub const CERTS_DIR: &str = "certs";

/// Find the nearest ancestor of `start` (inclusive) accepted by `is_root`.
///
/// Returns `start` unchanged when no ancestor qualifies. Callers must check
/// membership separately before trusting paths derived from the result.
#[must_use]
pub fn locate_workspace_root(start: &Path, is_root: impl Fn(&Path) -> bool) -> PathBuf {
    start
        .ancestors()
        .find(|dir| is_root(dir))
        .unwrap_or(start)
        .to_path_buf()
}

/// Paths derived from a workspace root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspacePaths {
    pub root: PathBuf,
}

impl WorkspacePaths {
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// `<root>/blip.yml`
    #[must_use]
    pub fn config_file(&self) -> PathBuf {
        self.root.join(WORKSPACE_FILE)
    }

    /// `<root>/.blip`
    #[must_use]
    pub fn state_dir(&self) -> PathBuf {
        self.root.join(WORKSPACE_STATE_DIR)
    }

    /// `<root>/.blip/certs`
    #[must_use]
    pub fn certs_dir(&self) -> PathBuf {
        self.state_dir().join(CERTS_DIR)
    }
}
