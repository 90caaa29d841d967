//! Per-domain TLS certificate provisioning.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::workspace::require_workspace;
use crate::application::ports::{CertificateIssuer, LocalFs};
use crate::domain::validate_domain;
use crate::domain::workspace::CERTS_DIR;

/// Where a certificate is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CertScope {
    /// `<config_dir>/certs`, shared by all workspaces.
    Global,
    /// `<workspace>/.blip/certs`.
    Workspace,
}

/// Directory holding certificates for `scope`.
///
/// # Errors
///
/// Returns [`crate::domain::WorkspaceError::NotAWorkspace`] for the
/// workspace scope outside a workspace.
pub fn certs_dir(
    fs: &impl LocalFs,
    scope: CertScope,
    config_dir: &Path,
    cwd: &Path,
) -> Result<PathBuf> {
    match scope {
        CertScope::Global => Ok(config_dir.join(CERTS_DIR)),
        CertScope::Workspace => Ok(require_workspace(fs, cwd)?.certs_dir()),
    }
}

/// `<dir>/<domain>.key` and `<dir>/<domain>.crt`.
#[must_use]
pub fn certificate_files(dir: &Path, domain: &str) -> (PathBuf, PathBuf) {
    (
        dir.join(format!("{domain}.key")),
        dir.join(format!("{domain}.crt")),
    )
}

/// Whether both the key and certificate for `domain` exist in `dir`.
///
/// # Errors
///
/// Returns an error if `domain` is not a valid name.
pub fn domain_certificate_exists(fs: &impl LocalFs, dir: &Path, domain: &str) -> Result<bool> {
    validate_domain(domain)?;
    let (key, crt) = certificate_files(dir, domain);
    Ok(fs.exists(&key) && fs.exists(&crt))
}

/// Issue a self-signed certificate for `domain` into `dir`, creating `dir`
/// as needed. Existing files are overwritten.
///
/// # Errors
///
/// Returns an error if `domain` is invalid, `dir` cannot be created, or
/// issuing fails.
pub fn create_domain_certificate(
    fs: &impl LocalFs,
    issuer: &impl CertificateIssuer,
    dir: &Path,
    domain: &str,
) -> Result<()> {
    validate_domain(domain)?;
    fs.create_dir_all(dir)
        .with_context(|| format!("creating {}", dir.display()))?;
    issuer
        .issue(domain, dir)
        .with_context(|| format!("issuing certificate for {domain}"))
}
