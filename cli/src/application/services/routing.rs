//! Domain routing: hosts mappings, certificates and workspace bookkeeping
//! for hostnames served by a machine.

use std::path::Path;

use anyhow::Result;

use super::certs::{create_domain_certificate, domain_certificate_exists};
use super::hosts::HostsFile;
use super::machine::{self, DEFAULT_SHELL};
use super::workspace::{overwrite_workspace, read_workspace, resolve_machine};
use crate::application::ports::{
    CertificateIssuer, CommandRunner, LocalFs, PrivilegedExecutor, ProgressReporter,
    WorkspaceStore,
};
use crate::application::tooling::ToolHandle;
use crate::domain::error::WorkspaceError;
use crate::domain::validate_domain;

/// Everything a routing change touches.
pub struct DomainRouter<'a, R, F, P, W, I, Rep> {
    pub runner: &'a R,
    pub fs: &'a F,
    pub sudo: &'a P,
    pub store: &'a W,
    pub issuer: &'a I,
    pub reporter: Rep,
    pub machine_tool: &'a ToolHandle,
    pub hosts_path: &'a Path,
    pub cwd: &'a Path,
}

/// What `bind_domain` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindOutcome {
    pub machine: String,
    pub address: String,
    /// Address the domain pointed at before, when it differed.
    pub replaced: Option<String>,
    pub certificate_issued: bool,
}

impl<R, F, P, W, I, Rep> DomainRouter<'_, R, F, P, W, I, Rep>
where
    R: CommandRunner,
    F: LocalFs,
    P: PrivilegedExecutor,
    W: WorkspaceStore,
    I: CertificateIssuer,
    Rep: ProgressReporter,
{
    /// Point `domain` at a workspace machine (`machine` or the default).
    ///
    /// # Errors
    ///
    /// Fails before touching any state when the domain is invalid, the
    /// current directory is not a workspace, or the machine is unknown.
    pub async fn bind_domain(&self, machine: Option<&str>, domain: &str) -> Result<BindOutcome> {
        validate_domain(domain)?;
        let (paths, mut config) = read_workspace(self.fs, self.store, self.cwd)?;
        let machine_name = resolve_machine(&config, machine)?;

        let env = machine::env(self.runner, self.machine_tool, &machine_name, DEFAULT_SHELL).await?;
        let address = env
            .machine_address()
            .ok_or_else(|| WorkspaceError::NoMachineAddress(machine_name.clone()))?
            .to_string();

        let mut hosts = HostsFile::load(self.fs, self.sudo, self.hosts_path).await?;
        let previous = hosts.document().address(domain)?.map(str::to_string);
        let replaced = match previous {
            Some(ref old) if *old == address => None,
            Some(old) => {
                self.reporter
                    .warn(&format!("{domain} pointed at {old}, remapping to {address}"));
                hosts.document_mut().remove_domain(domain)?;
                Some(old)
            }
            None => None,
        };
        if hosts.document().address(domain)?.is_none() {
            hosts.document_mut().add_mapping(domain, &address)?;
            self.reporter
                .step(&format!("mapping {domain} to {address} in {}", self.hosts_path.display()));
            hosts.flush(self.fs, self.sudo).await?;
        }

        let certs = paths.certs_dir();
        let certificate_issued = if domain_certificate_exists(self.fs, &certs, domain)? {
            false
        } else {
            self.reporter
                .step(&format!("issuing certificate for {domain} in {}", certs.display()));
            create_domain_certificate(self.fs, self.issuer, &certs, domain)?;
            true
        };

        for (name, entry) in &mut config.machines {
            if *name == machine_name {
                if !entry.domains.iter().any(|d| d == domain) {
                    entry.domains.push(domain.to_string());
                }
            } else {
                entry.domains.retain(|d| d != domain);
            }
        }
        overwrite_workspace(self.store, &paths, &config)?;

        Ok(BindOutcome {
            machine: machine_name,
            address,
            replaced,
            certificate_issued,
        })
    }

    /// Remove `domain` from the hosts file and from every workspace machine.
    ///
    /// Returns `false` when the domain was not routed anywhere.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid domain, outside a workspace, or when
    /// the hosts file cannot be read or written.
    pub async fn unbind_domain(&self, domain: &str) -> Result<bool> {
        validate_domain(domain)?;
        let (paths, mut config) = read_workspace(self.fs, self.store, self.cwd)?;

        let mut hosts = HostsFile::load(self.fs, self.sudo, self.hosts_path).await?;
        let in_hosts = hosts.document().address(domain)?.is_some();
        if in_hosts {
            hosts.document_mut().remove_domain(domain)?;
            hosts.flush(self.fs, self.sudo).await?;
        }

        let mut in_workspace = false;
        for entry in config.machines.values_mut() {
            let before = entry.domains.len();
            entry.domains.retain(|d| d != domain);
            in_workspace |= entry.domains.len() != before;
        }
        if in_workspace {
            overwrite_workspace(self.store, &paths, &config)?;
        }

        Ok(in_hosts || in_workspace)
    }

    /// Drop machine `name` from the workspace and unmap its domains.
    ///
    /// Returns the domains that were unmapped. A machine unknown to the
    /// workspace is left alone.
    ///
    /// # Errors
    ///
    /// Returns an error outside a workspace or when the hosts file or the
    /// workspace definition cannot be updated.
    pub async fn forget_machine(&self, name: &str) -> Result<Vec<String>> {
        let (paths, mut config) = read_workspace(self.fs, self.store, self.cwd)?;
        let Some(entry) = config.machines.remove(name) else {
            return Ok(Vec::new());
        };
        if config.default_machine.as_deref() == Some(name) {
            config.default_machine = None;
        }

        if !entry.domains.is_empty() {
            let mut hosts = HostsFile::load(self.fs, self.sudo, self.hosts_path).await?;
            for domain in &entry.domains {
                hosts.document_mut().remove_domain(domain)?;
            }
            hosts.flush(self.fs, self.sudo).await?;
        }

        overwrite_workspace(self.store, &paths, &config)?;
        Ok(entry.domains)
    }
}
