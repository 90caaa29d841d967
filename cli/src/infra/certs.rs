//! Infrastructure implementation of the `CertificateIssuer` port using rcgen.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Datelike, Duration, Utc};
use rcgen::{CertificateParams, DistinguishedName, DnType, KeyPair};

use crate::application::ports::CertificateIssuer;
use crate::application::services::certs::certificate_files;

/// Validity of issued certificates.
pub const VALIDITY_DAYS: i64 = 730;

/// Issues self-signed leaf certificates with CN and SAN set to the domain.
#[derive(Debug, Default, Clone, Copy)]
pub struct RcgenIssuer;

impl RcgenIssuer {
    /// PEM encoded `(certificate, private key)` for `domain`.
    ///
    /// # Errors
    ///
    /// Returns an error if key generation or signing fails.
    pub fn generate(domain: &str) -> Result<(String, String)> {
        let mut params = CertificateParams::new(vec![domain.to_string()])
            .with_context(|| format!("invalid certificate name {domain}"))?;
        let mut dn = DistinguishedName::new();
        dn.push(DnType::CommonName, domain);
        params.distinguished_name = dn;

        let now = Utc::now();
        let expiry = now + Duration::days(VALIDITY_DAYS);
        #[allow(clippy::cast_possible_truncation)] // month and day always fit in u8
        let ymd = |at: chrono::DateTime<Utc>| {
            rcgen::date_time_ymd(at.year(), at.month() as u8, at.day() as u8)
        };
        params.not_before = ymd(now);
        params.not_after = ymd(expiry);

        let key_pair = KeyPair::generate().context("generating key pair")?;
        let cert = params
            .self_signed(&key_pair)
            .context("self-signing certificate")?;
        Ok((cert.pem(), key_pair.serialize_pem()))
    }
}

impl CertificateIssuer for RcgenIssuer {
    fn issue(&self, domain: &str, dir: &Path) -> Result<()> {
        let (cert_pem, key_pem) = Self::generate(domain)?;
        let (key_path, cert_path) = certificate_files(dir, domain);
        write_private_key(&key_path, &key_pem)
            .with_context(|| format!("cannot write {}", key_path.display()))?;
        std::fs::write(&cert_path, cert_pem)
            .with_context(|| format!("cannot write {}", cert_path.display()))?;
        tracing::info!(domain, dir = %dir.display(), "issued certificate");
        Ok(())
    }
}

/// Write `pem` to `path`, readable by the owner only from creation on.
fn write_private_key(path: &Path, pem: &str) -> std::io::Result<()> {
    let mut options = std::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
        options.mode(0o600);
        let file = options.open(path)?;
        // `mode` only applies to new files; narrow a replaced key too.
        file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
        write_all(file, pem)
    }
    #[cfg(not(unix))]
    {
        write_all(options.open(path)?, pem)
    }
}

fn write_all(mut file: std::fs::File, pem: &str) -> std::io::Result<()> {
    file.write_all(pem.as_bytes())?;
    file.sync_all()
}
