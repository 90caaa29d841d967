//! Hosts file load/flush with a privileged fallback.
//!
//! `HostsFile::load` tries a direct read and, when that fails (usually a
//! permissions error), asks the privileged helper to print the file. `flush`
//! mirrors this for writes, passing the whole serialized document inline.
//! There is no autosave and no locking: the last flush wins.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::application::ports::{LocalFs, PrivilegedExecutor, PrivilegedOutput};
use crate::domain::error::PrivilegedError;
use crate::domain::HostsDocument;

/// A loaded hosts document bound to the file it came from.
#[derive(Debug, Clone)]
pub struct HostsFile {
    path: PathBuf,
    document: HostsDocument,
}

impl HostsFile {
    /// Read and parse the hosts file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error when both the direct read and the privileged read fail.
    pub async fn load(
        fs: &impl LocalFs,
        sudo: &impl PrivilegedExecutor,
        path: &Path,
    ) -> Result<Self> {
        let text = match fs.read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                tracing::info!(path = %path.display(), error = %e, "direct hosts read failed, escalating");
                let output = sudo
                    .exec(&read_command(path))
                    .await
                    .with_context(|| format!("reading {} with elevated privileges", path.display()))?;
                check_privileged(output)?.stdout
            }
        };
        Ok(Self {
            path: path.to_path_buf(),
            document: HostsDocument::parse(&text),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn document(&self) -> &HostsDocument {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut HostsDocument {
        &mut self.document
    }

    /// Write the document back, escalating when the direct write fails.
    ///
    /// # Errors
    ///
    /// Returns an error when both the direct write and the privileged write fail.
    pub async fn flush(&self, fs: &impl LocalFs, sudo: &impl PrivilegedExecutor) -> Result<()> {
        let content = self.document.serialize();
        if let Err(e) = fs.write(&self.path, &content) {
            tracing::info!(path = %self.path.display(), error = %e, "direct hosts write failed, escalating");
            let output = sudo
                .exec(&write_command(&self.path, &content))
                .await
                .with_context(|| format!("writing {} with elevated privileges", self.path.display()))?;
            check_privileged(output)?;
        }
        Ok(())
    }
}

/// Shell command that prints `path`.
#[must_use]
pub fn read_command(path: &Path) -> String {
    format!("cat {}", shell_words::quote(&path.to_string_lossy()))
}

/// Shell command that replaces `path` with `content`.
#[must_use]
pub fn write_command(path: &Path, content: &str) -> String {
    format!(
        "printf '%s' {} > {}",
        shell_words::quote(content),
        shell_words::quote(&path.to_string_lossy())
    )
}

fn check_privileged(output: PrivilegedOutput) -> Result<PrivilegedOutput> {
    if output.code == 0 {
        Ok(output)
    } else {
        Err(PrivilegedError::Failed {
            code: output.code,
            stdout: output.stdout,
            stderr: output.stderr,
        }
        .into())
    }
}
