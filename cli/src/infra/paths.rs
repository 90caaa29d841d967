//! Platform locations: configuration directory and hosts file.

use std::path::PathBuf;

use anyhow::Result;

/// Overrides the global configuration file location.
pub const CONFIG_ENV: &str = "BLIP_CONFIG";

/// Overrides the hosts file location.
pub const HOSTS_FILE_ENV: &str = "BLIP_HOSTS_FILE";

const APP_DIR: &str = "blip";

/// Per-user configuration directory.
///
/// `$XDG_CONFIG_HOME` itself when set, otherwise `%LOCALAPPDATA%\blip` on Windows
/// and `~/.config/blip` elsewhere.
///
/// # Errors
///
/// Returns an error if no home directory can be determined.
pub fn config_dir() -> Result<PathBuf> {
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(xdg));
    }
    #[cfg(windows)]
    if let Some(local) = dirs::data_local_dir() {
        return Ok(local.join(APP_DIR));
    }
    let home =
        dirs::home_dir().ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
    Ok(home.join(".config").join(APP_DIR))
}

/// The system hosts file, or `$BLIP_HOSTS_FILE` when set.
#[must_use]
pub fn hosts_path() -> PathBuf {
    if let Some(path) = std::env::var_os(HOSTS_FILE_ENV).filter(|v| !v.is_empty()) {
        return PathBuf::from(path);
    }
    if cfg!(windows) {
        PathBuf::from(r"C:\Windows\System32\drivers\etc\hosts")
    } else {
        PathBuf::from("/etc/hosts")
    }
}
