//! Shared path helpers for lu-hut crates

use crate::error::{Error, Result};
use std::fs;
use std::path::PathBuf;

/// Name of the per-user state directory under the home directory
pub const STATE_DIR_NAME: &str = ".lu-hut";

/// Get the user's home directory
///
/// `$HOME` wins over `dirs::home_dir()` so that tests and containers can
/// redirect the state directory with a plain environment override.
pub fn get_home_dir() -> Result<PathBuf> {
    if let Some(home) = std::env::var_os("HOME").filter(|h| !h.is_empty()) {
        return Ok(PathBuf::from(home));
    }

    dirs::home_dir().ok_or(Error::NoHomeDir)
}

/// Get the per-user state directory (`~/.lu-hut`), creating it if absent
pub fn state_dir() -> Result<PathBuf> {
    let dir = get_home_dir()?.join(STATE_DIR_NAME);
    if !dir.exists() {
        fs::create_dir_all(&dir)?;
    }
    Ok(dir)
}
