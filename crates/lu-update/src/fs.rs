//! Filesystem seam for the rename swaps, plus the derived artifact paths

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

/// Suffix of the retained previous executable
pub const BACKUP_SUFFIX: &str = ".backup";

/// Suffix of the binary moved aside during a rollback
pub const ROLLBACK_TEMP_SUFFIX: &str = ".tmp";

/// The filesystem operations the installer and rollback perform on the
/// executable path
pub trait SwapFs {
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_file(path)
    }
}

/// The real filesystem
#[derive(Debug, Default, Clone, Copy)]
pub struct OsFs;

impl SwapFs for OsFs {
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        std::fs::rename(from, to)
    }
}

impl<T: SwapFs + ?Sized> SwapFs for &T {
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        (**self).rename(from, to)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        (**self).remove_file(path)
    }
}

/// `<executable>.backup`
pub fn backup_path(executable: &Path) -> PathBuf {
    with_suffix(executable, BACKUP_SUFFIX)
}

/// `<executable>.tmp`
pub fn rollback_temp_path(executable: &Path) -> PathBuf {
    with_suffix(executable, ROLLBACK_TEMP_SUFFIX)
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}
