//! Atomic binary replacement
//!
//! The new image is staged next to the executable, then swapped in with two
//! renames: current → backup, staged → current. If the second rename fails
//! the backup is renamed back, once. The backup is left in place after a
//! successful install as the rollback target.
//!
//! Callers must check the install mode first; the installer itself does not
//! refuse package-manager installs.

use crate::download::ExecutableImage;
use crate::error::{Result, UpdateError};
use crate::fs::{backup_path, OsFs, SwapFs};
use crate::install_mode::resolve_current_exe;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::TempPath;
use tracing::{debug, error, info, warn};

/// Prefix of the staged file created next to the executable
const STAGE_PREFIX: &str = ".lu-update-";

/// Mode bits of a normally installed binary
#[cfg(unix)]
const EXECUTABLE_MODE: u32 = 0o755;

/// Where an install left things
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallOutcome {
    /// The executable path, now holding the new image
    pub executable: PathBuf,

    /// The previous executable
    pub backup: PathBuf,

    /// Size of the installed image
    pub bytes: usize,
}

/// Replaces the executable at a fixed path
pub struct Installer<F = OsFs> {
    executable: PathBuf,
    fs: F,
}

impl Installer<OsFs> {
    /// Installer for the running executable, symlinks resolved
    pub fn for_current_exe() -> Result<Self> {
        let executable = resolve_current_exe().map_err(UpdateError::ResolveExecutable)?;
        Ok(Self::new(executable))
    }

    /// Installer for an arbitrary, already-resolved executable path
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            fs: OsFs,
        }
    }
}

impl<F: SwapFs> Installer<F> {
    /// Swap in a different filesystem implementation
    pub fn with_fs<G: SwapFs>(self, fs: G) -> Installer<G> {
        Installer {
            executable: self.executable,
            fs,
        }
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    pub fn backup_path(&self) -> PathBuf {
        backup_path(&self.executable)
    }

    /// Replace the executable with `image`
    ///
    /// An existing backup is overwritten. On error the executable path holds
    /// the original binary, except for `UpdateError::Replace` with
    /// `restored: false`, where it may be empty.
    pub fn install(&self, image: ExecutableImage) -> Result<InstallOutcome> {
        let bytes = image.len();
        let staged = self.stage(image)?;
        let backup = self.backup_path();

        debug!(
            executable = %self.executable.display(),
            backup = %backup.display(),
            "moving current binary aside"
        );
        if let Err(source) = self.fs.rename(&self.executable, &backup) {
            return Err(UpdateError::Backup { backup, source });
        }

        if let Err(source) = self.fs.rename(&staged, &self.executable) {
            warn!(error = %source, "failed to move new binary into place, restoring backup");
            let restored = match self.fs.rename(&backup, &self.executable) {
                Ok(()) => true,
                Err(restore_error) => {
                    error!(
                        error = %restore_error,
                        backup = %backup.display(),
                        "failed to restore backup, executable path is empty"
                    );
                    false
                }
            };
            return Err(UpdateError::Replace {
                backup,
                restored,
                source,
            });
        }

        // The staged path no longer exists; dropping it only attempts a no-op removal.
        drop(staged);

        info!(
            executable = %self.executable.display(),
            bytes,
            "installed new binary"
        );

        Ok(InstallOutcome {
            executable: self.executable.clone(),
            backup,
            bytes,
        })
    }

    /// Write the image to a hidden temp file in the executable's directory
    ///
    /// Staging on the same filesystem keeps the final rename atomic. The file
    /// is deleted when the returned path is dropped, so an aborted install
    /// leaves nothing behind.
    fn stage(&self, image: ExecutableImage) -> Result<TempPath> {
        let dir = self
            .executable
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let stage_err = |source: io::Error| UpdateError::Stage {
            dir: dir.to_path_buf(),
            source,
        };

        let mut file = tempfile::Builder::new()
            .prefix(STAGE_PREFIX)
            .tempfile_in(dir)
            .map_err(stage_err)?;
        file.write_all(image.as_bytes()).map_err(stage_err)?;
        file.as_file().sync_all().map_err(stage_err)?;
        set_executable(file.as_file()).map_err(stage_err)?;

        debug!(staged = %file.path().display(), "staged new binary");
        Ok(file.into_temp_path())
    }
}

#[cfg(unix)]
fn set_executable(file: &std::fs::File) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(std::fs::Permissions::from_mode(EXECUTABLE_MODE))
}

#[cfg(not(unix))]
fn set_executable(_file: &std::fs::File) -> io::Result<()> {
    Ok(())
}
