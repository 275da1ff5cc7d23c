//! Restoring the previous executable from its backup
//!
//! Mirror of the install swap: current → `<exe>.tmp`, backup → current, with
//! one compensating rename if the second step fails. The superseded binary
//! is deleted afterwards on a best-effort basis.

use crate::error::{Result, UpdateError};
use crate::fs::{backup_path, rollback_temp_path, OsFs, SwapFs};
use crate::install_mode::{resolve_current_exe, InstallMode};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// Where a rollback left things
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollbackOutcome {
    /// The executable path, now holding the previous version
    pub executable: PathBuf,

    /// Whether the superseded binary was deleted
    pub cleaned_up: bool,
}

/// Restores `<exe>.backup` over `<exe>`
pub struct Rollback<F = OsFs> {
    executable: PathBuf,
    mode: InstallMode,
    fs: F,
}

impl Rollback<OsFs> {
    /// Rollback for the running executable, symlinks resolved
    pub fn for_current_exe(mode: InstallMode) -> Result<Self> {
        let executable = resolve_current_exe().map_err(UpdateError::ResolveExecutable)?;
        Ok(Self::new(executable, mode))
    }

    pub fn new(executable: impl Into<PathBuf>, mode: InstallMode) -> Self {
        Self {
            executable: executable.into(),
            mode,
            fs: OsFs,
        }
    }
}

impl<F: SwapFs> Rollback<F> {
    /// Swap in a different filesystem implementation
    pub fn with_fs<G: SwapFs>(self, fs: G) -> Rollback<G> {
        Rollback {
            executable: self.executable,
            mode: self.mode,
            fs,
        }
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    pub fn backup_path(&self) -> PathBuf {
        backup_path(&self.executable)
    }

    /// Whether there is anything to roll back to
    pub fn has_backup(&self) -> bool {
        self.backup_path().is_file()
    }

    /// Restore the backup
    ///
    /// Refuses without touching the filesystem for managed installs and when
    /// no backup exists.
    pub fn run(&self) -> Result<RollbackOutcome> {
        if let InstallMode::Managed {
            manager,
            rollback_command,
            ..
        } = &self.mode
        {
            let remediation = match rollback_command {
                Some(command) => format!("run '{command}' to install a specific version"),
                None => format!("use {manager} to install a specific version"),
            };
            return Err(UpdateError::ManagedInstallation {
                action: "rollback",
                manager: manager.clone(),
                remediation,
            });
        }

        let backup = self.backup_path();
        if !self.has_backup() {
            return Err(UpdateError::NoBackup { path: backup });
        }

        let temp = rollback_temp_path(&self.executable);
        debug!(
            executable = %self.executable.display(),
            temp = %temp.display(),
            "moving current binary aside"
        );
        if let Err(source) = self.fs.rename(&self.executable, &temp) {
            return Err(UpdateError::RollbackPrepare { temp, source });
        }

        if let Err(source) = self.fs.rename(&backup, &self.executable) {
            warn!(error = %source, "failed to restore backup, putting current binary back");
            let restored = match self.fs.rename(&temp, &self.executable) {
                Ok(()) => true,
                Err(restore_error) => {
                    error!(
                        error = %restore_error,
                        temp = %temp.display(),
                        "failed to put current binary back, executable path is empty"
                    );
                    false
                }
            };
            return Err(UpdateError::RollbackSwap {
                temp,
                restored,
                source,
            });
        }

        let cleaned_up = match self.fs.remove_file(&temp) {
            Ok(()) => true,
            Err(e) => {
                debug!(error = %e, temp = %temp.display(), "leaving superseded binary behind");
                false
            }
        };

        info!(executable = %self.executable.display(), "rolled back to previous binary");
        Ok(RollbackOutcome {
            executable: self.executable.clone(),
            cleaned_up,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_managed_rollback_is_refused() {
        let temp = TempDir::new().unwrap();
        let exe = temp.path().join("lu");
        fs::write(&exe, b"current").unwrap();
        fs::write(backup_path(&exe), b"previous").unwrap();

        let mode = InstallMode::Managed {
            manager: "Homebrew".to_string(),
            upgrade_command: "brew upgrade lu-hut".to_string(),
            rollback_command: Some("brew install lu-hut@<version>".to_string()),
        };
        let err = Rollback::new(&exe, mode).run().unwrap_err();

        assert!(err.is_policy());
        assert!(err.to_string().contains("brew install lu-hut@<version>"));
        assert_eq!(fs::read(&exe).unwrap(), b"current");
        assert_eq!(fs::read(backup_path(&exe)).unwrap(), b"previous");
    }

    #[test]
    fn test_rollback_swaps_backup_in() {
        let temp = TempDir::new().unwrap();
        let exe = temp.path().join("lu");
        fs::write(&exe, b"current").unwrap();
        fs::write(backup_path(&exe), b"previous").unwrap();

        let outcome = Rollback::new(&exe, InstallMode::Standalone).run().unwrap();

        assert!(outcome.cleaned_up);
        assert_eq!(fs::read(&exe).unwrap(), b"previous");
        assert!(!backup_path(&exe).exists());
        assert!(!rollback_temp_path(&exe).exists());
    }
}
