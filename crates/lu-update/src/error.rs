//! Error taxonomy for the self-update subsystem
//!
//! Variants are grouped the way callers need to react to them: transport and
//! archive failures abort a single update attempt, filesystem failures carry
//! whether the one compensating rename succeeded, and policy failures carry
//! remediation text.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using lu-update's error type
pub type Result<T> = std::result::Result<T, UpdateError>;

#[derive(Error, Debug)]
pub enum UpdateError {
    /// Request could not be sent or the body could not be read
    #[error("failed to reach {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Server answered with a non-2xx status
    #[error("request to {url} failed with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    /// Release metadata was not in the expected shape
    #[error("invalid release metadata from {url}: {source}")]
    ReleaseMetadata {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The release has no archive for this platform
    #[error("release {tag} has no archive for target {target}")]
    NoPlatformAsset { tag: String, target: String },

    /// The downloaded body is not a valid gzip stream
    #[error("failed to decompress release archive: {0}")]
    Decompress(#[source] io::Error),

    /// The decompressed stream is not a readable tar archive
    #[error("failed to read tar archive: {0}")]
    Archive(#[source] io::Error),

    /// The archive holds no non-empty entry with the expected name
    #[error("binary '{name}' not found in archive")]
    PayloadNotFound { name: String },

    /// The running executable's path could not be determined
    #[error("failed to resolve executable path: {0}")]
    ResolveExecutable(#[source] io::Error),

    /// Writing the new image next to the executable failed
    #[error("failed to stage new binary in {dir}: {source}")]
    Stage {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Moving the current executable aside failed; nothing was changed
    #[error("failed to back up current binary to {backup}: {source} (original binary untouched)")]
    Backup {
        backup: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Moving the new image into place failed
    #[error("{}", replace_message(source, *restored, backup))]
    Replace {
        backup: PathBuf,
        restored: bool,
        #[source]
        source: io::Error,
    },

    /// Moving the current executable aside for a rollback failed; nothing was changed
    #[error("failed to move current binary aside to {temp}: {source} (nothing was changed)")]
    RollbackPrepare {
        temp: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Moving the backup into place failed during a rollback
    #[error("{}", rollback_swap_message(source, *restored, temp))]
    RollbackSwap {
        temp: PathBuf,
        restored: bool,
        #[source]
        source: io::Error,
    },

    /// Self-replacement is disabled for package-manager installs
    #[error("{action} is not supported for {manager} installations; {remediation}")]
    ManagedInstallation {
        action: &'static str,
        manager: String,
        remediation: String,
    },

    /// Rollback requested but no backup exists
    #[error("no backup found at {}; run 'lu update' first", path.display())]
    NoBackup { path: PathBuf },
}

fn replace_message(source: &io::Error, restored: bool, backup: &std::path::Path) -> String {
    if restored {
        format!("failed to replace binary: {source} (previous version restored)")
    } else {
        format!(
            "failed to replace binary: {source}; restoring the previous version also failed, \
             the executable may be missing (previous version is at {})",
            backup.display()
        )
    }
}

fn rollback_swap_message(source: &io::Error, restored: bool, temp: &std::path::Path) -> String {
    if restored {
        format!("failed to restore backup: {source} (current version kept)")
    } else {
        format!(
            "failed to restore backup: {source}; putting the current version back also failed, \
             the executable may be missing (current version is at {})",
            temp.display()
        )
    }
}

impl UpdateError {
    /// Whether a compensating rename put the executable back in place
    pub fn is_recovered(&self) -> bool {
        match self {
            Self::Replace { restored, .. } | Self::RollbackSwap { restored, .. } => *restored,
            _ => true,
        }
    }

    /// The one state where the executable path may be unoccupied
    pub fn leaves_executable_missing(&self) -> bool {
        !self.is_recovered()
    }

    /// Policy errors are not worth retrying
    pub fn is_policy(&self) -> bool {
        matches!(
            self,
            Self::ManagedInstallation { .. } | Self::NoBackup { .. }
        )
    }
}
