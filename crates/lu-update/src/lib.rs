//! Self-update functionality for the lu-hut CLI
//!
//! Provides:
//! - Installation-mode detection (package-manager installs are left alone)
//! - A time-gated "newer version available" notice
//! - Release lookup against GitHub releases
//! - Archive download and in-memory binary extraction
//! - Atomic binary replacement keeping the previous binary as a backup
//! - Rollback to that backup
//!
//! No checksum or signature of the downloaded archive is verified.

pub mod check;
pub mod download;
pub mod error;
pub mod fs;
pub mod install_mode;
pub mod installer;
pub mod platform;
pub mod releases;
pub mod rollback;
pub mod version;

pub use check::{CheckMarker, Clock, FileMarker, MemoryMarker, SystemClock, UpdateGate, UpdateNotice};
pub use download::{extract_image, BinaryDownloader, ExecutableImage, BINARY_NAME};
pub use error::{Result, UpdateError};
pub use fs::{backup_path, OsFs, SwapFs};
pub use install_mode::{
    detect_install_mode, is_managed_installation, InstallMode, InstallRules, ManagedPathRule,
    PathMatcher,
};
pub use installer::{InstallOutcome, Installer};
pub use platform::Platform;
pub use releases::{find_asset_url, Release, ReleaseAsset, ReleaseManager, ReleaseSource};
pub use rollback::{Rollback, RollbackOutcome};
pub use version::{current_version, is_newer_version};
