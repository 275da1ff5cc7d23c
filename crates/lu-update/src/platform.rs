//! Host platform to release target mapping

use std::fmt;

/// A platform lu-hut publishes release archives for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Platform {
    /// Operating system as reported by `std::env::consts::OS`
    pub os: &'static str,

    /// CPU architecture as reported by `std::env::consts::ARCH`
    pub arch: &'static str,

    /// Rust target triple used in asset names
    pub target: &'static str,
}

/// Platforms with published release archives
pub const SUPPORTED_PLATFORMS: &[Platform] = &[
    Platform {
        os: "linux",
        arch: "x86_64",
        target: "x86_64-unknown-linux-musl",
    },
    Platform {
        os: "linux",
        arch: "aarch64",
        target: "aarch64-unknown-linux-musl",
    },
    Platform {
        os: "macos",
        arch: "x86_64",
        target: "x86_64-apple-darwin",
    },
    Platform {
        os: "macos",
        arch: "aarch64",
        target: "aarch64-apple-darwin",
    },
];

impl Platform {
    /// Platform of the running binary, if archives are published for it
    pub fn current() -> Option<Self> {
        Self::find(std::env::consts::OS, std::env::consts::ARCH)
    }

    /// Look up a platform by os/arch pair
    pub fn find(os: &str, arch: &str) -> Option<Self> {
        SUPPORTED_PLATFORMS
            .iter()
            .copied()
            .find(|p| p.os == os && p.arch == arch)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.target)
    }
}
