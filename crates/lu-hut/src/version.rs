//! Build and platform details reported by `lu version`

use lu_update::{current_version, Platform};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionInfo {
    pub version: String,

    /// Short commit hash, set when built from a git checkout
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit: Option<String>,

    /// Build date (YYYY-MM-DD)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_date: Option<String>,

    /// Release target this binary updates from; absent on hosts without
    /// published archives
    pub target: Option<String>,
}

impl VersionInfo {
    /// Details of the running binary
    pub fn current() -> Self {
        Self::new(
            current_version(),
            option_env!("LU_GIT_SHA"),
            option_env!("LU_BUILD_DATE"),
            Platform::current(),
        )
    }

    fn new(
        version: &str,
        commit: Option<&str>,
        build_date: Option<&str>,
        platform: Option<Platform>,
    ) -> Self {
        Self {
            version: version.to_string(),
            commit: commit.map(String::from),
            build_date: build_date.map(String::from),
            target: platform.map(|p| p.target.to_string()),
        }
    }

    /// Whether `lu update` can find an archive for this host
    pub fn is_updatable(&self) -> bool {
        self.target.is_some()
    }
}

/// `lu-hut 1.2.3 (abc1234 2026-01-01) x86_64-unknown-linux-musl`
impl fmt::Display for VersionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "lu-hut {}", self.version)?;

        let build: Vec<&str> = [self.commit.as_deref(), self.build_date.as_deref()]
            .into_iter()
            .flatten()
            .collect();
        if !build.is_empty() {
            write!(f, " ({})", build.join(" "))?;
        }

        if let Some(target) = &self.target {
            write!(f, " {target}")?;
        }
        Ok(())
    }
}
