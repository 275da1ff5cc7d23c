//! Installation-mode detection
//!
//! Decides whether the running executable was placed by a package manager,
//! in which case self-update and rollback are refused. Detection is a list of
//! path rules checked in order against the symlink-resolved executable path.

use lu_core::types::ManagedPathConfig;
use std::path::{Path, PathBuf};
use tracing::debug;

const HOMEBREW_UPGRADE: &str = "brew upgrade lu-hut";
const HOMEBREW_PINNED_INSTALL: &str = "brew install lu-hut@<version>";

/// How a rule matches the resolved executable path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathMatcher {
    /// Path contains the fragment anywhere
    Contains(String),

    /// Path starts with the fragment
    Prefix(String),
}

impl PathMatcher {
    fn matches(&self, path: &str) -> bool {
        match self {
            Self::Contains(fragment) => path.contains(fragment.as_str()),
            Self::Prefix(prefix) => path.starts_with(prefix.as_str()),
        }
    }
}

/// A package-manager path rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagedPathRule {
    pub manager: String,
    pub matcher: PathMatcher,
    pub upgrade_command: String,
    /// How to get an older version back through the package manager
    pub rollback_command: Option<String>,
}

impl ManagedPathRule {
    pub fn new(
        manager: impl Into<String>,
        matcher: PathMatcher,
        upgrade_command: impl Into<String>,
    ) -> Self {
        Self {
            manager: manager.into(),
            matcher,
            upgrade_command: upgrade_command.into(),
            rollback_command: None,
        }
    }

    pub fn with_rollback_command(mut self, command: impl Into<String>) -> Self {
        self.rollback_command = Some(command.into());
        self
    }

    /// Convert a user config entry; entries without a matcher are ignored
    pub fn from_config(config: &ManagedPathConfig) -> Option<Self> {
        let matcher = match (&config.contains, &config.prefix) {
            (Some(fragment), None) => PathMatcher::Contains(fragment.clone()),
            (None, Some(prefix)) => PathMatcher::Prefix(prefix.clone()),
            _ => return None,
        };
        let mut rule = Self::new(
            config.manager.clone(),
            matcher,
            config.upgrade_command.clone(),
        );
        rule.rollback_command = config.rollback_command.clone();
        Some(rule)
    }
}

/// How the running executable was installed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallMode {
    /// Installed by hand or by the release installer; self-update allowed
    Standalone,

    /// Owned by a package manager
    Managed {
        manager: String,
        upgrade_command: String,
        rollback_command: Option<String>,
    },
}

impl InstallMode {
    pub fn is_managed(&self) -> bool {
        matches!(self, Self::Managed { .. })
    }

    /// Advice for getting a newer version, phrased for the install mode
    pub fn upgrade_hint(&self) -> String {
        match self {
            Self::Standalone => "lu update".to_string(),
            Self::Managed {
                upgrade_command, ..
            } => upgrade_command.clone(),
        }
    }
}

/// Ordered set of managed-installation rules, first match wins
#[derive(Debug, Clone)]
pub struct InstallRules {
    rules: Vec<ManagedPathRule>,
}

impl Default for InstallRules {
    fn default() -> Self {
        Self::builtin()
    }
}

impl InstallRules {
    /// Rules for the package managers lu-hut ships through
    pub fn builtin() -> Self {
        let brew = |matcher| {
            ManagedPathRule::new("Homebrew", matcher, HOMEBREW_UPGRADE)
                .with_rollback_command(HOMEBREW_PINNED_INSTALL)
        };
        Self {
            rules: vec![
                brew(PathMatcher::Contains("/Cellar/".to_string())),
                brew(PathMatcher::Contains("homebrew".to_string())),
                brew(PathMatcher::Prefix("/opt/homebrew/".to_string())),
                brew(PathMatcher::Contains("/usr/local/Cellar/".to_string())),
                ManagedPathRule::new(
                    "Linuxbrew",
                    PathMatcher::Prefix("/home/linuxbrew/.linuxbrew/".to_string()),
                    HOMEBREW_UPGRADE,
                )
                .with_rollback_command(HOMEBREW_PINNED_INSTALL),
            ],
        }
    }

    /// No rules at all; every path is standalone
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Built-in rules followed by user-configured ones
    pub fn with_config(extra: &[ManagedPathConfig]) -> Self {
        let mut rules = Self::builtin();
        rules.extend(extra.iter().filter_map(ManagedPathRule::from_config));
        rules
    }

    pub fn push(&mut self, rule: ManagedPathRule) {
        self.rules.push(rule);
    }

    pub fn rules(&self) -> &[ManagedPathRule] {
        &self.rules
    }

    /// Classify an already-resolved executable path
    pub fn classify(&self, path: &Path) -> InstallMode {
        let path = path.to_string_lossy();
        self.rules
            .iter()
            .find(|rule| rule.matcher.matches(&path))
            .map(|rule| InstallMode::Managed {
                manager: rule.manager.clone(),
                upgrade_command: rule.upgrade_command.clone(),
                rollback_command: rule.rollback_command.clone(),
            })
            .unwrap_or(InstallMode::Standalone)
    }
}

impl Extend<ManagedPathRule> for InstallRules {
    fn extend<I: IntoIterator<Item = ManagedPathRule>>(&mut self, iter: I) {
        self.rules.extend(iter);
    }
}

/// The running executable with symlinks resolved
pub fn resolve_current_exe() -> std::io::Result<PathBuf> {
    std::env::current_exe()?.canonicalize()
}

/// Detect the install mode of the running executable
///
/// A path that cannot be resolved is treated as standalone.
pub fn detect_install_mode(rules: &InstallRules) -> InstallMode {
    match resolve_current_exe() {
        Ok(path) => rules.classify(&path),
        Err(e) => {
            debug!(error = %e, "could not resolve executable path, assuming standalone");
            InstallMode::Standalone
        }
    }
}

/// Whether the running executable is owned by a known package manager
pub fn is_managed_installation() -> bool {
    detect_install_mode(&InstallRules::builtin()).is_managed()
}
