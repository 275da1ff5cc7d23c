//! Hierarchical configuration loader with precedence
//!
//! Loads configuration from multiple sources with the following precedence (low to high):
//! 1. Built-in defaults
//! 2. User config (~/.lu-hut/config.yaml)
//! 3. Environment variables (LU_HUT_* prefix)
//! 4. CLI flags (handled by caller)

use crate::error::{Error, Result};
use crate::types::{ManagedPathConfig, RuntimeConfig};
use crate::utils::state_dir;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name of the user configuration inside the state directory
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Configuration hierarchy loader
pub struct ConfigLoader {
    /// Directory holding config.yaml
    config_dir: PathBuf,
}

impl ConfigLoader {
    /// Create a loader rooted at the per-user state directory
    pub fn new() -> Result<Self> {
        Ok(Self {
            config_dir: state_dir()?,
        })
    }

    /// Create a loader with a custom config directory
    pub fn with_dir(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
        }
    }

    /// Get the config directory path
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Load runtime configuration with hierarchical precedence
    pub fn load(&self) -> Result<RuntimeConfig> {
        let mut config = RuntimeConfig::default();

        let config_path = self.config_dir.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            debug!(path = %config_path.display(), "loading user config");
            config = Self::load_yaml_file(&config_path)?;
        }

        config = Self::apply_env_overrides(config)?;
        Self::validate(&config)?;

        Ok(config)
    }

    /// Load a YAML file and parse it
    fn load_yaml_file(path: &Path) -> Result<RuntimeConfig> {
        let content = fs::read_to_string(path)?;
        serde_yaml_ng::from_str(&content).map_err(|source| Error::YamlParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply environment variable overrides to runtime config
    fn apply_env_overrides(mut config: RuntimeConfig) -> Result<RuntimeConfig> {
        if let Ok(val) = env::var("LU_HUT_DOWNLOAD_TIMEOUT_SECS") {
            config.network.download_timeout_secs = val.parse().map_err(|_| {
                Error::invalid_config("LU_HUT_DOWNLOAD_TIMEOUT_SECS must be a valid number")
            })?;
        }

        if let Ok(val) = env::var("LU_HUT_HTTP_TIMEOUT_SECS") {
            config.network.http_timeout_secs = val.parse().map_err(|_| {
                Error::invalid_config("LU_HUT_HTTP_TIMEOUT_SECS must be a valid number")
            })?;
        }

        if let Ok(val) = env::var("LU_HUT_GITHUB_API_URL") {
            config.github.api_url = val;
        }

        if let Ok(val) = env::var("LU_HUT_GITHUB_REPO_OWNER") {
            config.github.repo_owner = val;
        }

        if let Ok(val) = env::var("LU_HUT_GITHUB_REPO_NAME") {
            config.github.repo_name = val;
        }

        if env_flag("LU_HUT_NO_UPDATE_CHECK") {
            config.update_check.enabled = false;
        }

        if env_flag("LU_HUT_NO_COLOR") {
            config.display.color_enabled = false;
        }

        Ok(config)
    }

    fn validate(config: &RuntimeConfig) -> Result<()> {
        if config.network.download_timeout_secs == 0 {
            return Err(Error::invalid_config(
                "network.download-timeout-secs must be greater than zero",
            ));
        }

        for rule in &config.install.managed_paths {
            validate_managed_path(rule)?;
        }

        Ok(())
    }
}

fn validate_managed_path(rule: &ManagedPathConfig) -> Result<()> {
    match (&rule.contains, &rule.prefix) {
        (Some(pattern), None) | (None, Some(pattern)) if !pattern.is_empty() => Ok(()),
        _ => Err(Error::invalid_config(format!(
            "managed path rule for '{}' needs exactly one non-empty 'contains' or 'prefix'",
            rule.manager
        ))),
    }
}

/// Truthy environment flag: set and not "0"/"false"/empty
fn env_flag(name: &str) -> bool {
    env::var(name)
        .map(|v| !matches!(v.trim().to_ascii_lowercase().as_str(), "" | "0" | "false"))
        .unwrap_or(false)
}
