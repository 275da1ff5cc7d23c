//! GitHub releases resolution

use crate::error::{Result, UpdateError};
use crate::platform::Platform;
use lu_core::types::{GitHubConfig, NetworkConfig};
use serde::Deserialize;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// Release information
#[derive(Debug, Clone, Deserialize)]
pub struct Release {
    /// Release tag (e.g., "v1.3.0")
    pub tag_name: String,

    /// Release name
    pub name: Option<String>,

    /// Release body (changelog)
    pub body: Option<String>,

    /// Whether this is a prerelease
    #[serde(default)]
    pub prerelease: bool,

    /// Whether this is a draft
    #[serde(default)]
    pub draft: bool,

    /// Release assets
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,

    /// Published date
    pub published_at: Option<String>,
}

/// Release asset
#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseAsset {
    /// Asset name
    pub name: String,

    /// Download URL
    pub browser_download_url: String,

    /// Asset size in bytes
    #[serde(default)]
    pub size: u64,
}

/// Anything that can tell which release is the latest
pub trait ReleaseSource {
    fn latest(&self) -> impl Future<Output = Result<Release>> + Send;
}

impl<T: ReleaseSource + ?Sized> ReleaseSource for &T {
    fn latest(&self) -> impl Future<Output = Result<Release>> + Send {
        (**self).latest()
    }
}

/// Pick the release archive for a platform
///
/// Only `.tar.gz` assets whose name carries the target triple qualify, which
/// also keeps checksum sidecars out.
pub fn find_asset<'a>(release: &'a Release, platform: &Platform) -> Option<&'a ReleaseAsset> {
    release
        .assets
        .iter()
        .find(|a| a.name.contains(platform.target) && a.name.ends_with(".tar.gz"))
}

/// Resolve the download URL of the release archive for a platform
pub fn find_asset_url(release: &Release, platform: &Platform) -> Result<String> {
    find_asset(release, platform)
        .map(|asset| asset.browser_download_url.clone())
        .ok_or_else(|| UpdateError::NoPlatformAsset {
            tag: release.tag_name.clone(),
            target: platform.target.to_string(),
        })
}

/// Release manager backed by the GitHub releases API
pub struct ReleaseManager {
    client: reqwest::Client,
    github_config: GitHubConfig,
}

impl ReleaseManager {
    /// Create a release manager from runtime configuration
    pub fn new(github_config: GitHubConfig, network: &NetworkConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(&network.user_agent)
            .timeout(Duration::from_secs(network.http_timeout_secs))
            .build()
            .map_err(|source| UpdateError::Transport {
                url: github_config.api_url.clone(),
                source,
            })?;

        Ok(Self {
            client,
            github_config,
        })
    }

    /// Get latest published release
    pub async fn get_latest(&self) -> Result<Release> {
        let url = format!(
            "{}/repos/{}/{}/releases/latest",
            self.github_config.api_url.trim_end_matches('/'),
            self.github_config.repo_owner,
            self.github_config.repo_name
        );
        self.fetch(url).await
    }

    /// Get release by tag
    pub async fn get_release(&self, tag: &str) -> Result<Release> {
        let url = format!(
            "{}/repos/{}/{}/releases/tags/{}",
            self.github_config.api_url.trim_end_matches('/'),
            self.github_config.repo_owner,
            self.github_config.repo_name,
            tag
        );
        self.fetch(url).await
    }

    async fn fetch(&self, url: String) -> Result<Release> {
        debug!(%url, "fetching release metadata");

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .send()
            .await
            .map_err(|source| UpdateError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpdateError::HttpStatus { url, status });
        }

        response
            .json::<Release>()
            .await
            .map_err(|source| UpdateError::ReleaseMetadata { url, source })
    }
}

impl ReleaseSource for ReleaseManager {
    async fn latest(&self) -> Result<Release> {
        self.get_latest().await
    }
}
