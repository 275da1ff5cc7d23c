//! Builder patterns for test data construction

use lu_update::{Release, ReleaseAsset};

use super::constants::*;

/// Builder for constructing Release objects with sensible test defaults
#[derive(Debug, Clone)]
pub struct ReleaseBuilder {
    tag_name: String,
    assets: Vec<ReleaseAsset>,
}

impl ReleaseBuilder {
    pub fn new() -> Self {
        Self {
            tag_name: TAG_V1_3_0.to_string(),
            assets: Vec::new(),
        }
    }

    /// Set the tag name
    pub fn tag(mut self, tag: &str) -> Self {
        self.tag_name = tag.to_string();
        self
    }

    /// Add an archive asset for `target` served from `base_url`
    pub fn archive_for(mut self, base_url: &str, target: &str) -> Self {
        let name = format!("lu-hut-{}.tar.gz", target);
        self.assets.push(ReleaseAsset {
            browser_download_url: format!("{}/{}", base_url.trim_end_matches('/'), name),
            name,
            size: 0,
        });
        self
    }

    pub fn build(self) -> Release {
        Release {
            tag_name: self.tag_name,
            name: None,
            body: None,
            prerelease: false,
            draft: false,
            assets: self.assets,
            published_at: None,
        }
    }
}

impl Default for ReleaseBuilder {
    fn default() -> Self {
        Self::new()
    }
}
