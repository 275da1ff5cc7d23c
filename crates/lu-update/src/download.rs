//! Release archive download and binary extraction
//!
//! The release archive is a gzip-compressed tar holding the `lu` binary. The
//! whole archive and the extracted binary are kept in memory; release builds
//! are a few megabytes.

use crate::error::{Result, UpdateError};
use flate2::read::GzDecoder;
use lu_core::types::NetworkConfig;
use std::io::{self, Read};
use std::path::{Component, Path, PathBuf};
use std::time::Duration;
use tar::Archive;
use tracing::{debug, info};

/// File name of the binary inside release archives
pub const BINARY_NAME: &str = "lu";

/// Raw bytes of a freshly downloaded executable
#[derive(Clone, PartialEq, Eq)]
pub struct ExecutableImage(Vec<u8>);

impl ExecutableImage {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl std::fmt::Debug for ExecutableImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutableImage")
            .field("len", &self.0.len())
            .finish()
    }
}

/// Downloads release archives and pulls the binary out of them
pub struct BinaryDownloader {
    client: reqwest::Client,
    binary_name: String,
}

impl BinaryDownloader {
    /// Create a downloader bounded by the configured download timeout
    pub fn new(network: &NetworkConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(&network.user_agent)
            .timeout(Duration::from_secs(network.download_timeout_secs))
            .build()
            .map_err(|source| UpdateError::Transport {
                url: String::new(),
                source,
            })?;

        Ok(Self {
            client,
            binary_name: BINARY_NAME.to_string(),
        })
    }

    /// Look for a different entry name inside archives
    pub fn with_binary_name(mut self, name: impl Into<String>) -> Self {
        self.binary_name = name.into();
        self
    }

    /// Download `asset_url` and extract the binary from it
    ///
    /// Transport failures and non-2xx responses are returned as-is; there is
    /// no retry.
    pub async fn fetch_executable_image(&self, asset_url: &str) -> Result<ExecutableImage> {
        info!(url = asset_url, "downloading release archive");

        let response = self
            .client
            .get(asset_url)
            .send()
            .await
            .map_err(|source| UpdateError::Transport {
                url: asset_url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpdateError::HttpStatus {
                url: asset_url.to_string(),
                status,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| UpdateError::Transport {
                url: asset_url.to_string(),
                source,
            })?;

        debug!(bytes = body.len(), "archive downloaded");
        extract_image(&body, &self.binary_name)
    }
}

/// Extract the entry named `binary_name` from a gzip-compressed tar
///
/// Entries are scanned in order and scanning stops at the first match; other
/// entries are ignored. A leading `./` is accepted, entries in subdirectories
/// are not. A missing or zero-byte match is `PayloadNotFound`.
/// A match shorter than its header's declared size is an `Archive` error.
pub fn extract_image(archive: &[u8], binary_name: &str) -> Result<ExecutableImage> {
    let mut tarball = Vec::new();
    GzDecoder::new(archive)
        .read_to_end(&mut tarball)
        .map_err(UpdateError::Decompress)?;

    let mut archive = Archive::new(tarball.as_slice());
    let entries = archive.entries().map_err(UpdateError::Archive)?;

    for entry in entries {
        let mut entry = entry.map_err(UpdateError::Archive)?;
        let path = entry.path().map_err(UpdateError::Archive)?.into_owned();

        if !is_entry_named(&path, binary_name) {
            debug!(entry = %path.display(), "skipping archive entry");
            continue;
        }

        let declared = entry.size();
        let mut bytes = Vec::new();
        let copied = io::copy(&mut entry, &mut bytes).map_err(UpdateError::Archive)?;

        if copied != declared {
            return Err(UpdateError::Archive(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("entry '{}' declares {declared} bytes but holds {copied}", path.display()),
            )));
        }

        if bytes.is_empty() {
            break;
        }

        debug!(bytes = bytes.len(), "extracted binary from archive");
        return Ok(ExecutableImage::new(bytes));
    }

    Err(UpdateError::PayloadNotFound {
        name: binary_name.to_string(),
    })
}

fn is_entry_named(path: &Path, name: &str) -> bool {
    let normalized: PathBuf = path
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();
    normalized == Path::new(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;

    fn tar_gz(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let encoder = GzEncoder::new(Vec::new(), Compression::default());
        let mut builder = tar::Builder::new(encoder);
        for (name, data) in entries {
            let mut header = tar::Header::new_gnu();
            header.set_size(data.len() as u64);
            header.set_mode(0o755);
            header.set_cksum();
            builder.append_data(&mut header, name, *data).unwrap();
        }
        builder.into_inner().unwrap().finish().unwrap()
    }

    #[test]
    fn test_extracts_only_target_entry() {
        let archive = tar_gz(&[
            ("README.md", b"readme"),
            ("lu", b"new binary"),
            ("LICENSE", b"mit"),
        ]);

        let image = extract_image(&archive, "lu").unwrap();
        assert_eq!(image.as_bytes(), b"new binary");
    }

    #[test]
    fn test_dot_slash_prefix_matches() {
        let archive = tar_gz(&[("./lu", b"binary")]);
        let image = extract_image(&archive, "lu").unwrap();
        assert_eq!(image.len(), 6);
    }

    #[test]
    fn test_nested_entry_does_not_match() {
        let archive = tar_gz(&[("dist/lu", b"binary"), ("lu.1", b"manpage")]);
        let err = extract_image(&archive, "lu").unwrap_err();
        assert!(matches!(err, UpdateError::PayloadNotFound { .. }));
    }

    #[test]
    fn test_unrelated_entries_only() {
        let archive = tar_gz(&[("README.md", b"readme"), ("LICENSE", b"mit")]);
        let err = extract_image(&archive, "lu").unwrap_err();
        assert!(matches!(err, UpdateError::PayloadNotFound { ref name } if name == "lu"));
    }

    #[test]
    fn test_empty_payload_is_not_found() {
        let archive = tar_gz(&[("lu", b"")]);
        let err = extract_image(&archive, "lu").unwrap_err();
        assert!(matches!(err, UpdateError::PayloadNotFound { .. }));
    }

    #[test]
    fn test_first_match_wins() {
        let archive = tar_gz(&[("lu", b"first"), ("lu", b"second")]);
        let image = extract_image(&archive, "lu").unwrap();
        assert_eq!(image.into_bytes(), b"first".to_vec());
    }

    #[test]
    fn test_not_gzip_is_decompress_error() {
        let err = extract_image(b"definitely not gzip", "lu").unwrap_err();
        assert!(matches!(err, UpdateError::Decompress(_)));
    }

    #[test]
    fn test_gzip_of_garbage_is_archive_error() {
        use std::io::Write;

        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&[0xAB; 700]).unwrap();
        let archive = encoder.finish().unwrap();

        let err = extract_image(&archive, "lu").unwrap_err();
        assert!(matches!(err, UpdateError::Archive(_)));
    }

    #[test]
    fn test_oversized_header_is_archive_error() {
        let encoder = GzEncoder::new(Vec::new(), Compression::default());
        let mut builder = tar::Builder::new(encoder);
        let mut header = tar::Header::new_gnu();
        header.set_size(1 << 40);
        header.set_mode(0o755);
        builder
            .append_data(&mut header, "lu", &b"tiny"[..])
            .unwrap();
        let archive = builder.into_inner().unwrap().finish().unwrap();

        let err = extract_image(&archive, "lu").unwrap_err();
        assert!(matches!(err, UpdateError::Archive(_)));
    }

    #[test]
    fn test_image_debug_hides_bytes() {
        let image = ExecutableImage::new(vec![1, 2, 3]);
        assert_eq!(format!("{:?}", image), "ExecutableImage { len: 3 }");
    }
}
