//! A single `(workspace, slug, version)` cache entry

use std::path::{Path, PathBuf};

use crate::bundle::CachedManifest;
use crate::common::fs::{read_file, read_optional};
use crate::error::{Result, config as config_error, integrity};
use crate::hash::{digests_match, hash_file, normalize_digest};
use crate::path_utils::resolve_within;

use super::paths::{ASSETS_DIR, MANIFEST_FILE};

/// Location of one cached bundle version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub workspace: String,
    pub slug: String,
    pub version: String,
    dir: PathBuf,
}

impl CacheEntry {
    pub(crate) fn new(workspace: &str, slug: &str, version: &str, dir: PathBuf) -> Self {
        Self {
            workspace: workspace.to_string(),
            slug: slug.to_string(),
            version: version.to_string(),
            dir,
        }
    }

    /// The version directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.dir.join(MANIFEST_FILE)
    }

    pub fn assets_dir(&self) -> PathBuf {
        self.dir.join(ASSETS_DIR)
    }

    /// Whether `manifest.json` has been written
    pub fn is_committed(&self) -> bool {
        self.manifest_path().is_file()
    }

    /// `slug:version` label
    pub fn label(&self) -> String {
        format!("{}:{}", self.slug, self.version)
    }

    /// On-disk path of an asset, rejecting unsafe logical paths
    pub fn asset_path(&self, logical_path: &str) -> Result<PathBuf> {
        resolve_within(&self.assets_dir(), logical_path)
    }

    /// Raw bytes of a cached asset
    pub fn read_asset(&self, logical_path: &str) -> Result<Vec<u8>> {
        read_file(&self.asset_path(logical_path)?)
    }

    /// Load the committed manifest
    pub fn load_manifest(&self) -> Result<CachedManifest> {
        let path = self.manifest_path();
        let label = path.display().to_string();
        let bytes = read_optional(&path)?
            .ok_or_else(|| crate::error::bundle::not_cached(self.label()))?;
        serde_json::from_slice(&bytes).map_err(|e| config_error::parse_failed(label, e.to_string()))
    }

    /// Re-hash every cached asset against its declared digest
    pub fn verify(&self, manifest: &CachedManifest) -> Result<()> {
        for layer in &manifest.manifest.layers {
            if layer.content_sha256.is_empty() {
                continue;
            }
            let actual = hash_file(&self.asset_path(&layer.logical_path)?)?;
            if !digests_match(&layer.content_sha256, &actual) {
                return Err(integrity::hash_mismatch(
                    layer.logical_path.clone(),
                    normalize_digest(&layer.content_sha256),
                    actual,
                ));
            }
        }
        Ok(())
    }
}
