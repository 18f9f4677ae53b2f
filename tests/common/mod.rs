//! Common test utilities for mush integration tests

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

use mush::bundle::{AssetType, BundleLayer, BundleManifest, CachedManifest, ManifestSource};
use mush::hash::sha256_hex;

/// A project directory plus an isolated cache base
pub struct TestProject {
    pub temp: TempDir,
    pub cache: TempDir,
    /// Path to project root
    pub path: PathBuf,
}

impl TestProject {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let cache = TempDir::new().expect("Failed to create cache directory");
        let path = temp.path().to_path_buf();
        Self { temp, cache, path }
    }

    /// `mush` running in the project with the isolated cache
    pub fn mush_cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("mush").expect("mush binary is built");
        cmd.current_dir(&self.path);
        cmd.env("MUSH_CACHE_DIR", self.cache.path());
        cmd.env_remove("MUSH_PROJECT");
        cmd.env_remove("RUST_LOG");
        cmd
    }

    /// Directory holding cached bundles
    pub fn bundles_dir(&self) -> PathBuf {
        self.cache.path().to_path_buf()
    }

    /// Write a committed cache entry with the given `(path, type, content)` assets
    pub fn seed_bundle(
        &self,
        workspace: &str,
        slug: &str,
        version: &str,
        assets: &[(&str, AssetType, &str)],
    ) -> PathBuf {
        let dir = self.bundles_dir().join(workspace).join(slug).join(version);
        let mut layers = Vec::new();
        for (path, asset_type, content) in assets {
            write(&dir.join("assets").join(path), content);
            layers.push(BundleLayer {
                asset_id: format!("id-{path}"),
                logical_path: (*path).to_string(),
                asset_type: *asset_type,
                content_sha256: sha256_hex(content.as_bytes()),
                size_bytes: i64::try_from(content.len()).expect("size fits"),
            });
        }
        std::fs::create_dir_all(dir.join("assets")).expect("Failed to create assets directory");

        let manifest = CachedManifest {
            workspace: workspace.to_string(),
            slug: slug.to_string(),
            version: version.to_string(),
            registry_ref: None,
            registry_digest: None,
            source: Some(ManifestSource::Api),
            pulled_at: None,
            manifest: BundleManifest::new(layers),
        };
        let json = serde_json::to_string_pretty(&manifest).expect("manifest serializes");
        write(&dir.join("manifest.json"), &json);
        dir
    }

    /// Write a file in the project
    pub fn write_file(&self, path: &str, content: &str) {
        write(&self.path.join(path), content);
    }

    /// Read a file from the project
    pub fn read_file(&self, path: &str) -> String {
        std::fs::read_to_string(self.path.join(path)).expect("Failed to read file")
    }

    /// Check if a file exists in the project
    pub fn file_exists(&self, path: &str) -> bool {
        self.path.join(path).exists()
    }
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

fn write(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create parent directory");
    }
    std::fs::write(path, content).expect("Failed to write file");
}
