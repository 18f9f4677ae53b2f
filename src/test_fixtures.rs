//! Test fixtures and utilities for reducing test setup duplication.
//!
//! Temp directories, seeded cache entries, tar layers and in-memory registry
//! collaborators that count how often they are called.
//!
//! # Usage
//!
//! ```ignore
//! use crate::test_fixtures::{create_temp_dir, seed_cache_entry};
//!
//! #[test]
//! fn my_test() {
//!     let temp = create_temp_dir();
//!     let cache = Cache::new(&Config::with_cache_base(temp.path()));
//!     let entry = seed_cache_entry(&cache, "acme", "bot", "1.0.0", &[
//!         ("skills/review/SKILL.md", AssetType::Skill, "# Review"),
//!     ]);
//! }
//! ```

#![allow(clippy::expect_used, clippy::missing_panics_doc)]

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::io::Write;

use flate2::Compression;
use flate2::write::GzEncoder;
use tempfile::TempDir;

use crate::bundle::{AssetType, BundleLayer, BundleManifest, CachedManifest, ManifestSource};
use crate::cache::{Cache, CacheEntry};
use crate::error::{Result, bundle as bundle_error, registry as registry_error};
use crate::hash::sha256_hex;
use crate::registry::{AssetFetcher, BundleResolver, ImagePuller, PulledImage, Resolution};

/// Create a temp directory in the system temp location.
///
/// Uses `crate::temp::temp_dir_base()` to ensure temp dirs are never
/// created under the current working directory.
#[must_use]
pub fn create_temp_dir() -> TempDir {
    TempDir::new_in(crate::temp::temp_dir_base()).expect("Failed to create temp directory")
}

/// Create test files in a directory.
///
/// Takes a list of (path, content) tuples; paths are relative to `temp`.
pub fn create_test_files(temp: &TempDir, files: &[(&str, &str)]) {
    for (path, content) in files {
        let full_path = temp.path().join(path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&full_path, content).expect("Failed to write test file");
    }
}

/// Build a manifest layer with a real content hash
#[must_use]
pub fn layer(logical_path: &str, asset_type: AssetType, content: &str) -> BundleLayer {
    BundleLayer {
        asset_id: format!("id-{logical_path}"),
        logical_path: logical_path.to_string(),
        asset_type,
        content_sha256: sha256_hex(content.as_bytes()),
        size_bytes: i64::try_from(content.len()).expect("size fits"),
    }
}

/// Write a committed cache entry holding `assets`
pub fn seed_cache_entry(
    cache: &Cache,
    workspace: &str,
    slug: &str,
    version: &str,
    assets: &[(&str, AssetType, &str)],
) -> CacheEntry {
    let entry = cache
        .entry(workspace, slug, version)
        .expect("valid cache key");
    let mut layers = Vec::new();
    for (path, asset_type, content) in assets {
        let dest = entry.asset_path(path).expect("valid logical path");
        std::fs::create_dir_all(dest.parent().expect("asset has parent"))
            .expect("Failed to create asset directory");
        std::fs::write(&dest, content).expect("Failed to write asset");
        layers.push(layer(path, *asset_type, content));
    }
    std::fs::create_dir_all(entry.assets_dir()).expect("Failed to create assets directory");

    let manifest = CachedManifest {
        workspace: workspace.to_string(),
        slug: slug.to_string(),
        version: version.to_string(),
        registry_ref: None,
        registry_digest: None,
        source: Some(ManifestSource::Api),
        pulled_at: Some(chrono::Utc::now()),
        manifest: BundleManifest::new(layers),
    };
    std::fs::write(
        entry.manifest_path(),
        serde_json::to_vec_pretty(&manifest).expect("manifest serializes"),
    )
    .expect("Failed to write manifest");
    entry
}

/// Tar stream of regular files, gzip-compressed when `gzip` is set
#[must_use]
pub fn tar_layer(files: &[(&str, &[u8])], gzip: bool) -> Vec<u8> {
    let mut builder = tar::Builder::new(Vec::new());
    for (path, data) in files {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_entry_type(tar::EntryType::Regular);
        header.set_cksum();
        builder
            .append_data(&mut header, path, *data)
            .expect("Failed to append tar entry");
    }
    let tarball = builder.into_inner().expect("Failed to finish tar");
    if !gzip {
        return tarball;
    }
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&tarball).expect("Failed to gzip layer");
    encoder.finish().expect("Failed to finish gzip")
}

/// Tar stream with one entry whose name is written verbatim (no sanitizing)
#[must_use]
pub fn tar_layer_raw(name: &str, entry_type: tar::EntryType, data: &[u8]) -> Vec<u8> {
    let mut header = tar::Header::new_gnu();
    {
        let gnu = header.as_gnu_mut().expect("gnu header");
        gnu.name[..name.len()].copy_from_slice(name.as_bytes());
    }
    header.set_size(data.len() as u64);
    header.set_mode(0o644);
    header.set_entry_type(entry_type);
    if entry_type.is_symlink() {
        header.set_link_name("target").expect("link name");
    }
    header.set_cksum();

    let mut builder = tar::Builder::new(Vec::new());
    builder.append(&header, data).expect("Failed to append tar entry");
    builder.into_inner().expect("Failed to finish tar")
}

/// Resolver returning a fixed resolution (or error)
pub struct FakeResolver {
    resolution: Option<Resolution>,
    failure: String,
    calls: Cell<usize>,
}

impl FakeResolver {
    pub fn new(resolution: Resolution) -> Self {
        Self {
            resolution: Some(resolution),
            failure: String::new(),
            calls: Cell::new(0),
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            resolution: None,
            failure: reason.to_string(),
            calls: Cell::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl BundleResolver for FakeResolver {
    fn resolve(&self, _workspace: &str, slug: &str, _version: Option<&str>) -> Result<Resolution> {
        self.calls.set(self.calls.get() + 1);
        self.resolution
            .clone()
            .ok_or_else(|| bundle_error::resolution_failed(slug, &self.failure))
    }
}

/// Fetcher serving bodies from a map
#[derive(Default)]
pub struct FakeFetcher {
    bodies: HashMap<String, Vec<u8>>,
    calls: Cell<usize>,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, asset_id: &str, body: &[u8]) -> Self {
        self.bodies.insert(asset_id.to_string(), body.to_vec());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl AssetFetcher for FakeFetcher {
    fn fetch_asset(&self, asset_id: &str) -> Result<Vec<u8>> {
        self.calls.set(self.calls.get() + 1);
        self.bodies
            .get(asset_id)
            .cloned()
            .ok_or_else(|| registry_error::asset_fetch_failed(asset_id, "404 Not Found"))
    }
}

/// Image puller answering once with a prepared result
pub struct FakeImages {
    result: RefCell<Option<Result<PulledImage>>>,
    calls: Cell<usize>,
}

impl FakeImages {
    pub fn new(result: Result<PulledImage>) -> Self {
        Self {
            result: RefCell::new(Some(result)),
            calls: Cell::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl ImagePuller for FakeImages {
    fn pull_image(&self, reference: &str) -> Result<PulledImage> {
        self.calls.set(self.calls.get() + 1);
        self.result
            .borrow_mut()
            .take()
            .unwrap_or_else(|| Err(registry_error::image_pull_failed(reference, "already pulled")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_create_temp_dir() {
        let temp = create_temp_dir();
        assert!(temp.path().exists());
    }

    #[test]
    fn test_seed_cache_entry_is_committed() {
        let temp = create_temp_dir();
        let cache = Cache::new(&Config::with_cache_base(temp.path()));
        let entry = seed_cache_entry(&cache, "acme", "bot", "1.0.0", &[("a/b.md", AssetType::Skill, "x")]);
        assert!(entry.is_committed());
        assert_eq!(entry.load_manifest().unwrap().manifest.layers.len(), 1);
        entry.verify(&entry.load_manifest().unwrap()).unwrap();
    }

    #[test]
    fn test_tar_layer_gzip_magic() {
        let gz = tar_layer(&[("a", b"x".as_slice())], true);
        assert_eq!(&gz[..2], &[0x1f, 0x8b]);
        let plain = tar_layer(&[("a", b"x".as_slice())], false);
        assert_ne!(&plain[..2], &[0x1f, 0x8b]);
    }
}
