//! Staging directories for in-progress pulls

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::debug;

use super::CacheEntry;
use super::paths::{ASSETS_DIR, STAGING_PREFIX};
use crate::bundle::CachedManifest;
use crate::common::fs::{prune_empty_dirs, write_atomic};
use crate::error::{Result, cache as cache_error, fs as fs_error};

/// Assets being written for an uncommitted entry.
///
/// Dropping a `Staging` without [`Staging::commit`] removes the staged tree
/// and any directories that are left empty.
#[derive(Debug)]
pub struct Staging {
    dir: Option<TempDir>,
    entry: CacheEntry,
    cache_root: PathBuf,
}

impl Staging {
    /// Start staging for `entry`, removing leftovers of earlier aborted pulls.
    pub fn begin(cache_root: &Path, entry: &CacheEntry) -> Result<Self> {
        let version_dir = entry.dir();
        fs::create_dir_all(version_dir).map_err(|e| fs_error::write_failed(version_dir, &e))?;
        remove_leftovers(version_dir)?;

        let dir = new_staging_dir(version_dir)?;
        debug!(entry = %entry.label(), staging = %dir.path().display(), "staging assets");
        Ok(Self {
            dir: Some(dir),
            entry: entry.clone(),
            cache_root: cache_root.to_path_buf(),
        })
    }

    /// Root of the staged asset tree
    pub fn root(&self) -> &Path {
        self.dir.as_ref().map_or(self.entry.dir(), TempDir::path)
    }

    /// Throw away everything staged so far and start over
    pub fn reset(&mut self) -> Result<()> {
        if let Some(dir) = self.dir.take() {
            let path = dir.path().to_path_buf();
            dir.close().map_err(|e| fs_error::write_failed(&path, &e))?;
        }
        self.dir = Some(new_staging_dir(self.entry.dir())?);
        Ok(())
    }

    /// Move the staged tree to `assets/` and write `manifest.json`.
    ///
    /// The manifest is written last; until then the entry is not cached.
    pub fn commit(mut self, manifest: &CachedManifest) -> Result<CacheEntry> {
        let dir = self
            .dir
            .take()
            .ok_or_else(|| cache_error::operation_failed("staging already finished"))?;
        let assets = self.entry.assets_dir();
        let staged = dir.keep();

        if let Err(e) = fs::rename(&staged, &assets) {
            let _ = fs::remove_dir_all(&staged);
            return Err(fs_error::write_failed(&assets, &e));
        }

        let json = serde_json::to_vec_pretty(manifest)?;
        if let Err(e) = write_atomic(&self.entry.manifest_path(), &json) {
            let _ = fs::remove_dir_all(&assets);
            return Err(e);
        }
        Ok(self.entry.clone())
    }
}

impl Drop for Staging {
    fn drop(&mut self) {
        if let Some(dir) = self.dir.take() {
            let path = dir.path().to_path_buf();
            if dir.close().is_err() {
                let _ = fs::remove_dir_all(&path);
            }
            prune_empty_dirs(self.entry.dir(), &self.cache_root);
        }
    }
}

fn new_staging_dir(version_dir: &Path) -> Result<TempDir> {
    tempfile::Builder::new()
        .prefix(STAGING_PREFIX)
        .tempdir_in(version_dir)
        .map_err(|e| fs_error::write_failed(version_dir, &e))
}

/// Remove stray staging directories and an `assets/` tree without a manifest
fn remove_leftovers(version_dir: &Path) -> Result<()> {
    let read_dir = fs::read_dir(version_dir).map_err(|e| fs_error::read_failed(version_dir, &e))?;
    for dir_entry in read_dir.filter_map(std::result::Result::ok) {
        let name = dir_entry.file_name();
        let name = name.to_string_lossy();
        if name.starts_with(STAGING_PREFIX) || name == ASSETS_DIR {
            let path = dir_entry.path();
            debug!(path = %path.display(), "removing leftover staging data");
            fs::remove_dir_all(&path).map_err(|e| fs_error::write_failed(&path, &e))?;
        }
    }
    Ok(())
}
