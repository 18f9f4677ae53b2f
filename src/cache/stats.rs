//! Cache listing, statistics and removal

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use tracing::{debug, info};
use walkdir::WalkDir;

use super::paths::check_key_segment;
use super::{Cache, CacheEntry};
use crate::common::fs::prune_empty_dirs;
use crate::error::{Result, cache as cache_error};

/// Summary of one committed cache entry
#[derive(Debug, Clone)]
pub struct CachedBundle {
    pub workspace: String,
    pub slug: String,
    pub version: String,
    /// Number of layers in the manifest
    pub layers: usize,
    /// Size of the entry on disk in bytes
    pub size: u64,
    pub pulled_at: Option<DateTime<Utc>>,
}

impl CachedBundle {
    /// Format size as human-readable string
    pub fn formatted_size(&self) -> String {
        format_size(self.size)
    }
}

/// Cache statistics
#[derive(Debug, Default)]
pub struct CacheStats {
    /// Number of workspaces with at least one cached bundle
    pub workspaces: usize,
    /// Number of distinct `(workspace, slug)` pairs
    pub bundles: usize,
    /// Number of committed versions
    pub versions: usize,
    /// Total size in bytes
    pub total_size: u64,
}

impl CacheStats {
    /// Format total size as human-readable string
    pub fn formatted_size(&self) -> String {
        format_size(self.total_size)
    }
}

/// Human-readable byte count
#[allow(clippy::cast_precision_loss)]
pub fn format_size(bytes: u64) -> String {
    let size = bytes as f64;
    if size < 1024.0 {
        format!("{bytes} B")
    } else if size < 1024.0 * 1024.0 {
        format!("{:.1} KB", size / 1024.0)
    } else if size < 1024.0 * 1024.0 * 1024.0 {
        format!("{:.1} MB", size / (1024.0 * 1024.0))
    } else {
        format!("{:.1} GB", size / (1024.0 * 1024.0 * 1024.0))
    }
}

fn dir_size(path: &Path) -> u64 {
    WalkDir::new(path)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| e.metadata().ok())
        .map(|m| m.len())
        .sum()
}

/// Visible subdirectory names of `dir`; unreadable directories yield nothing
fn subdirs(dir: &Path) -> Vec<String> {
    let Ok(read_dir) = fs::read_dir(dir) else {
        return Vec::new();
    };
    read_dir
        .filter_map(std::result::Result::ok)
        .filter(|e| e.file_type().is_ok_and(|t| t.is_dir()))
        .filter_map(|e| e.file_name().to_str().map(str::to_string))
        .filter(|name| !name.starts_with('.'))
        .collect()
}

impl Cache {
    /// Every committed entry, sorted by workspace, slug and version.
    ///
    /// Unreadable directories and entries with a missing or malformed
    /// manifest are skipped.
    pub fn list_cached(&self) -> Result<Vec<CachedBundle>> {
        let mut bundles = Vec::new();
        for workspace in subdirs(&self.root) {
            let ws_dir = self.root.join(&workspace);
            for slug in subdirs(&ws_dir) {
                let slug_dir = ws_dir.join(&slug);
                for version in subdirs(&slug_dir) {
                    let entry =
                        CacheEntry::new(&workspace, &slug, &version, slug_dir.join(&version));
                    match entry.load_manifest() {
                        Ok(manifest) => bundles.push(CachedBundle {
                            layers: manifest.manifest.layers.len(),
                            size: dir_size(entry.dir()),
                            pulled_at: manifest.pulled_at,
                            workspace: workspace.clone(),
                            slug: slug.clone(),
                            version,
                        }),
                        Err(e) => debug!(entry = %entry.dir().display(), error = %e, "skipping cache entry"),
                    }
                }
            }
        }

        bundles.sort_by(|a, b| {
            (&a.workspace, &a.slug, &a.version).cmp(&(&b.workspace, &b.slug, &b.version))
        });
        Ok(bundles)
    }

    /// Aggregate statistics over committed entries
    pub fn stats(&self) -> Result<CacheStats> {
        let bundles = self.list_cached()?;
        let workspaces: BTreeSet<&str> = bundles.iter().map(|b| b.workspace.as_str()).collect();
        let slugs: BTreeSet<(&str, &str)> = bundles
            .iter()
            .map(|b| (b.workspace.as_str(), b.slug.as_str()))
            .collect();
        Ok(CacheStats {
            workspaces: workspaces.len(),
            bundles: slugs.len(),
            versions: bundles.len(),
            total_size: bundles.iter().map(|b| b.size).sum(),
        })
    }

    /// Remove one version of a slug, or every version when `version` is `None`
    pub fn remove(&self, workspace: &str, slug: &str, version: Option<&str>) -> Result<()> {
        check_key_segment("workspace", workspace)?;
        check_key_segment("slug", slug)?;
        let path = match version {
            Some(version) => self.cache_path(workspace, slug, version)?,
            None => self.root.join(workspace).join(slug),
        };

        if !path.exists() {
            let name = version.map_or_else(|| slug.to_string(), |v| format!("{slug}:{v}"));
            return Err(cache_error::operation_failed(format!(
                "Bundle not found in cache: {workspace}/{name}"
            )));
        }

        fs::remove_dir_all(&path).map_err(|e| {
            cache_error::operation_failed(format!("Failed to remove cached bundle: {e}"))
        })?;
        if let Some(parent) = path.parent() {
            prune_empty_dirs(parent, &self.root);
        }
        info!(workspace, slug, version = version.unwrap_or("*"), "removed from cache");
        Ok(())
    }

    /// Remove the whole cache root
    pub fn clear(&self) -> Result<()> {
        if !self.root.exists() {
            return Ok(());
        }
        fs::remove_dir_all(&self.root).map_err(|e| {
            cache_error::operation_failed(format!("Failed to clear cache: {e}"))
        })?;
        info!(root = %self.root.display(), "cleared cache");
        Ok(())
    }
}
