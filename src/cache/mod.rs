//! Bundle content cache
//!
//! Committed entries are keyed by `(workspace, slug, version)`. An entry
//! counts as cached only once its `manifest.json` exists; assets are staged
//! in a sibling directory first and renamed into place on commit, so a failed
//! or interrupted pull never looks like a hit.
//!
//! Entries are never modified after commit. There is no locking; two
//! processes pulling the same version may race.

mod entry;
pub mod paths;
mod staging;
mod stats;

use std::fs;
use std::path::{Path, PathBuf};

pub use entry::CacheEntry;
pub use staging::Staging;
pub use stats::{CacheStats, CachedBundle, format_size};

use crate::bundle::BundleRef;
use crate::config::Config;
use crate::error::{Result, bundle as bundle_error};
use paths::{MANIFEST_FILE, check_key_segment};

/// Handle on the cache root
#[derive(Debug, Clone)]
pub struct Cache {
    root: PathBuf,
}

impl Cache {
    pub fn new(config: &Config) -> Self {
        Self {
            root: config.cache_base.clone(),
        }
    }

    /// The cache root, entries live at `<root>/<workspace>/<slug>/<version>`
    pub fn cache_dir(&self) -> &Path {
        &self.root
    }

    /// Directory of a cache entry
    pub fn cache_path(&self, workspace: &str, slug: &str, version: &str) -> Result<PathBuf> {
        check_key_segment("workspace", workspace)?;
        check_key_segment("slug", slug)?;
        check_key_segment("version", version)?;
        Ok(self.root.join(workspace).join(slug).join(version))
    }

    /// Whether `manifest.json` exists for this version
    pub fn is_cached(&self, workspace: &str, slug: &str, version: &str) -> bool {
        self.cache_path(workspace, slug, version)
            .is_ok_and(|dir| dir.join(MANIFEST_FILE).is_file())
    }

    /// Handle on an entry, committed or not
    pub fn entry(&self, workspace: &str, slug: &str, version: &str) -> Result<CacheEntry> {
        let dir = self.cache_path(workspace, slug, version)?;
        Ok(CacheEntry::new(workspace, slug, version, dir))
    }

    /// Highest committed version of a slug.
    ///
    /// Semver versions (an optional leading `v` is allowed) win over others;
    /// when none parse, the lexically greatest version is used.
    pub fn latest_cached_version(&self, workspace: &str, slug: &str) -> Result<Option<String>> {
        check_key_segment("workspace", workspace)?;
        check_key_segment("slug", slug)?;
        let slug_dir = self.root.join(workspace).join(slug);
        let Ok(read_dir) = fs::read_dir(&slug_dir) else {
            return Ok(None);
        };

        let versions: Vec<String> = read_dir
            .filter_map(std::result::Result::ok)
            .filter(|e| e.path().join(MANIFEST_FILE).is_file())
            .filter_map(|e| e.file_name().to_str().map(str::to_string))
            .collect();

        Ok(pick_latest(versions))
    }

    /// The committed entry for a reference: its pinned version, or the latest
    pub fn resolve_cached(&self, workspace: &str, reference: &BundleRef) -> Result<CacheEntry> {
        let version = match &reference.version {
            Some(version) => version.clone(),
            None => self
                .latest_cached_version(workspace, &reference.slug)?
                .ok_or_else(|| bundle_error::not_cached(format!("{workspace}/{reference}")))?,
        };
        let entry = self.entry(workspace, &reference.slug, &version)?;
        if !entry.is_committed() {
            return Err(bundle_error::not_cached(format!("{workspace}/{}", entry.label())));
        }
        Ok(entry)
    }
}

fn parse_semver(version: &str) -> Option<semver::Version> {
    semver::Version::parse(version.strip_prefix('v').unwrap_or(version)).ok()
}

fn pick_latest(versions: Vec<String>) -> Option<String> {
    let best_semver = versions
        .iter()
        .filter_map(|v| parse_semver(v).map(|parsed| (parsed, v)))
        .max_by(|a, b| a.0.cmp(&b.0))
        .map(|(_, v)| v.clone());
    best_semver.or_else(|| versions.into_iter().max())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::AssetType;
    use crate::test_fixtures::{create_temp_dir, seed_cache_entry};

    #[test]
    fn test_cache_path_layout() {
        let temp = create_temp_dir();
        let cache = Cache::new(&Config::with_cache_base(temp.path()));
        assert_eq!(cache.cache_dir(), temp.path());
        assert_eq!(
            cache.cache_path("acme", "bot", "1.0.0").unwrap(),
            temp.path().join("acme/bot/1.0.0")
        );
        assert!(cache.cache_path("acme", "../x", "1").is_err());
    }

    #[test]
    fn test_is_cached_tracks_manifest_only() {
        let temp = create_temp_dir();
        let cache = Cache::new(&Config::with_cache_base(temp.path()));
        let dir = cache.cache_path("acme", "bot", "1.0.0").unwrap();
        fs::create_dir_all(dir.join("assets")).unwrap();
        assert!(!cache.is_cached("acme", "bot", "1.0.0"));

        seed_cache_entry(&cache, "acme", "bot", "1.0.0", &[("a.md", AssetType::Skill, "x")]);
        assert!(cache.is_cached("acme", "bot", "1.0.0"));
    }

    #[test]
    fn test_latest_cached_version_prefers_semver() {
        let temp = create_temp_dir();
        let cache = Cache::new(&Config::with_cache_base(temp.path()));
        for v in ["1.2.0", "1.10.0", "v1.9.0"] {
            seed_cache_entry(&cache, "acme", "bot", v, &[]);
        }
        // uncommitted version is ignored
        fs::create_dir_all(cache.cache_path("acme", "bot", "9.0.0").unwrap()).unwrap();

        assert_eq!(
            cache.latest_cached_version("acme", "bot").unwrap().as_deref(),
            Some("1.10.0")
        );
        assert_eq!(cache.latest_cached_version("acme", "none").unwrap(), None);
    }

    #[test]
    fn test_pick_latest_lexical_fallback() {
        let versions = vec!["alpha".to_string(), "beta".to_string()];
        assert_eq!(pick_latest(versions).as_deref(), Some("beta"));
        assert_eq!(pick_latest(Vec::new()), None);
    }

    #[test]
    fn test_resolve_cached() {
        let temp = create_temp_dir();
        let cache = Cache::new(&Config::with_cache_base(temp.path()));
        seed_cache_entry(&cache, "acme", "bot", "1.0.0", &[]);
        seed_cache_entry(&cache, "acme", "bot", "2.0.0", &[]);

        let latest = cache.resolve_cached("acme", &BundleRef::latest("bot")).unwrap();
        assert_eq!(latest.version, "2.0.0");

        let pinned = cache.resolve_cached("acme", &BundleRef::new("bot", "1.0.0")).unwrap();
        assert_eq!(pinned.version, "1.0.0");

        let err = cache
            .resolve_cached("acme", &BundleRef::new("bot", "3.0.0"))
            .unwrap_err();
        assert!(matches!(err, crate::error::MushError::BundleNotCached { .. }));
    }
}
