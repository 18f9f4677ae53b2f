//! Process-wide configuration, resolved once at startup
//!
//! The cache base comes from `MUSH_CACHE_DIR` when set, otherwise from a
//! fixed location under the user's home directory. Components receive a
//! [`Config`] value and never read the environment themselves.

use std::path::{Path, PathBuf};

use crate::error::{Result, config as config_error};

/// Environment variable overriding the cache base directory
pub const CACHE_DIR_ENV: &str = "MUSH_CACHE_DIR";

/// Project-local state directory (ledger, harness overrides)
pub const PROJECT_STATE_DIR: &str = ".mush";

/// Resolved configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base directory holding the bundle cache
    pub cache_base: PathBuf,
}

impl Config {
    /// Build a config with an explicit cache base
    pub fn with_cache_base(cache_base: impl Into<PathBuf>) -> Self {
        Self {
            cache_base: cache_base.into(),
        }
    }

    /// Resolve from `MUSH_CACHE_DIR` and the user's home directory
    pub fn from_env() -> Result<Self> {
        Self::resolve(std::env::var(CACHE_DIR_ENV).ok(), dirs::home_dir())
    }

    /// Resolve from an optional override and an optional home directory.
    ///
    /// An empty override counts as unset.
    pub fn resolve(override_dir: Option<String>, home: Option<PathBuf>) -> Result<Self> {
        if let Some(dir) = override_dir.filter(|d| !d.trim().is_empty()) {
            return Ok(Self::with_cache_base(dir));
        }
        let home = home.ok_or_else(|| {
            config_error::invalid(format!(
                "could not determine home directory; set {CACHE_DIR_ENV}"
            ))
        })?;
        Ok(Self::with_cache_base(default_cache_base(&home)))
    }
}

/// Fallback cache base for a given home directory
pub fn default_cache_base(home: &Path) -> PathBuf {
    home.join(PROJECT_STATE_DIR).join("cache")
}
