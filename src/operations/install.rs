//! Install a cached bundle into a project and record it

use std::collections::HashSet;
use std::path::Path;

use chrono::Utc;
use tracing::debug;

use crate::bundle::BundleRef;
use crate::cache::Cache;
use crate::error::Result;
use crate::harness::AssetMapper;
use crate::installer::{InstallOptions, install_bundle_with};
use crate::ledger::{InstalledBundle, Ledger};

/// What an install wrote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallReport {
    pub slug: String,
    pub version: String,
    pub harness: String,
    /// Project-relative paths, sorted
    pub assets: Vec<String>,
}

/// Materialize `reference` from the cache into `project_dir`.
///
/// Only cached bundles are installed; a missing entry is
/// [`crate::error::MushError::BundleNotCached`]. Files recorded by an
/// earlier install of the same slug for the same harness are replaced
/// without counting as conflicts. The ledger is saved before the writes are
/// committed; if saving fails the project is left as it was.
pub fn install<M: AssetMapper + ?Sized>(
    cache: &Cache,
    project_dir: &Path,
    workspace: &str,
    reference: &BundleRef,
    mapper: &M,
    force: bool,
) -> Result<InstallReport> {
    let entry = cache.resolve_cached(workspace, reference)?;
    let cached = entry.load_manifest()?;
    let mut ledger = Ledger::load(project_dir)?;

    let owned = ledger
        .get(&reference.slug, mapper.id())
        .map(|previous| {
            previous
                .assets
                .iter()
                .map(|asset| project_dir.join(asset))
                .collect::<HashSet<_>>()
        })
        .unwrap_or_default();
    debug!(bundle = %entry.label(), harness = mapper.id(), force, "installing");

    let version = entry.version.clone();
    let assets = install_bundle_with(
        project_dir,
        &entry,
        &cached.manifest,
        mapper,
        &InstallOptions { force, owned },
        |assets| {
            ledger.record(InstalledBundle {
                slug: reference.slug.clone(),
                version: version.clone(),
                harness: mapper.id().to_string(),
                assets: assets.to_vec(),
                timestamp: Utc::now(),
            });
            ledger.save(project_dir)
        },
    )?;

    Ok(InstallReport {
        slug: reference.slug.clone(),
        version,
        harness: mapper.id().to_string(),
        assets,
    })
}
