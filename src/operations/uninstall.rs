//! Remove an installed bundle from a project

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::common::fs::prune_empty_dirs;
use crate::error::{Result, bundle as bundle_error, fs as fs_error};
use crate::ledger::{InstalledBundle, Ledger};
use crate::path_utils::resolve_within;

/// Delete every file the ledger lists for `slug` under `harness`, prune the
/// directories left empty, and drop the ledger entry.
///
/// Files that are already gone are skipped. Returns the removed record.
pub fn uninstall(project_dir: &Path, slug: &str, harness: &str) -> Result<InstalledBundle> {
    let mut ledger = Ledger::load(project_dir)?;
    let record = ledger
        .remove(slug, harness)
        .ok_or_else(|| bundle_error::not_installed(slug, harness))?;

    for asset in &record.assets {
        let path = resolve_within(project_dir, asset)?;
        if !path.is_file() {
            debug!(path = %path.display(), "already removed");
            continue;
        }
        fs::remove_file(&path).map_err(|e| fs_error::write_failed(&path, &e))?;
        if let Some(parent) = path.parent() {
            prune_empty_dirs(parent, project_dir);
        }
    }

    ledger.save(project_dir)?;
    info!(slug, harness, files = record.assets.len(), "uninstalled bundle");
    Ok(record)
}
