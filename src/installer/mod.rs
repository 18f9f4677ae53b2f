//! Materializing cached bundle assets into a project
//!
//! Every layer is mapped and read before anything is written. Tool
//! configuration layers sharing a destination are merged with whatever is
//! already there; harnesses with a single agent document get agent
//! definitions composed into it. Everything else is copied verbatim and,
//! unless forced, refuses to replace an existing file.
//!
//! Writes go through a [`Transaction`], so a failure part-way leaves the
//! project as it was.

pub mod ephemeral;
mod plan;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

pub use ephemeral::{
    Injection, ToolConfigInjection, inject_assets, inject_tool_config, prepare_scratch_tree,
};

use crate::bundle::BundleManifest;
use crate::cache::CacheEntry;
use crate::common::fs::read_optional;
use crate::error::{Result, install as install_error};
use crate::harness::AssetMapper;
use crate::merge::{DocumentFormat, compose_agent_documents, merge_documents};
use crate::path_utils::relative_display;
use crate::transaction::Transaction;
use plan::{Placement, plan};

/// How existing destination files are treated
#[derive(Debug, Clone, Default)]
pub struct InstallOptions {
    /// Overwrite existing files instead of failing
    pub force: bool,
    /// Files written by an earlier install of the same bundle; replaced
    /// without counting as conflicts
    pub owned: HashSet<PathBuf>,
}

impl InstallOptions {
    pub fn force() -> Self {
        Self {
            force: true,
            ..Self::default()
        }
    }
}

/// Install every layer of `manifest` into `project_dir`.
///
/// Returns the sorted, de-duplicated project-relative paths written.
pub fn install_bundle<M: AssetMapper + ?Sized>(
    project_dir: &Path,
    entry: &CacheEntry,
    manifest: &BundleManifest,
    mapper: &M,
    options: &InstallOptions,
) -> Result<Vec<String>> {
    install_bundle_with(project_dir, entry, manifest, mapper, options, |_| Ok(()))
}

/// Like [`install_bundle`], running `finish` on the written paths before the
/// writes are committed. If `finish` fails every write is rolled back.
pub fn install_bundle_with<M, F>(
    project_dir: &Path,
    entry: &CacheEntry,
    manifest: &BundleManifest,
    mapper: &M,
    options: &InstallOptions,
    finish: F,
) -> Result<Vec<String>>
where
    M: AssetMapper + ?Sized,
    F: FnOnce(&[String]) -> Result<()>,
{
    let placements = plan(project_dir, entry, manifest, mapper, |_| true)?;

    if !options.force {
        for placement in &placements {
            if let Placement::Single { dest, .. } = placement {
                if dest.exists() && !options.owned.contains(dest) {
                    return Err(install_error::conflict(dest.clone()));
                }
            }
        }
    }

    let mut transaction = Transaction::new(project_dir);
    for placement in &placements {
        let bytes = render(placement)?;
        debug!(dest = %placement.dest().display(), "writing asset");
        transaction.write(placement.dest(), &bytes)?;
    }

    let mut paths: Vec<String> = placements
        .iter()
        .map(|p| relative_display(project_dir, p.dest()))
        .collect();
    paths.sort();
    paths.dedup();

    finish(&paths)?;
    transaction.commit();
    info!(bundle = %entry.label(), harness = mapper.id(), files = paths.len(), "installed assets");
    Ok(paths)
}

/// Final bytes of a placement, merged with the destination's current content
pub(crate) fn render(placement: &Placement) -> Result<Vec<u8>> {
    match placement {
        Placement::Single { bytes, .. } => Ok(bytes.clone()),
        Placement::ToolConfig { dest, documents } => {
            let existing = read_optional(dest)?;
            let label = dest.display().to_string();
            let inputs = existing
                .iter()
                .map(|bytes| (label.as_str(), bytes.as_slice()))
                .chain(documents.iter().map(|(path, bytes)| (path.as_str(), bytes.as_slice())));
            merge_documents(DocumentFormat::for_path(dest), inputs)
        }
        Placement::AgentDocument { dest, documents } => {
            let existing = read_optional(dest)?.map(|b| String::from_utf8_lossy(&b).into_owned());
            Ok(compose_agent_documents(existing.as_deref(), documents).into_bytes())
        }
    }
}
