//! Ephemeral asset injection around a single harness run

use std::path::Path;

use tracing::{debug, warn};

use crate::bundle::BundleManifest;
use crate::cache::CacheEntry;
use crate::error::Result;
use crate::harness::AssetMapper;
use crate::installer::{Injection, ToolConfigInjection, inject_assets, inject_tool_config};

/// Everything injected for one run
#[derive(Debug)]
pub struct LoadSession {
    pub assets: Injection,
    pub tool_config: ToolConfigInjection,
}

impl LoadSession {
    /// Frontmatter warnings raised while injecting skills
    pub fn warnings(&self) -> &[String] {
        &self.assets.warnings
    }

    /// Restore tool configuration first, then remove injected files.
    ///
    /// Both steps run even when the first fails; the first error wins.
    pub fn cleanup(self) -> Result<()> {
        let LoadSession {
            assets,
            tool_config,
        } = self;
        let restored = tool_config.cleanup();
        let removed = assets.cleanup();
        restored.and(removed)
    }
}

/// Inject agent definitions, skills and tool configuration from a cache
/// entry into `project_dir` until [`LoadSession::cleanup`] is called.
///
/// When tool configuration fails to merge, the already injected files are
/// taken away again before the error is returned.
pub fn load<M: AssetMapper + ?Sized>(
    project_dir: &Path,
    entry: &CacheEntry,
    manifest: &BundleManifest,
    mapper: &M,
) -> Result<LoadSession> {
    let assets = inject_assets(project_dir, entry, manifest, mapper)?;

    let tool_config = match inject_tool_config(project_dir, entry, manifest, mapper) {
        Ok(injection) => injection,
        Err(e) => {
            if let Err(cleanup_err) = assets.cleanup() {
                warn!("failed to remove injected assets: {cleanup_err}");
            }
            return Err(e);
        }
    };

    debug!(
        bundle = %entry.label(),
        injected = assets.injected.len(),
        tool_configs = tool_config.paths.len(),
        "loaded bundle"
    );
    Ok(LoadSession {
        assets,
        tool_config,
    })
}
