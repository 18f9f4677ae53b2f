//! Harness definitions and destination mapping
//!
//! A harness is a downstream agent runtime with its own directory layout.
//! Mapping a manifest layer to a path inside a project is the only
//! harness-specific behaviour; staging and merging are shared.
//!
//! - [`HarnessSpec`]: declarative directory layout of one harness
//! - [`AssetMapper`]: the mapping capability used by install and load
//! - [`SpecMapper`]: the mapper driven by a [`HarnessSpec`]
//! - [`HarnessRegistry`]: built-in specs plus project-local overrides

mod builtin;
pub mod loader;
mod mapper;
mod registry;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::TempDir;

pub use builtin::builtin_harnesses;
pub use mapper::SpecMapper;
pub use registry::HarnessRegistry;

use crate::bundle::BundleLayer;
use crate::cache::CacheEntry;
use crate::error::{Result, fs as fs_error, harness as harness_error};
use crate::path_utils::validate_logical_path;

/// Directory layout of a harness
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarnessSpec {
    /// Harness identifier (e.g., "claude", "codex")
    pub id: String,

    /// Display name
    #[serde(default)]
    pub name: String,

    /// Directory skills are mirrored into
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skill_dir: Option<String>,

    /// Directory agent definitions are mirrored into
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_dir: Option<String>,

    /// Single document all agent definitions are composed into.
    /// Takes precedence over `agent_dir`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_document: Option<String>,

    /// Document every tool configuration layer is merged into
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_config_file: Option<String>,
}

impl HarnessSpec {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            skill_dir: None,
            agent_dir: None,
            agent_document: None,
            tool_config_file: None,
        }
    }

    pub fn with_skill_dir(mut self, dir: impl Into<String>) -> Self {
        self.skill_dir = Some(dir.into());
        self
    }

    pub fn with_agent_dir(mut self, dir: impl Into<String>) -> Self {
        self.agent_dir = Some(dir.into());
        self
    }

    pub fn with_agent_document(mut self, path: impl Into<String>) -> Self {
        self.agent_document = Some(path.into());
        self
    }

    pub fn with_tool_config_file(mut self, path: impl Into<String>) -> Self {
        self.tool_config_file = Some(path.into());
        self
    }

    /// Reject empty ids and unsafe project-relative paths
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(harness_error::config_failed("harness id must not be empty"));
        }
        for path in [
            &self.skill_dir,
            &self.agent_dir,
            &self.agent_document,
            &self.tool_config_file,
        ]
        .into_iter()
        .flatten()
        {
            validate_logical_path(path).map_err(|e| {
                harness_error::config_failed(format!("harness '{}': {e}", self.id))
            })?;
        }
        Ok(())
    }
}

/// Scratch tree holding a full materialization of one cache entry
#[derive(Debug)]
pub struct EphemeralTree {
    dir: TempDir,
    pub assets: Vec<String>,
}

impl EphemeralTree {
    pub(crate) fn new(dir: TempDir, assets: Vec<String>) -> Self {
        Self { dir, assets }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Remove the scratch tree
    pub fn cleanup(self) -> Result<()> {
        let path: PathBuf = self.dir.path().to_path_buf();
        self.dir.close().map_err(|e| fs_error::write_failed(&path, &e))
    }
}

/// Maps manifest layers to destinations inside a project
pub trait AssetMapper {
    /// Harness id, used in errors and ledger entries
    fn id(&self) -> &str;

    /// Destination of `layer` under `project_dir`
    fn map_asset(&self, project_dir: &Path, layer: &BundleLayer) -> Result<PathBuf>;

    /// Whether agent definitions are composed into one shared document
    fn merges_agent_documents(&self) -> bool;

    /// Materialize the whole entry into a fresh scratch directory
    fn prepare_ephemeral_tree(&self, entry: &CacheEntry) -> Result<EphemeralTree> {
        crate::installer::prepare_scratch_tree(self, entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_escaping_dirs() {
        let spec = HarnessSpec::new("evil", "Evil").with_skill_dir("../outside");
        assert!(spec.validate().is_err());
        assert!(HarnessSpec::new(" ", "x").validate().is_err());
        assert!(builtin_harnesses().iter().all(|h| h.validate().is_ok()));
    }

    #[test]
    fn test_spec_json_shape() {
        let spec: HarnessSpec = serde_json::from_str(
            r#"{"id": "mine", "name": "Mine", "skill_dir": ".mine/skills", "tool_config_file": ".mine/mcp.json"}"#,
        )
        .unwrap();
        assert_eq!(spec.skill_dir.as_deref(), Some(".mine/skills"));
        assert_eq!(spec.agent_dir, None);
    }
}
