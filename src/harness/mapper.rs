//! Spec-driven asset mapping

use std::path::{Path, PathBuf};

use super::{AssetMapper, HarnessSpec};
use crate::bundle::{AssetType, BundleLayer};
use crate::error::{Result, install as install_error};
use crate::path_utils::{resolve_within, validate_logical_path};

/// [`AssetMapper`] driven by a [`HarnessSpec`]
#[derive(Debug, Clone)]
pub struct SpecMapper {
    spec: HarnessSpec,
}

impl SpecMapper {
    pub fn new(spec: HarnessSpec) -> Self {
        Self { spec }
    }

    pub fn spec(&self) -> &HarnessSpec {
        &self.spec
    }

    fn unsupported(&self, asset_type: AssetType) -> crate::error::MushError {
        install_error::unsupported_asset(&self.spec.id, asset_type.as_str())
    }
}

/// Drop a conventional leading `skills/` or `agents/` segment
fn strip_kind_prefix<'a>(logical_path: &'a str, prefix: &str) -> &'a str {
    logical_path
        .strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix('/'))
        .filter(|rest| !rest.is_empty())
        .unwrap_or(logical_path)
}

impl AssetMapper for SpecMapper {
    fn id(&self) -> &str {
        &self.spec.id
    }

    fn map_asset(&self, project_dir: &Path, layer: &BundleLayer) -> Result<PathBuf> {
        validate_logical_path(&layer.logical_path)?;
        match layer.asset_type {
            AssetType::Skill => {
                let dir = self
                    .spec
                    .skill_dir
                    .as_deref()
                    .ok_or_else(|| self.unsupported(layer.asset_type))?;
                let relative = strip_kind_prefix(&layer.logical_path, "skills");
                resolve_within(&project_dir.join(dir), relative)
            }
            AssetType::AgentDefinition => {
                if let Some(document) = self.spec.agent_document.as_deref() {
                    return resolve_within(project_dir, document);
                }
                let dir = self
                    .spec
                    .agent_dir
                    .as_deref()
                    .ok_or_else(|| self.unsupported(layer.asset_type))?;
                let relative = strip_kind_prefix(&layer.logical_path, "agents");
                resolve_within(&project_dir.join(dir), relative)
            }
            AssetType::ToolConfig => {
                let file = self
                    .spec
                    .tool_config_file
                    .as_deref()
                    .ok_or_else(|| self.unsupported(layer.asset_type))?;
                resolve_within(project_dir, file)
            }
        }
    }

    fn merges_agent_documents(&self) -> bool {
        self.spec.agent_document.is_some()
    }
}
