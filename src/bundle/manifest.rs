//! Bundle manifest types and their `manifest.json` encoding
//!
//! Layers are written with camelCase keys; snake_case spellings are accepted
//! on read so manifests produced by older registries still load.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::path_utils::validate_logical_path;

/// Kind of asset carried by a layer.
///
/// Decides destination shape and merge behaviour, never identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetType {
    Skill,
    AgentDefinition,
    ToolConfig,
}

impl AssetType {
    /// Wire spelling of this asset type
    pub fn as_str(self) -> &'static str {
        match self {
            AssetType::Skill => "skill",
            AssetType::AgentDefinition => "agent_definition",
            AssetType::ToolConfig => "tool_config",
        }
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One asset inside a bundle manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleLayer {
    /// Registry asset id; empty for layers sourced from a registry image
    #[serde(default, alias = "asset_id")]
    pub asset_id: String,

    /// Slash-separated relative path; join key between metadata and bytes
    #[serde(alias = "logical_path")]
    pub logical_path: String,

    #[serde(alias = "asset_type")]
    pub asset_type: AssetType,

    /// Hex SHA-256 of the asset bytes
    #[serde(default, alias = "content_sha256")]
    pub content_sha256: String,

    #[serde(default, alias = "size_bytes")]
    pub size_bytes: i64,
}

impl BundleLayer {
    /// Whether the per-asset API can fetch and verify this layer
    pub fn is_retrievable(&self) -> bool {
        !self.asset_id.is_empty() && !self.content_sha256.is_empty()
    }
}

/// Ordered list of layers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleManifest {
    #[serde(default)]
    pub layers: Vec<BundleLayer>,
}

impl BundleManifest {
    pub fn new(layers: Vec<BundleLayer>) -> Self {
        Self { layers }
    }

    /// Check every logical path with the path validator
    pub fn validate(&self) -> Result<()> {
        self.layers
            .iter()
            .try_for_each(|layer| validate_logical_path(&layer.logical_path))
    }

    /// Whether at least one layer carries an asset id and a content hash
    pub fn has_retrievable_assets(&self) -> bool {
        self.layers.iter().any(BundleLayer::is_retrievable)
    }

    /// Sort layers by logical path
    pub fn sort_by_path(&mut self) {
        self.layers
            .sort_by(|a, b| a.logical_path.cmp(&b.logical_path));
    }
}

/// How the assets of a cache entry were retrieved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ManifestSource {
    Image,
    Api,
}

/// Contents of a cache entry's `manifest.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedManifest {
    #[serde(default)]
    pub workspace: String,

    #[serde(default)]
    pub slug: String,

    #[serde(default)]
    pub version: String,

    #[serde(default, alias = "registry_ref", skip_serializing_if = "Option::is_none")]
    pub registry_ref: Option<String>,

    #[serde(
        default,
        alias = "registry_digest",
        skip_serializing_if = "Option::is_none"
    )]
    pub registry_digest: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<ManifestSource>,

    #[serde(default, alias = "pulled_at", skip_serializing_if = "Option::is_none")]
    pub pulled_at: Option<DateTime<Utc>>,

    #[serde(flatten)]
    pub manifest: BundleManifest,
}

impl CachedManifest {
    /// `slug:version` label
    pub fn label(&self) -> String {
        format!("{}:{}", self.slug, self.version)
    }
}
