//! Mapping and reading layers before anything is written

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::bundle::{AssetType, BundleLayer, BundleManifest};
use crate::cache::CacheEntry;
use crate::error::{Result, install as install_error};
use crate::harness::AssetMapper;

/// Where one destination's content comes from
#[derive(Debug)]
pub(crate) enum Placement {
    /// One layer copied verbatim
    Single {
        dest: PathBuf,
        layer: BundleLayer,
        bytes: Vec<u8>,
    },
    /// Tool configuration layers merged into one document
    ToolConfig {
        dest: PathBuf,
        documents: Vec<(String, Vec<u8>)>,
    },
    /// Agent definitions composed into one document
    AgentDocument {
        dest: PathBuf,
        documents: Vec<(String, String)>,
    },
}

impl Placement {
    pub(crate) fn dest(&self) -> &Path {
        match self {
            Placement::Single { dest, .. }
            | Placement::ToolConfig { dest, .. }
            | Placement::AgentDocument { dest, .. } => dest,
        }
    }

    /// Logical path of the first layer placed here
    fn first_source(&self) -> &str {
        match self {
            Placement::Single { layer, .. } => &layer.logical_path,
            Placement::ToolConfig { documents, .. } => {
                documents.first().map_or("", |(path, _)| path.as_str())
            }
            Placement::AgentDocument { documents, .. } => {
                documents.first().map_or("", |(path, _)| path.as_str())
            }
        }
    }
}

/// Map and read every layer accepted by `include`, then group by destination.
///
/// Fails before returning anything if a layer cannot be mapped or its cached
/// bytes cannot be read, or if two layers that cannot be combined map to the
/// same destination. Placements are ordered by destination.
pub(crate) fn plan<M, F>(
    project_dir: &Path,
    entry: &CacheEntry,
    manifest: &BundleManifest,
    mapper: &M,
    include: F,
) -> Result<Vec<Placement>>
where
    M: AssetMapper + ?Sized,
    F: Fn(&BundleLayer) -> bool,
{
    let merges_agents = mapper.merges_agent_documents();
    let mut by_dest: BTreeMap<PathBuf, Placement> = BTreeMap::new();

    for layer in manifest.layers.iter().filter(|l| include(l)) {
        let dest = mapper.map_asset(project_dir, layer)?;
        let bytes = entry.read_asset(&layer.logical_path)?;

        match (layer.asset_type, by_dest.get_mut(&dest)) {
            (AssetType::ToolConfig, Some(Placement::ToolConfig { documents, .. })) => {
                documents.push((layer.logical_path.clone(), bytes));
            }
            (AssetType::AgentDefinition, Some(Placement::AgentDocument { documents, .. }))
                if merges_agents =>
            {
                documents.push((layer.logical_path.clone(), lossy(bytes)));
            }
            (_, Some(existing)) => {
                return Err(install_error::duplicate_destination(
                    dest,
                    existing.first_source(),
                    &layer.logical_path,
                ));
            }
            (AssetType::ToolConfig, None) => {
                by_dest.insert(
                    dest.clone(),
                    Placement::ToolConfig {
                        dest,
                        documents: vec![(layer.logical_path.clone(), bytes)],
                    },
                );
            }
            (AssetType::AgentDefinition, None) if merges_agents => {
                by_dest.insert(
                    dest.clone(),
                    Placement::AgentDocument {
                        dest,
                        documents: vec![(layer.logical_path.clone(), lossy(bytes))],
                    },
                );
            }
            (_, None) => {
                by_dest.insert(
                    dest.clone(),
                    Placement::Single {
                        dest,
                        layer: layer.clone(),
                        bytes,
                    },
                );
            }
        }
    }

    Ok(by_dest.into_values().collect())
}

fn lossy(bytes: Vec<u8>) -> String {
    String::from_utf8(bytes).unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
}
