//! One-shot injection of assets for a single harness run
//!
//! Nothing here is recorded in the ledger. Agent definitions and skills are
//! only placed where nothing exists yet; tool configuration is merged into
//! the harness document after backing it up. Both return a handle whose
//! `cleanup` undoes exactly what was done. Dropping a handle without calling
//! `cleanup` also undoes it.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::plan::{Placement, plan};
use super::{InstallOptions, install_bundle, render};
use crate::bundle::{AssetType, BundleManifest};
use crate::cache::CacheEntry;
use crate::error::Result;
use crate::frontmatter::check_document;
use crate::harness::{AssetMapper, EphemeralTree};
use crate::temp::scratch_dir;
use crate::transaction::Transaction;

/// Files placed by an injection and how to take them away again
#[derive(Debug)]
pub struct Injection {
    transaction: Transaction,
    /// Absolute paths written, in write order
    pub injected: Vec<PathBuf>,
    /// Frontmatter problems found in injected skills
    pub warnings: Vec<String>,
}

impl Injection {
    /// Directories created for injected files, deepest first
    pub fn created_dirs(&self) -> Vec<PathBuf> {
        self.transaction.created_dirs()
    }

    /// Restore every touched path to its state before injection
    pub fn cleanup(self) -> Result<()> {
        self.transaction.rollback()
    }
}

fn is_skill_document(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("md"))
}

/// Place agent definitions and skills whose destination does not exist yet.
///
/// Existing files are left untouched and not reported. Skill documents go
/// through frontmatter checking; the repaired text is written when repair
/// succeeds, and any problem becomes a warning.
pub fn inject_assets<M: AssetMapper + ?Sized>(
    project_dir: &Path,
    entry: &CacheEntry,
    manifest: &BundleManifest,
    mapper: &M,
) -> Result<Injection> {
    let placements = plan(project_dir, entry, manifest, mapper, |layer| {
        matches!(layer.asset_type, AssetType::Skill | AssetType::AgentDefinition)
    })?;

    let mut transaction = Transaction::new(project_dir);
    let mut warnings = Vec::new();

    for placement in &placements {
        let dest = placement.dest();
        if dest.exists() {
            debug!(dest = %dest.display(), "keeping existing file");
            continue;
        }

        let bytes = match placement {
            Placement::Single { layer, bytes, .. }
                if layer.asset_type == AssetType::Skill && is_skill_document(dest) =>
            {
                match std::str::from_utf8(bytes) {
                    Ok(text) => {
                        let checked = check_document(&layer.logical_path, text);
                        warnings.extend(checked.warning);
                        checked.content.into_bytes()
                    }
                    Err(_) => bytes.clone(),
                }
            }
            other => render(other)?,
        };
        transaction.write(dest, &bytes)?;
    }

    let injected = transaction.written_files();
    Ok(Injection {
        transaction,
        injected,
        warnings,
    })
}

/// Backed-up tool configuration documents
#[derive(Debug)]
pub struct ToolConfigInjection {
    transaction: Transaction,
    /// Documents merged into
    pub paths: Vec<PathBuf>,
}

impl ToolConfigInjection {
    /// Put the original bytes back, or delete documents that did not exist
    pub fn cleanup(self) -> Result<()> {
        self.transaction.rollback()
    }
}

/// Merge tool configuration layers into the harness documents, keeping a
/// backup of each for [`ToolConfigInjection::cleanup`].
pub fn inject_tool_config<M: AssetMapper + ?Sized>(
    project_dir: &Path,
    entry: &CacheEntry,
    manifest: &BundleManifest,
    mapper: &M,
) -> Result<ToolConfigInjection> {
    let placements = plan(project_dir, entry, manifest, mapper, |layer| {
        layer.asset_type == AssetType::ToolConfig
    })?;

    let mut transaction = Transaction::new(project_dir);
    for placement in &placements {
        let bytes = render(placement)?;
        transaction.write(placement.dest(), &bytes)?;
    }

    let paths = transaction.written_files();
    Ok(ToolConfigInjection { transaction, paths })
}

/// Materialize a whole cache entry into a fresh scratch directory
pub fn prepare_scratch_tree<M: AssetMapper + ?Sized>(
    mapper: &M,
    entry: &CacheEntry,
) -> Result<EphemeralTree> {
    let dir = scratch_dir(mapper.id())?;
    let manifest = entry.load_manifest()?;
    let assets = install_bundle(
        dir.path(),
        entry,
        &manifest.manifest,
        mapper,
        &InstallOptions::force(),
    )?;
    if assets.is_empty() {
        warn!(bundle = %entry.label(), harness = mapper.id(), "scratch tree is empty");
    }
    Ok(EphemeralTree::new(dir, assets))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::cache::Cache;
    use crate::config::Config;
    use crate::harness::{HarnessRegistry, SpecMapper};
    use crate::test_fixtures::{create_temp_dir, create_test_files, seed_cache_entry};

    fn mapper(id: &str) -> SpecMapper {
        SpecMapper::new(HarnessRegistry::builtin().get(id).unwrap().clone())
    }

    #[test]
    fn test_inject_skips_existing_and_cleanup_is_exact() {
        let cache_dir = create_temp_dir();
        let project = create_temp_dir();
        let cache = Cache::new(&Config::with_cache_base(cache_dir.path()));
        let entry = seed_cache_entry(
            &cache,
            "acme",
            "bot",
            "1.0.0",
            &[
                ("agents/mine.md", AssetType::AgentDefinition, "bundle version"),
                ("agents/new.md", AssetType::AgentDefinition, "new"),
                ("skills/review/SKILL.md", AssetType::Skill, "---\nname: review\n---\n"),
                ("tools/mcp.json", AssetType::ToolConfig, "{}"),
            ],
        );
        create_test_files(&project, &[(".claude/agents/mine.md", "user authored")]);
        let manifest = entry.load_manifest().unwrap().manifest;
        let root = project.path();

        let injection = inject_assets(root, &entry, &manifest, &mapper("claude")).unwrap();
        assert_eq!(
            injection.injected,
            vec![
                root.join(".claude/agents/new.md"),
                root.join(".claude/skills/review/SKILL.md"),
            ]
        );
        assert_eq!(
            injection.created_dirs(),
            vec![root.join(".claude/skills/review"), root.join(".claude/skills")]
        );
        assert!(!root.join(".mcp.json").exists());

        injection.cleanup().unwrap();
        assert!(!root.join(".claude/agents/new.md").exists());
        assert!(!root.join(".claude/skills").exists());
        assert_eq!(
            fs::read_to_string(root.join(".claude/agents/mine.md")).unwrap(),
            "user authored"
        );
    }

    #[test]
    fn test_inject_repairs_skill_frontmatter_with_warning() {
        let cache_dir = create_temp_dir();
        let project = create_temp_dir();
        let cache = Cache::new(&Config::with_cache_base(cache_dir.path()));
        let entry = seed_cache_entry(
            &cache,
            "acme",
            "bot",
            "1.0.0",
            &[(
                "skills/review/SKILL.md",
                AssetType::Skill,
                "---\ndescription: Use when: reviewing\n---\nBody\n",
            )],
        );
        let manifest = entry.load_manifest().unwrap().manifest;

        let injection = inject_assets(project.path(), &entry, &manifest, &mapper("claude")).unwrap();
        assert_eq!(injection.warnings.len(), 1);
        let written =
            fs::read_to_string(project.path().join(".claude/skills/review/SKILL.md")).unwrap();
        assert!(written.contains("description: \"Use when: reviewing\""));
        assert!(written.ends_with("---\nBody\n"));
    }

    #[test]
    fn test_tool_config_backup_and_restore() {
        let cache_dir = create_temp_dir();
        let project = create_temp_dir();
        let cache = Cache::new(&Config::with_cache_base(cache_dir.path()));
        let entry = seed_cache_entry(
            &cache,
            "acme",
            "bot",
            "1.0.0",
            &[("tools/mcp.json", AssetType::ToolConfig, r#"{"mcpServers": {"alpha": {}}}"#)],
        );
        let original = "{ \"mcpServers\": { \"mine\": {} } }\n";
        create_test_files(&project, &[(".mcp.json", original)]);
        let manifest = entry.load_manifest().unwrap().manifest;

        let injection =
            inject_tool_config(project.path(), &entry, &manifest, &mapper("claude")).unwrap();
        let merged: serde_json::Value =
            serde_json::from_slice(&fs::read(project.path().join(".mcp.json")).unwrap()).unwrap();
        assert!(merged["mcpServers"]["mine"].is_object());
        assert!(merged["mcpServers"]["alpha"].is_object());

        injection.cleanup().unwrap();
        assert_eq!(
            fs::read_to_string(project.path().join(".mcp.json")).unwrap(),
            original
        );
    }

    #[test]
    fn test_tool_config_created_then_deleted() {
        let cache_dir = create_temp_dir();
        let project = create_temp_dir();
        let cache = Cache::new(&Config::with_cache_base(cache_dir.path()));
        let entry = seed_cache_entry(
            &cache,
            "acme",
            "bot",
            "1.0.0",
            &[("tools/a.toml", AssetType::ToolConfig, "[mcp_servers.alpha]\n")],
        );
        let manifest = entry.load_manifest().unwrap().manifest;

        let injection =
            inject_tool_config(project.path(), &entry, &manifest, &mapper("codex")).unwrap();
        assert_eq!(injection.paths, vec![project.path().join(".codex/config.toml")]);

        injection.cleanup().unwrap();
        assert!(!project.path().join(".codex").exists());
    }

    #[test]
    fn test_prepare_scratch_tree() {
        let cache_dir = create_temp_dir();
        let cache = Cache::new(&Config::with_cache_base(cache_dir.path()));
        let entry = seed_cache_entry(
            &cache,
            "acme",
            "bot",
            "1.0.0",
            &[("agents/a.md", AssetType::AgentDefinition, "Alpha")],
        );

        let tree = mapper("gemini").prepare_ephemeral_tree(&entry).unwrap();
        assert_eq!(tree.assets, vec!["GEMINI.md"]);
        let path = tree.path().to_path_buf();
        assert!(path.join("GEMINI.md").exists());

        tree.cleanup().unwrap();
        assert!(!path.exists());
    }
}
