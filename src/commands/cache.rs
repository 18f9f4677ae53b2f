use console::Style;

use mush::bundle::BundleRef;
use mush::cache::Cache;
use mush::config::Config;
use mush::error::Result;

use crate::cli::{CacheArgs, CacheSubcommand};

pub fn run(args: CacheArgs) -> Result<()> {
    let cache = Cache::new(&Config::from_env()?);

    match args.command {
        CacheSubcommand::Dir => println!("{}", cache.cache_dir().display()),
        CacheSubcommand::List => list_cached_bundles(&cache)?,
        CacheSubcommand::Stats => show_cache_stats(&cache)?,
        CacheSubcommand::Verify(verify) => {
            let reference = BundleRef::parse(&verify.bundle)?;
            let entry = cache.resolve_cached(&verify.workspace, &reference)?;
            let manifest = entry.load_manifest()?;
            entry.verify(&manifest)?;
            println!(
                "Verified {} ({} layer{})",
                entry.label(),
                manifest.manifest.layers.len(),
                if manifest.manifest.layers.len() == 1 { "" } else { "s" }
            );
        }
        CacheSubcommand::Remove(remove) => {
            let reference = BundleRef::parse(&remove.bundle)?;
            cache.remove(
                &remove.workspace,
                &reference.slug,
                reference.version.as_deref(),
            )?;
            println!("Removed cached bundle: {}/{reference}", remove.workspace);
        }
        CacheSubcommand::Clear => {
            cache.clear()?;
            println!("Cache cleared successfully.");
        }
    }
    Ok(())
}

fn show_cache_stats(cache: &Cache) -> Result<()> {
    let stats = cache.stats()?;

    println!("Cache Statistics:");
    println!("  Location: {}", cache.cache_dir().display());
    println!("  Workspaces: {}", stats.workspaces);
    println!("  Bundles: {}", stats.bundles);
    println!("  Versions: {}", stats.versions);
    println!("  Size: {}", stats.formatted_size());

    if stats.versions == 0 {
        println!("\nCache is empty.");
    } else {
        println!("\nRun 'mush cache list' to list cached bundles.");
        println!("Run 'mush cache remove <workspace> <slug>[:<version>]' to remove a bundle.");
    }
    Ok(())
}

fn list_cached_bundles(cache: &Cache) -> Result<()> {
    let bundles = cache.list_cached()?;
    if bundles.is_empty() {
        println!("No cached bundles.");
        return Ok(());
    }

    let name_style = Style::new().cyan().bold();
    let dim = Style::new().dim();
    println!("Cached bundles ({}):", bundles.len());
    for bundle in &bundles {
        let pulled = bundle
            .pulled_at
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "unknown".to_string());
        println!(
            "  {}/{}:{} {}",
            bundle.workspace,
            name_style.apply_to(&bundle.slug),
            bundle.version,
            dim.apply_to(format!(
                "({} layer{}, {}, pulled {pulled})",
                bundle.layers,
                if bundle.layers == 1 { "" } else { "s" },
                bundle.formatted_size()
            ))
        );
    }
    Ok(())
}
