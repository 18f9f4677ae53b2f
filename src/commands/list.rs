//! List command implementation
//!
//! Lists bundles recorded in the project's install ledger.

use std::path::PathBuf;

use console::Style;

use mush::error::Result;
use mush::ledger::InstalledBundle;
use mush::operations;

use crate::cli::ListArgs;
use crate::commands::project_path;

pub fn run(project: Option<PathBuf>, args: ListArgs) -> Result<()> {
    let project = project_path(project)?;
    let bundles = operations::installed(&project)?;

    if bundles.is_empty() {
        println!("No bundles installed.");
        return Ok(());
    }

    println!("Installed bundles ({}):", bundles.len());
    for bundle in &bundles {
        display_bundle(bundle, args.detailed);
    }
    Ok(())
}

fn display_bundle(bundle: &InstalledBundle, detailed: bool) {
    let name_style = Style::new().cyan().bold();
    let dim = Style::new().dim();
    println!(
        "  {}:{} {} {}",
        name_style.apply_to(&bundle.slug),
        bundle.version,
        bundle.harness,
        dim.apply_to(bundle.timestamp.format("%Y-%m-%d %H:%M").to_string())
    );
    if detailed {
        for asset in &bundle.assets {
            println!("    {asset}");
        }
    }
}
