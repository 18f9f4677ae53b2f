//! Install command implementation
//!
//! Installs from the local cache only; nothing is fetched.

use std::path::PathBuf;

use console::Style;

use mush::bundle::BundleRef;
use mush::cache::Cache;
use mush::config::Config;
use mush::error::Result;
use mush::harness::HarnessRegistry;
use mush::operations;

use crate::cli::InstallArgs;
use crate::commands::project_path;

pub fn run(project: Option<PathBuf>, args: InstallArgs) -> Result<()> {
    let project = project_path(project)?;
    let reference = BundleRef::parse(&args.bundle)?;
    let cache = Cache::new(&Config::from_env()?);
    let harnesses = HarnessRegistry::load(&project)?;
    let mapper = harnesses.mapper(&args.harness)?;

    let report = operations::install(
        &cache,
        &project,
        &args.workspace,
        &reference,
        mapper.as_ref(),
        args.force,
    )?;

    let bold = Style::new().bold();
    println!(
        "Installed {}:{} for {} ({} file{})",
        bold.apply_to(&report.slug),
        report.version,
        report.harness,
        report.assets.len(),
        if report.assets.len() == 1 { "" } else { "s" }
    );
    for asset in &report.assets {
        println!("  {asset}");
    }
    Ok(())
}
