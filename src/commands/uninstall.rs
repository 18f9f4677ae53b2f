use std::path::PathBuf;

use mush::error::Result;
use mush::operations;

use crate::cli::UninstallArgs;
use crate::commands::project_path;

pub fn run(project: Option<PathBuf>, args: UninstallArgs) -> Result<()> {
    let project = project_path(project)?;
    let removed = operations::uninstall(&project, &args.slug, &args.harness)?;
    println!(
        "Uninstalled {}:{} from {}",
        removed.slug, removed.version, removed.harness
    );
    Ok(())
}
