//! High-level operations on a project
//!
//! Each operation ties the cache, the installer and the install ledger
//! together:
//! - [`install`]: materialize a cached bundle and record it
//! - [`uninstall`]: remove what an install wrote
//! - [`load`]: inject assets for a single harness run
//! - [`installed`]: list the ledger

pub mod install;
pub mod load;
pub mod uninstall;

use std::path::Path;

pub use install::{InstallReport, install};
pub use load::{LoadSession, load};
pub use uninstall::uninstall;

use crate::error::Result;
use crate::ledger::{InstalledBundle, Ledger};

/// Bundles recorded in a project's ledger, in install order
pub fn installed(project_dir: &Path) -> Result<Vec<InstalledBundle>> {
    Ok(Ledger::load(project_dir)?.entries().to_vec())
}
