//! Command implementations for the mush CLI

pub mod cache;
pub mod check;
pub mod install;
pub mod list;
pub mod uninstall;

use std::path::PathBuf;

use mush::error::{MushError, Result};

/// Project path from the CLI argument or the current directory
pub fn project_path(project: Option<PathBuf>) -> Result<PathBuf> {
    match project {
        Some(path) => Ok(path),
        None => std::env::current_dir().map_err(|e| MushError::IoError {
            message: format!("Failed to get current directory: {e}"),
        }),
    }
}
