//! Materialization errors

use std::path::PathBuf;

use super::MushError;

/// Creates an install conflict error for an existing destination
pub fn conflict(path: impl Into<PathBuf>) -> MushError {
    MushError::InstallConflict { path: path.into() }
}

/// Creates an error for two layers that cannot share one destination
pub fn duplicate_destination(
    path: impl Into<PathBuf>,
    first: impl Into<String>,
    second: impl Into<String>,
) -> MushError {
    MushError::DuplicateDestination {
        path: path.into(),
        first: first.into(),
        second: second.into(),
    }
}

/// Creates an unsupported asset type error
pub fn unsupported_asset(harness: impl Into<String>, asset_type: impl Into<String>) -> MushError {
    MushError::UnsupportedAsset {
        harness: harness.into(),
        asset_type: asset_type.into(),
    }
}
