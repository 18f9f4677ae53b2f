//! Path safety errors

use std::path::Path;

use super::MushError;

/// Creates an unsafe path error
pub fn unsafe_path(path: impl Into<String>, reason: impl Into<String>) -> MushError {
    MushError::UnsafePath {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates a path escapes root error
pub fn escapes_root(path: &Path, root: &Path) -> MushError {
    MushError::PathEscapesRoot {
        path: path.display().to_string(),
        root: root.display().to_string(),
    }
}
