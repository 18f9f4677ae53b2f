//! Path safety utilities for manifest-derived paths
//!
//! Every logical path that comes out of a bundle manifest, a registry image
//! config or a tar entry is untrusted. It must pass [`validate_logical_path`]
//! before it is joined onto a directory that mush writes into.

use std::path::{Component, Path, PathBuf};

use crate::error::{Result, path as path_error};

/// Separators recognised inside logical paths, regardless of host platform.
const SEPARATORS: &[char] = &['/', '\\'];

/// Reject logical paths that could escape the directory they are joined onto.
///
/// Rejected: the empty string, NUL bytes, absolute paths, a leading `/` or `\`,
/// and any `/`- or `\`-delimited segment equal to `..`. Leading-dot segments
/// (`.claude/x`) and `./` components are accepted since they do not escape.
pub fn validate_logical_path(logical_path: &str) -> Result<()> {
    if logical_path.is_empty() {
        return Err(path_error::unsafe_path(logical_path, "path is empty"));
    }
    if logical_path.contains('\0') {
        return Err(path_error::unsafe_path(
            logical_path.replace('\0', "\\0"),
            "path contains a NUL byte",
        ));
    }
    if logical_path.starts_with(SEPARATORS) || Path::new(logical_path).is_absolute() {
        return Err(path_error::unsafe_path(logical_path, "path is absolute"));
    }
    if logical_path.split(SEPARATORS).any(|segment| segment == "..") {
        return Err(path_error::unsafe_path(
            logical_path,
            "path contains a '..' segment",
        ));
    }
    Ok(())
}

/// Validate `logical_path` and join it onto `root`.
///
/// Empty and `.` segments are dropped. The joined path is checked to stay
/// lexically inside `root` before it is returned.
pub fn resolve_within(root: &Path, logical_path: &str) -> Result<PathBuf> {
    validate_logical_path(logical_path)?;

    let mut resolved = root.to_path_buf();
    for segment in logical_path.split(SEPARATORS) {
        if segment.is_empty() || segment == "." {
            continue;
        }
        resolved.push(segment);
    }

    ensure_within(root, &resolved)?;
    Ok(resolved)
}

/// Fail unless `path` is lexically contained in `root`.
pub fn ensure_within(root: &Path, path: &Path) -> Result<()> {
    let escapes = path
        .strip_prefix(root)
        .map(|rest| {
            rest.components()
                .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        })
        .unwrap_or(true);
    if escapes {
        return Err(path_error::escapes_root(path, root));
    }
    Ok(())
}

/// Convert a path to a string with forward slashes
pub fn to_forward_slashes(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Path of `path` relative to `root`, slash-separated. Falls back to the full
/// path when `path` is not under `root`.
pub fn relative_display(root: &Path, path: &Path) -> String {
    to_forward_slashes(path.strip_prefix(root).unwrap_or(path))
}
