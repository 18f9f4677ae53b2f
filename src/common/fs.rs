//! Common file system operations with unified error handling

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, fs as fs_error};

/// Ensure parent directory exists for a path
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| fs_error::write_failed(parent, &e))?;
    }
    Ok(())
}

/// Read a whole file
pub fn read_file(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| fs_error::read_failed(path, &e))
}

/// Read a file if it exists; `None` when it does not
pub fn read_optional(path: &Path) -> Result<Option<Vec<u8>>> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(fs_error::read_failed(path, &e)),
    }
}

/// Create parent directories and write a file
pub fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    ensure_parent_dir(path)?;
    fs::write(path, bytes).map_err(|e| fs_error::write_failed(path, &e))
}

/// Write a file so readers never observe a partial write.
///
/// The content goes to a temp file in the destination directory (so the
/// rename stays on one volume) and is renamed into place. Where rename cannot
/// replace an existing file, the destination is removed and the rename retried.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    ensure_parent_dir(path)?;
    let tmp_path = temp_sibling(path);

    fs::write(&tmp_path, bytes).map_err(|e| fs_error::write_failed(&tmp_path, &e))?;

    if fs::rename(&tmp_path, path).is_ok() {
        return Ok(());
    }

    let retried = match fs::remove_file(path) {
        Ok(()) => fs::rename(&tmp_path, path),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => fs::rename(&tmp_path, path),
        Err(e) => Err(e),
    };
    retried.map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        fs_error::write_failed(path, &e)
    })
}

fn temp_sibling(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.tmp-{}", std::process::id()))
}

/// Whether a directory exists and has no entries
pub fn is_empty_dir(path: &Path) -> bool {
    fs::read_dir(path)
        .map(|mut d| d.next().is_none())
        .unwrap_or(false)
}

/// Remove empty directories from `start` upwards, stopping at `stop_at`
/// (exclusive) or at the first non-empty directory.
pub fn prune_empty_dirs(start: &Path, stop_at: &Path) {
    let mut current = Some(start);
    while let Some(dir) = current {
        if dir == stop_at || !dir.starts_with(stop_at) || !is_empty_dir(dir) {
            break;
        }
        if fs::remove_dir(dir).is_err() {
            break;
        }
        current = dir.parent();
    }
}

/// Ancestors of `path` (excluding `path` itself) under `root` that do not
/// exist yet, deepest first.
pub fn missing_ancestors(path: &Path, root: &Path) -> Vec<PathBuf> {
    path.ancestors()
        .skip(1)
        .take_while(|dir| *dir != root && dir.starts_with(root))
        .filter(|dir| !dir.exists())
        .map(Path::to_path_buf)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::create_temp_dir;

    #[test]
    fn test_ensure_parent_dir() {
        let temp = create_temp_dir();
        let file_path = temp.path().join("subdir/nested/file.txt");

        ensure_parent_dir(&file_path).unwrap();
        assert!(file_path.parent().unwrap().exists());
    }

    #[test]
    fn test_read_optional_missing() {
        let temp = create_temp_dir();
        assert!(read_optional(&temp.path().join("nope")).unwrap().is_none());
    }

    #[test]
    fn test_write_atomic_replaces_and_leaves_no_temp() {
        let temp = create_temp_dir();
        let path = temp.path().join(".mush/installed.json");
        write_atomic(&path, b"[]").unwrap();
        write_atomic(&path, b"[1]").unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"[1]");
        let leftovers: Vec<_> = fs::read_dir(path.parent().unwrap())
            .unwrap()
            .filter_map(std::result::Result::ok)
            .filter(|e| e.file_name().to_string_lossy().contains(".tmp-"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_prune_empty_dirs_stops_at_root_and_non_empty() {
        let temp = create_temp_dir();
        let root = temp.path();
        fs::create_dir_all(root.join("a/b/c")).unwrap();
        fs::write(root.join("a/keep.txt"), "x").unwrap();

        prune_empty_dirs(&root.join("a/b/c"), root);

        assert!(!root.join("a/b").exists());
        assert!(root.join("a").exists());
    }

    #[test]
    fn test_missing_ancestors_deepest_first() {
        let temp = create_temp_dir();
        let root = temp.path();
        fs::create_dir_all(root.join(".claude")).unwrap();

        let missing = missing_ancestors(&root.join(".claude/skills/review/SKILL.md"), root);
        assert_eq!(
            missing,
            vec![
                root.join(".claude/skills/review"),
                root.join(".claude/skills"),
            ]
        );
    }
}
