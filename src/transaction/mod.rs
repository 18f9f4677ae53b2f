//! Reversible file writes inside a project directory
//!
//! Every write records the destination's previous bytes (or that it did not
//! exist) and the ancestor directories it had to create. Reverting restores
//! the previous bytes verbatim, deletes files that did not exist, and removes
//! created directories that are empty again, deepest first.
//!
//! ## Usage
//!
//! ```ignore
//! let mut transaction = Transaction::new(project_dir);
//! transaction.write(&dest, &bytes)?;
//!
//! // On success:
//! transaction.commit();
//!
//! // On error (automatic via Drop if not committed):
//! // rollback happens automatically
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::common::fs::{is_empty_dir, missing_ancestors, read_optional, write_atomic, write_file};
use crate::error::{MushError, Result, fs as fs_error};
use crate::path_utils::ensure_within;

/// Previous state of a written file
#[derive(Debug, Clone)]
struct Backup {
    path: PathBuf,
    /// `None` when the file did not exist before
    original: Option<Vec<u8>>,
}

/// A set of writes that can be reverted as a unit
#[derive(Debug)]
pub struct Transaction {
    root: PathBuf,

    /// First-write backups, in write order
    backups: Vec<Backup>,

    seen: HashSet<PathBuf>,

    /// Directories created by writes, in creation order
    created_dirs: Vec<PathBuf>,

    committed: bool,
}

impl Transaction {
    /// Start a transaction confined to `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            backups: Vec::new(),
            seen: HashSet::new(),
            created_dirs: Vec::new(),
            committed: false,
        }
    }

    /// Write `bytes` to `path`, remembering what was there before
    pub fn write(&mut self, path: &Path, bytes: &[u8]) -> Result<()> {
        ensure_within(&self.root, path)?;
        if self.seen.insert(path.to_path_buf()) {
            let original = read_optional(path)?;
            for dir in missing_ancestors(path, &self.root) {
                if !self.created_dirs.contains(&dir) {
                    self.created_dirs.push(dir);
                }
            }
            self.backups.push(Backup {
                path: path.to_path_buf(),
                original,
            });
        }
        write_file(path, bytes)
    }

    /// Files that did not exist before this transaction, in write order
    #[cfg(test)]
    pub fn created_files(&self) -> Vec<PathBuf> {
        self.backups
            .iter()
            .filter(|b| b.original.is_none())
            .map(|b| b.path.clone())
            .collect()
    }

    /// Every file written, in write order
    pub fn written_files(&self) -> Vec<PathBuf> {
        self.backups.iter().map(|b| b.path.clone()).collect()
    }

    /// Directories created by this transaction, deepest first
    pub fn created_dirs(&self) -> Vec<PathBuf> {
        let mut dirs = self.created_dirs.clone();
        dirs.sort_by_key(|d| std::cmp::Reverse(d.components().count()));
        dirs
    }

    /// Keep every write
    pub fn commit(mut self) {
        self.committed = true;
    }

    /// Undo every write; the first failure is returned after all steps ran
    pub fn rollback(mut self) -> Result<()> {
        self.committed = true;
        self.revert()
    }

    fn revert(&mut self) -> Result<()> {
        let mut first_error: Option<MushError> = None;

        for backup in self.backups.iter().rev() {
            let result = match &backup.original {
                Some(bytes) => write_atomic(&backup.path, bytes),
                None => match fs::remove_file(&backup.path) {
                    Ok(()) => Ok(()),
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                    Err(e) => Err(fs_error::write_failed(&backup.path, &e)),
                },
            };
            if let Err(e) = result {
                first_error.get_or_insert(e);
            }
        }

        for dir in self.created_dirs() {
            if is_empty_dir(&dir) {
                if let Err(e) = fs::remove_dir(&dir) {
                    first_error.get_or_insert(fs_error::write_failed(&dir, &e));
                }
            }
        }

        self.backups.clear();
        self.created_dirs.clear();
        first_error.map_or(Ok(()), Err)
    }
}

impl Drop for Transaction {
    fn drop(&mut self) {
        if !self.committed {
            if let Err(e) = self.revert() {
                warn!(error = %e, "rollback failed");
            }
        }
    }
}

#[cfg(test)]
mod tests;
