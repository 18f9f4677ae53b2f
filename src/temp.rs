//! Scratch directories for ephemeral harness runs, never created under the
//! current working directory (e.g. when TMPDIR=tmp or TMPDIR=./tmp).

use std::env;
use std::path::PathBuf;

use tempfile::TempDir;

use crate::error::{Result, fs as fs_error};

/// Returns a directory path suitable for creating temporary directories.
/// Never returns a relative path.
pub fn temp_dir_base() -> PathBuf {
    let t = env::temp_dir();
    if t.is_absolute() {
        t
    } else {
        #[cfg(windows)]
        {
            env::var("TEMP")
                .or_else(|_| env::var("TMP"))
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("C:\\Windows\\Temp"))
        }
        #[cfg(not(windows))]
        {
            PathBuf::from("/tmp")
        }
    }
}

/// Create a fresh scratch directory named `mush-<label>-XXXX` under [`temp_dir_base`].
pub fn scratch_dir(label: &str) -> Result<TempDir> {
    let base = temp_dir_base();
    tempfile::Builder::new()
        .prefix(&format!("mush-{label}-"))
        .tempdir_in(&base)
        .map_err(|e| fs_error::write_failed(&base, &e))
}
