//! Cache layout constants and key validation
//!
//! ```text
//! <cache_base>/
//! └── <workspace>/
//!     └── <slug>/
//!         └── <version>/
//!             ├── manifest.json
//!             └── assets/<logical path...>
//! ```

use crate::error::{Result, path as path_error};

/// Commit marker and manifest of a cache entry
pub const MANIFEST_FILE: &str = "manifest.json";

/// Subdirectory holding raw asset bytes keyed by logical path
pub const ASSETS_DIR: &str = "assets";

/// Name prefix of in-progress staging directories inside a version directory
pub const STAGING_PREFIX: &str = ".staging-";

/// Check that a workspace, slug or version can be used as one directory name.
pub fn check_key_segment(kind: &str, value: &str) -> Result<()> {
    let reason = if value.is_empty() {
        Some("must not be empty")
    } else if value == "." || value == ".." {
        Some("must not be '.' or '..'")
    } else if value.contains(['/', '\\', '\0']) {
        Some("must be a single path segment")
    } else if value.starts_with('.') {
        Some("must not start with '.'")
    } else {
        None
    };
    match reason {
        Some(reason) => Err(path_error::unsafe_path(value, format!("{kind} {reason}"))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_segments() {
        assert!(check_key_segment("slug", "acme-bot").is_ok());
        assert!(check_key_segment("version", "1.0.0+build.5").is_ok());
        assert!(check_key_segment("slug", "").is_err());
        assert!(check_key_segment("slug", "..").is_err());
        assert!(check_key_segment("workspace", "a/b").is_err());
        assert!(check_key_segment("version", ".staging-x").is_err());
    }
}
