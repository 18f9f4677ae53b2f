//! Error types and handling for mush
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! This module is organized into sub-modules by error domain:
//! - [`bundle`]: Bundle reference and resolution errors
//! - [`integrity`]: Content digest mismatches
//! - [`path`]: Unsafe paths derived from manifest data
//! - [`install`]: Materialization conflicts
//! - [`registry`]: Asset retrieval errors
//! - [`frontmatter`]: Document metadata errors
//! - [`harness`]: Harness specification errors
//! - [`config`]: Configuration errors
//! - [`fs`]: File system errors
//! - [`cache`]: Cache errors

pub mod bundle;
pub mod cache;
pub mod config;
pub mod frontmatter;
pub mod fs;
pub mod harness;
pub mod install;
pub mod integrity;
pub mod path;
pub mod registry;

use std::path::{Path, PathBuf};

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for mush operations
#[derive(Error, Diagnostic, Debug)]
pub enum MushError {
    // Bundle errors
    #[error("Invalid bundle reference '{input}': {reason}")]
    #[diagnostic(
        code(mush::bundle::invalid_ref),
        help("Bundle references have the form <slug> or <slug>:<version>")
    )]
    InvalidBundleRef { input: String, reason: String },

    #[error("Failed to resolve bundle '{name}': {reason}")]
    #[diagnostic(code(mush::bundle::resolution_failed))]
    ResolutionFailed { name: String, reason: String },

    #[error("Bundle '{name}' is not cached")]
    #[diagnostic(
        code(mush::bundle::not_cached),
        help("Pull the bundle into the cache before installing it")
    )]
    BundleNotCached { name: String },

    #[error("Bundle '{slug}' is not installed for harness '{harness}'")]
    #[diagnostic(
        code(mush::bundle::not_installed),
        help("Run 'mush list' to see installed bundles")
    )]
    BundleNotInstalled { slug: String, harness: String },

    // Integrity errors
    #[error("SHA-256 mismatch for '{path}': expected {expected}, got {actual}")]
    #[diagnostic(
        code(mush::integrity::hash_mismatch),
        help("The content does not match the digest recorded in the manifest")
    )]
    HashMismatch {
        path: String,
        expected: String,
        actual: String,
    },

    #[error("Digest mismatch for image '{reference}': expected {expected}, got {actual}")]
    #[diagnostic(code(mush::integrity::digest_mismatch))]
    DigestMismatch {
        reference: String,
        expected: String,
        actual: String,
    },

    // Path safety errors
    #[error("Unsafe asset path '{path}': {reason}")]
    #[diagnostic(
        code(mush::path::unsafe_path),
        help("Asset paths must be relative and must not contain '..' segments")
    )]
    UnsafePath { path: String, reason: String },

    #[error("Path '{path}' resolves outside of '{root}'")]
    #[diagnostic(code(mush::path::escapes_root))]
    PathEscapesRoot { path: String, root: String },

    // Install errors
    #[error("Refusing to overwrite existing file: {}", path.display())]
    #[diagnostic(
        code(mush::install::conflict),
        help("Re-run with --force to overwrite, or remove the file first")
    )]
    InstallConflict { path: PathBuf },

    #[error("Layers '{first}' and '{second}' both map to {}", path.display())]
    #[diagnostic(code(mush::install::duplicate_destination))]
    DuplicateDestination {
        path: PathBuf,
        first: String,
        second: String,
    },

    #[error("Harness '{harness}' does not support {asset_type} assets")]
    #[diagnostic(code(mush::install::unsupported_asset))]
    UnsupportedAsset { harness: String, asset_type: String },

    // Registry errors
    #[error("No retrievable asset metadata for '{name}'")]
    #[diagnostic(
        code(mush::registry::no_asset_metadata),
        help("The registry did not return asset ids and hashes for this version")
    )]
    NoRetrievableAssets { name: String },

    #[error("Payload for '{path}' (sha256 {digest}) not found in image layers")]
    #[diagnostic(code(mush::registry::payload_not_found))]
    PayloadNotFound { path: String, digest: String },

    #[error("Failed to pull registry image '{reference}': {reason}")]
    #[diagnostic(code(mush::registry::image_pull_failed))]
    ImagePullFailed { reference: String, reason: String },

    #[error("Failed to fetch asset '{asset_id}': {reason}")]
    #[diagnostic(code(mush::registry::asset_fetch_failed))]
    AssetFetchFailed { asset_id: String, reason: String },

    #[error("Unsupported archive entry '{entry}': {reason}")]
    #[diagnostic(code(mush::registry::unsupported_entry))]
    UnsupportedArchiveEntry { entry: String, reason: String },

    #[error("Operation cancelled")]
    #[diagnostic(code(mush::registry::cancelled))]
    Cancelled,

    // Frontmatter errors
    #[error("Invalid frontmatter: {reason}")]
    #[diagnostic(
        code(mush::frontmatter::invalid),
        help("Values containing ': ' must be quoted, e.g. description: \"Use when: reviewing\"")
    )]
    FrontmatterInvalid { reason: String },

    #[error("No repair possible for frontmatter: {reason}")]
    #[diagnostic(code(mush::frontmatter::no_repair))]
    FrontmatterUnrepairable { reason: String },

    // Harness errors
    #[error("Unknown harness: {id}")]
    #[diagnostic(
        code(mush::harness::not_found),
        help("Built-in harnesses: claude, codex, cursor, gemini, opencode")
    )]
    HarnessNotFound { id: String },

    #[error("Failed to load harness specification: {message}")]
    #[diagnostic(code(mush::harness::config_failed))]
    HarnessConfigFailed { message: String },

    // Configuration errors
    #[error("Failed to parse {path}: {reason}")]
    #[diagnostic(code(mush::config::parse_failed))]
    ConfigParseFailed { path: String, reason: String },

    #[error("Invalid configuration: {message}")]
    #[diagnostic(code(mush::config::invalid))]
    ConfigInvalid { message: String },

    // File system errors
    #[error("Failed to read file: {path}: {reason}")]
    #[diagnostic(code(mush::fs::read_failed))]
    FileReadFailed { path: String, reason: String },

    #[error("Failed to write file: {path}: {reason}")]
    #[diagnostic(code(mush::fs::write_failed))]
    FileWriteFailed { path: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(mush::fs::io_error))]
    IoError { message: String },

    // Cache errors
    #[error("Cache operation failed: {message}")]
    #[diagnostic(code(mush::cache::operation_failed))]
    CacheOperationFailed { message: String },
}

impl MushError {
    /// The destination that blocked an install, if this is a conflict.
    pub fn conflict_path(&self) -> Option<&Path> {
        match self {
            MushError::InstallConflict { path } => Some(path),
            _ => None,
        }
    }

    /// Whether the error came from content verification.
    pub fn is_integrity(&self) -> bool {
        matches!(
            self,
            MushError::HashMismatch { .. } | MushError::DigestMismatch { .. }
        )
    }
}

impl From<std::io::Error> for MushError {
    fn from(err: std::io::Error) -> Self {
        MushError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for MushError {
    fn from(err: serde_yaml::Error) -> Self {
        MushError::ConfigParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for MushError {
    fn from(err: serde_json::Error) -> Self {
        MushError::ConfigParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, MushError>;
