//! SHA-256 hashing utilities for asset integrity

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::error::{Result, fs as fs_error, integrity};

/// Prefix used by registries for SHA-256 digests
pub const HASH_PREFIX: &str = "sha256:";

/// Hex-encoded SHA-256 of a byte slice
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Hex-encoded SHA-256 of a file, read in chunks
pub fn hash_file(path: &Path) -> Result<String> {
    let file = File::open(path).map_err(|e| fs_error::read_failed(path, &e))?;

    let mut reader = BufReader::new(file);
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];

    loop {
        let bytes_read = reader
            .read(&mut buffer)
            .map_err(|e| fs_error::read_failed(path, &e))?;

        if bytes_read == 0 {
            break;
        }

        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// Strip an optional `sha256:` prefix and lowercase the hex digits.
pub fn normalize_digest(digest: &str) -> String {
    digest
        .trim()
        .strip_prefix(HASH_PREFIX)
        .unwrap_or(digest.trim())
        .to_ascii_lowercase()
}

/// Compare two digests, ignoring prefix and case
pub fn digests_match(expected: &str, actual: &str) -> bool {
    normalize_digest(expected) == normalize_digest(actual)
}

/// Verify that `bytes` hash to `expected`; `label` names the asset in the error.
pub fn verify_sha256(label: &str, expected: &str, bytes: &[u8]) -> Result<()> {
    let actual = sha256_hex(bytes);
    if digests_match(expected, &actual) {
        Ok(())
    } else {
        Err(integrity::hash_mismatch(
            label,
            normalize_digest(expected),
            actual,
        ))
    }
}
