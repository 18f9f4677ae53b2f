//! Integrity errors

use super::MushError;

/// Creates a SHA-256 mismatch error for a single asset
pub fn hash_mismatch(
    path: impl Into<String>,
    expected: impl Into<String>,
    actual: impl Into<String>,
) -> MushError {
    MushError::HashMismatch {
        path: path.into(),
        expected: expected.into(),
        actual: actual.into(),
    }
}

/// Creates an image digest mismatch error
pub fn digest_mismatch(
    reference: impl Into<String>,
    expected: impl Into<String>,
    actual: impl Into<String>,
) -> MushError {
    MushError::DigestMismatch {
        reference: reference.into(),
        expected: expected.into(),
        actual: actual.into(),
    }
}
