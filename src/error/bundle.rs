//! Bundle reference and resolution errors

use super::MushError;

/// Creates an invalid bundle reference error
pub fn invalid_ref(input: impl Into<String>, reason: impl Into<String>) -> MushError {
    MushError::InvalidBundleRef {
        input: input.into(),
        reason: reason.into(),
    }
}

/// Creates a resolution failed error
pub fn resolution_failed(name: impl Into<String>, reason: impl Into<String>) -> MushError {
    MushError::ResolutionFailed {
        name: name.into(),
        reason: reason.into(),
    }
}

/// Creates a bundle not cached error
pub fn not_cached(name: impl Into<String>) -> MushError {
    MushError::BundleNotCached { name: name.into() }
}

/// Creates a bundle not installed error
pub fn not_installed(slug: impl Into<String>, harness: impl Into<String>) -> MushError {
    MushError::BundleNotInstalled {
        slug: slug.into(),
        harness: harness.into(),
    }
}
