//! Asset retrieval errors

use super::MushError;

/// Creates a no retrievable asset metadata error
pub fn no_retrievable_assets(name: impl Into<String>) -> MushError {
    MushError::NoRetrievableAssets { name: name.into() }
}

/// Creates a payload not found error
pub fn payload_not_found(path: impl Into<String>, digest: impl Into<String>) -> MushError {
    MushError::PayloadNotFound {
        path: path.into(),
        digest: digest.into(),
    }
}

/// Creates an image pull failed error
pub fn image_pull_failed(reference: impl Into<String>, reason: impl Into<String>) -> MushError {
    MushError::ImagePullFailed {
        reference: reference.into(),
        reason: reason.into(),
    }
}

/// Creates an asset fetch failed error
pub fn asset_fetch_failed(asset_id: impl Into<String>, reason: impl Into<String>) -> MushError {
    MushError::AssetFetchFailed {
        asset_id: asset_id.into(),
        reason: reason.into(),
    }
}

/// Creates an unsupported archive entry error
pub fn unsupported_entry(entry: impl Into<String>, reason: impl Into<String>) -> MushError {
    MushError::UnsupportedArchiveEntry {
        entry: entry.into(),
        reason: reason.into(),
    }
}
