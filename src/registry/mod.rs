//! Remote registry collaborators
//!
//! The network client lives outside this crate. Retrieval only needs three
//! capabilities from it: resolving a version, fetching one asset by id, and
//! pulling a registry image.

mod cancel;
pub mod image;

pub use cancel::CancelToken;

use serde::Deserialize;

use crate::bundle::BundleManifest;
use crate::error::Result;

/// Answer of the resolution service for `(slug, version?)`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Concrete version the request resolved to
    pub version: String,
    /// Publication state reported by the registry (e.g. `published`)
    pub state: Option<String>,
    /// Registry image reference, when the bundle is published as an image
    pub registry_ref: Option<String>,
    /// Expected image digest
    pub registry_digest: Option<String>,
    /// Layer metadata, needed for per-asset retrieval
    pub manifest: Option<BundleManifest>,
}

/// Resolves a bundle reference to a concrete version
pub trait BundleResolver {
    fn resolve(&self, workspace: &str, slug: &str, version: Option<&str>) -> Result<Resolution>;
}

/// Fetches the raw response body for one asset id
pub trait AssetFetcher {
    fn fetch_asset(&self, asset_id: &str) -> Result<Vec<u8>>;
}

/// Registry image as downloaded
#[derive(Debug, Clone, Default)]
pub struct PulledImage {
    /// Digest of the image as reported by the registry
    pub digest: String,
    /// Config blob (JSON listing the assets)
    pub config: Vec<u8>,
    /// Layer blobs: tar streams, optionally gzip-compressed
    pub layers: Vec<Vec<u8>>,
}

/// Downloads registry images
pub trait ImagePuller {
    fn pull_image(&self, reference: &str) -> Result<PulledImage>;
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AssetEnvelope {
    content_text: String,
}

/// Unwrap a `{"contentText": "..."}` envelope; any other body is returned as-is.
pub fn decode_asset_response(body: Vec<u8>) -> Vec<u8> {
    let looks_like_object = body
        .iter()
        .find(|b| !b.is_ascii_whitespace())
        .is_some_and(|b| *b == b'{');
    if !looks_like_object {
        return body;
    }
    match serde_json::from_slice::<AssetEnvelope>(&body) {
        Ok(envelope) => envelope.content_text.into_bytes(),
        Err(_) => body,
    }
}
