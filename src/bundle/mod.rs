//! Bundle data model
//!
//! A bundle is a versioned collection of skill, agent-definition and
//! tool-config assets. This module holds the reference type used to name a
//! bundle and the manifest types persisted in the content cache.

mod manifest;
mod reference;

pub use manifest::{AssetType, BundleLayer, BundleManifest, CachedManifest, ManifestSource};
pub use reference::BundleRef;
