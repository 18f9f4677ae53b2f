//! Retrieval pipeline: resolve, check the cache, fetch, verify, commit
//!
//! A registry image is preferred when the resolution names one. Any failure
//! there falls back to per-asset API retrieval, which needs the resolved
//! manifest to list asset ids and content hashes. Whatever fails after
//! staging began leaves no trace in the cache.

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::bundle::{BundleManifest, BundleRef, CachedManifest, ManifestSource};
use crate::cache::{Cache, CacheEntry, Staging};
use crate::cache::paths::check_key_segment;
use crate::common::fs::write_file;
use crate::error::{MushError, Result, registry as registry_error};
use crate::hash::verify_sha256;
use crate::path_utils::resolve_within;
use crate::registry::image::extract_image;
use crate::registry::{
    AssetFetcher, BundleResolver, CancelToken, ImagePuller, Resolution, decode_asset_response,
};

/// Where the assets of a pull came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullSource {
    /// Already committed; no asset retrieval happened
    Cache,
    Image,
    Api,
}

/// Result of a successful pull
#[derive(Debug, Clone)]
pub struct PullOutcome {
    pub entry: CacheEntry,
    pub manifest: CachedManifest,
    pub source: PullSource,
}

impl PullOutcome {
    pub fn is_cache_hit(&self) -> bool {
        self.source == PullSource::Cache
    }
}

/// Pulls bundles into a [`Cache`] through the registry collaborators
pub struct Puller<'a> {
    cache: &'a Cache,
    resolver: &'a dyn BundleResolver,
    fetcher: &'a dyn AssetFetcher,
    images: Option<&'a dyn ImagePuller>,
    cancel: CancelToken,
}

impl<'a> Puller<'a> {
    pub fn new(
        cache: &'a Cache,
        resolver: &'a dyn BundleResolver,
        fetcher: &'a dyn AssetFetcher,
    ) -> Self {
        Self {
            cache,
            resolver,
            fetcher,
            images: None,
            cancel: CancelToken::new(),
        }
    }

    /// Enable registry image pulls
    pub fn with_images(mut self, images: &'a dyn ImagePuller) -> Self {
        self.images = Some(images);
        self
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Make `reference` available in the cache and return its entry.
    ///
    /// Pulling an already committed version is a cache hit and performs no
    /// asset retrieval.
    pub fn pull(&self, workspace: &str, reference: &BundleRef) -> Result<PullOutcome> {
        self.cancel.check()?;
        let resolution = self
            .resolver
            .resolve(workspace, &reference.slug, reference.version.as_deref())?;
        check_key_segment("version", &resolution.version)?;

        let entry = self.cache.entry(workspace, &reference.slug, &resolution.version)?;
        if entry.is_committed() {
            debug!(bundle = %entry.label(), workspace, "cache hit");
            return Ok(PullOutcome {
                manifest: entry.load_manifest()?,
                entry,
                source: PullSource::Cache,
            });
        }

        let mut staging = Staging::begin(self.cache.cache_dir(), &entry)?;
        let (manifest, source) = self.retrieve(&entry, &resolution, &mut staging)?;

        let cached = CachedManifest {
            workspace: workspace.to_string(),
            slug: reference.slug.clone(),
            version: resolution.version.clone(),
            registry_ref: resolution.registry_ref.clone(),
            registry_digest: resolution.registry_digest.clone(),
            source: Some(match source {
                PullSource::Image => ManifestSource::Image,
                _ => ManifestSource::Api,
            }),
            pulled_at: Some(Utc::now()),
            manifest,
        };
        let entry = staging.commit(&cached)?;
        info!(bundle = %entry.label(), workspace, source = ?source, "pulled bundle");

        Ok(PullOutcome {
            entry,
            manifest: cached,
            source,
        })
    }

    fn retrieve(
        &self,
        entry: &CacheEntry,
        resolution: &Resolution,
        staging: &mut Staging,
    ) -> Result<(BundleManifest, PullSource)> {
        if let (Some(reference), Some(images)) = (resolution.registry_ref.as_deref(), self.images) {
            match self.pull_image(images, reference, resolution, staging) {
                Ok(manifest) => return Ok((manifest, PullSource::Image)),
                Err(MushError::Cancelled) => return Err(MushError::Cancelled),
                Err(e) => {
                    warn!(bundle = %entry.label(), reference, error = %e, "registry pull failed, falling back to asset API");
                    staging.reset()?;
                }
            }
        }

        let manifest = self.fetch_assets(entry, resolution, staging)?;
        Ok((manifest, PullSource::Api))
    }

    fn pull_image(
        &self,
        images: &dyn ImagePuller,
        reference: &str,
        resolution: &Resolution,
        staging: &Staging,
    ) -> Result<BundleManifest> {
        self.cancel.check()?;
        let image = images.pull_image(reference)?;
        extract_image(
            reference,
            &image,
            resolution.registry_digest.as_deref(),
            staging.root(),
        )
    }

    fn fetch_assets(
        &self,
        entry: &CacheEntry,
        resolution: &Resolution,
        staging: &Staging,
    ) -> Result<BundleManifest> {
        let manifest = resolution
            .manifest
            .clone()
            .filter(BundleManifest::has_retrievable_assets)
            .ok_or_else(|| registry_error::no_retrievable_assets(entry.label()))?;
        manifest.validate()?;

        for layer in &manifest.layers {
            if !layer.is_retrievable() {
                return Err(registry_error::asset_fetch_failed(
                    &layer.logical_path,
                    "layer has no asset id or content hash",
                ));
            }
            self.cancel.check()?;
            let body = self.fetcher.fetch_asset(&layer.asset_id)?;
            let bytes = decode_asset_response(body);
            verify_sha256(&layer.logical_path, &layer.content_sha256, &bytes)?;
            write_file(&resolve_within(staging.root(), &layer.logical_path)?, &bytes)?;
            debug!(asset = %layer.logical_path, bytes = bytes.len(), "fetched asset");
        }
        Ok(manifest)
    }
}
