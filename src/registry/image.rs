//! Extracting bundle assets from a pulled registry image
//!
//! The image config lists assets by logical path and content digest. Layer
//! tarballs only carry the bytes; files are matched to assets by their own
//! SHA-256, so a payload shared by several assets is stored once.

use std::collections::HashMap;
use std::io::{Cursor, Read};
use std::path::{Component, Path};

use flate2::read::GzDecoder;
use serde::Deserialize;
use tracing::debug;

use crate::bundle::{AssetType, BundleLayer, BundleManifest};
use crate::common::fs::write_file;
use crate::error::{Result, config as config_error, integrity, registry as registry_error};
use crate::hash::{digests_match, normalize_digest, sha256_hex};
use crate::path_utils::{resolve_within, validate_logical_path};

use super::PulledImage;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImageAsset {
    #[serde(alias = "logical_path")]
    logical_path: String,
    #[serde(alias = "asset_type")]
    asset_type: AssetType,
    #[serde(alias = "content_sha256")]
    content_sha256: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ImageConfig {
    Wrapped { assets: Vec<ImageAsset> },
    Bare(Vec<ImageAsset>),
}

impl ImageConfig {
    fn into_assets(self) -> Vec<ImageAsset> {
        match self {
            ImageConfig::Wrapped { assets } | ImageConfig::Bare(assets) => assets,
        }
    }
}

/// Write every asset listed in the image config under `staging` and return
/// the resulting manifest, sorted by logical path.
///
/// `expected_digest`, when given, must match the image digest exactly
/// (ignoring a `sha256:` prefix and case).
pub fn extract_image(
    reference: &str,
    image: &PulledImage,
    expected_digest: Option<&str>,
    staging: &Path,
) -> Result<BundleManifest> {
    if let Some(expected) = expected_digest.filter(|d| !d.trim().is_empty()) {
        if !digests_match(expected, &image.digest) {
            return Err(integrity::digest_mismatch(
                reference,
                normalize_digest(expected),
                normalize_digest(&image.digest),
            ));
        }
    }

    let config: ImageConfig = serde_json::from_slice(&image.config)
        .map_err(|e| config_error::parse_failed(format!("image config of {reference}"), e.to_string()))?;

    let mut payloads: HashMap<String, Vec<u8>> = HashMap::new();
    for layer in &image.layers {
        read_layer(layer, &mut payloads)?;
    }
    debug!(reference, payloads = payloads.len(), "read image layers");

    let mut layers = Vec::new();
    for asset in config.into_assets() {
        validate_logical_path(&asset.logical_path)?;
        let digest = normalize_digest(&asset.content_sha256);
        let bytes = payloads
            .get(&digest)
            .ok_or_else(|| registry_error::payload_not_found(&asset.logical_path, &digest))?;

        let dest = resolve_within(staging, &asset.logical_path)?;
        write_file(&dest, bytes)?;

        layers.push(BundleLayer {
            asset_id: String::new(),
            logical_path: asset.logical_path,
            asset_type: asset.asset_type,
            content_sha256: digest,
            size_bytes: i64::try_from(bytes.len()).unwrap_or(i64::MAX),
        });
    }

    let mut manifest = BundleManifest::new(layers);
    manifest.sort_by_path();
    Ok(manifest)
}

fn read_layer(blob: &[u8], payloads: &mut HashMap<String, Vec<u8>>) -> Result<()> {
    if blob.starts_with(&GZIP_MAGIC) {
        read_tar(GzDecoder::new(Cursor::new(blob)), payloads)
    } else {
        read_tar(Cursor::new(blob), payloads)
    }
}

fn read_tar<R: Read>(reader: R, payloads: &mut HashMap<String, Vec<u8>>) -> Result<()> {
    let mut archive = tar::Archive::new(reader);
    let entries = archive
        .entries()
        .map_err(|e| registry_error::unsupported_entry("<layer>", e.to_string()))?;

    for entry in entries {
        let mut entry = entry.map_err(|e| registry_error::unsupported_entry("<layer>", e.to_string()))?;
        let name = entry
            .path()
            .map_err(|e| registry_error::unsupported_entry("<layer>", e.to_string()))?
            .into_owned();
        let display = name.display().to_string();

        if !stays_in_layer(&name) {
            return Err(registry_error::unsupported_entry(
                display,
                "path is absolute or escapes the layer root",
            ));
        }

        let entry_type = entry.header().entry_type();
        if entry_type.is_dir() {
            continue;
        }
        if !entry_type.is_file() {
            return Err(registry_error::unsupported_entry(
                display,
                "only regular files and directories are allowed",
            ));
        }

        let mut bytes = Vec::new();
        entry
            .read_to_end(&mut bytes)
            .map_err(|e| registry_error::unsupported_entry(&display, e.to_string()))?;
        payloads.entry(sha256_hex(&bytes)).or_insert(bytes);
    }
    Ok(())
}

fn stays_in_layer(name: &Path) -> bool {
    name.components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}
