//! `slug` / `slug:version` bundle references

use std::fmt;
use std::str::FromStr;

use crate::error::{MushError, Result, bundle};

/// Reference to a bundle, optionally pinned to a version.
///
/// A missing version means "latest".
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BundleRef {
    pub slug: String,
    pub version: Option<String>,
}

impl BundleRef {
    /// Reference to a specific version
    pub fn new(slug: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            version: Some(version.into()),
        }
    }

    /// Reference to the latest version of `slug`
    pub fn latest(slug: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            version: None,
        }
    }

    /// Parse `slug` or `slug:version`.
    ///
    /// Both parts end up as cache directory names, so neither may be empty,
    /// contain a path separator or be a `.`/`..` segment.
    pub fn parse(input: &str) -> Result<Self> {
        let text = input.trim();
        let (slug, version) = match text.split_once(':') {
            Some((slug, version)) => (slug, Some(version)),
            None => (text, None),
        };

        check_segment(input, "slug", slug)?;
        if let Some(version) = version {
            check_segment(input, "version", version)?;
        }

        Ok(Self {
            slug: slug.to_string(),
            version: version.map(str::to_string),
        })
    }
}

fn check_segment(input: &str, what: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(bundle::invalid_ref(input, format!("{what} is empty")));
    }
    if value == "." || value == ".." || value.contains(['/', '\\', '\0']) {
        return Err(bundle::invalid_ref(
            input,
            format!("{what} must be a single path segment"),
        ));
    }
    Ok(())
}

impl fmt::Display for BundleRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(version) => write!(f, "{}:{}", self.slug, version),
            None => write!(f, "{}", self.slug),
        }
    }
}

impl FromStr for BundleRef {
    type Err = MushError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
