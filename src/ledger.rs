//! Project-local record of installed bundles
//!
//! Stored at `<project>/.mush/installed.json` as a JSON array. There is one
//! record per `(slug, harness)`; installing again replaces it. The file is
//! always rewritten through a same-directory temp file and a rename.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::fs::{read_optional, write_atomic};
use crate::config::PROJECT_STATE_DIR;
use crate::error::{Result, config as config_error};

/// Ledger file name inside the project state directory
pub const LEDGER_FILE: &str = "installed.json";

/// One installed bundle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstalledBundle {
    pub slug: String,
    pub version: String,
    pub harness: String,
    /// Project-relative paths written by the install, slash-separated
    #[serde(default)]
    pub assets: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

/// The ledger of one project
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    entries: Vec<InstalledBundle>,
}

/// Path of the ledger file for a project
pub fn ledger_path(project_dir: &Path) -> PathBuf {
    project_dir.join(PROJECT_STATE_DIR).join(LEDGER_FILE)
}

impl Ledger {
    /// Load the ledger; a missing or empty file is an empty ledger
    pub fn load(project_dir: &Path) -> Result<Self> {
        let path = ledger_path(project_dir);
        let Some(bytes) = read_optional(&path)? else {
            return Ok(Self::default());
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        let entries = serde_json::from_slice(&bytes)
            .map_err(|e| config_error::parse_failed(path.display().to_string(), e.to_string()))?;
        Ok(Self { entries })
    }

    /// Write the ledger atomically
    pub fn save(&self, project_dir: &Path) -> Result<()> {
        let mut json = serde_json::to_vec_pretty(&self.entries)?;
        json.push(b'\n');
        write_atomic(&ledger_path(project_dir), &json)
    }

    pub fn entries(&self) -> &[InstalledBundle] {
        &self.entries
    }

    pub fn get(&self, slug: &str, harness: &str) -> Option<&InstalledBundle> {
        self.entries
            .iter()
            .find(|e| e.slug == slug && e.harness == harness)
    }

    /// Add a record, replacing any record for the same slug and harness
    pub fn record(&mut self, bundle: InstalledBundle) {
        match self
            .entries
            .iter_mut()
            .find(|e| e.slug == bundle.slug && e.harness == bundle.harness)
        {
            Some(existing) => *existing = bundle,
            None => self.entries.push(bundle),
        }
    }

    /// Remove and return the record for a slug and harness
    pub fn remove(&mut self, slug: &str, harness: &str) -> Option<InstalledBundle> {
        let pos = self
            .entries
            .iter()
            .position(|e| e.slug == slug && e.harness == harness)?;
        Some(self.entries.remove(pos))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
