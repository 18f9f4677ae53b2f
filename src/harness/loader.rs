//! Project-local harness specifications
//!
//! `<project>/.mush/harnesses.json` holds either an array of specs or an
//! object with a `harnesses` array. Comments (`//` and `/* */`) are allowed.
//! A spec whose id matches a built-in replaces it; others are added.

use std::path::{Path, PathBuf};

use super::{HarnessSpec, builtin_harnesses};
use crate::common::fs::read_optional;
use crate::config::PROJECT_STATE_DIR;
use crate::error::{Result, config as config_error};
use crate::merge::json::strip_comments;

/// File name of project-local harness specs
pub const HARNESSES_FILE: &str = "harnesses.json";

/// Harness configuration loader
pub struct HarnessLoader {
    project_dir: PathBuf,
}

impl HarnessLoader {
    pub fn new(project_dir: impl Into<PathBuf>) -> Self {
        Self {
            project_dir: project_dir.into(),
        }
    }

    fn specs_path(&self) -> PathBuf {
        self.project_dir.join(PROJECT_STATE_DIR).join(HARNESSES_FILE)
    }

    /// Built-in harnesses overridden by project-local specs
    pub fn load(&self) -> Result<Vec<HarnessSpec>> {
        let mut harnesses = builtin_harnesses();
        if let Some(local) = self.load_project_specs()? {
            harnesses = merge_specs(harnesses, local);
        }
        Ok(harnesses)
    }

    fn load_project_specs(&self) -> Result<Option<Vec<HarnessSpec>>> {
        let path = self.specs_path();
        let Some(bytes) = read_optional(&path)? else {
            return Ok(None);
        };
        let content = String::from_utf8_lossy(&bytes);
        let specs = parse_specs(&strip_comments(&content), &path)?;
        for spec in &specs {
            spec.validate()?;
        }
        Ok(Some(specs))
    }
}

/// Later specs replace earlier ones with the same id; new ids are appended.
fn merge_specs(base: Vec<HarnessSpec>, overrides: Vec<HarnessSpec>) -> Vec<HarnessSpec> {
    let mut merged = base;
    for spec in overrides {
        if let Some(pos) = merged.iter().position(|h| h.id == spec.id) {
            merged[pos] = spec;
        } else {
            merged.push(spec);
        }
    }
    merged
}

fn parse_specs(json: &str, path: &Path) -> Result<Vec<HarnessSpec>> {
    let label = path.display().to_string();
    let value: serde_json::Value = serde_json::from_str(json)
        .map_err(|e| config_error::parse_failed(&label, e.to_string()))?;

    let list = match value {
        serde_json::Value::Array(_) => value,
        serde_json::Value::Object(mut obj) => match obj.remove("harnesses") {
            Some(list @ serde_json::Value::Array(_)) => list,
            Some(_) => {
                return Err(config_error::parse_failed(
                    &label,
                    "harnesses field must be an array",
                ));
            }
            None => {
                return Err(config_error::parse_failed(
                    &label,
                    "Expected array of harnesses or object with 'harnesses' key",
                ));
            }
        },
        _ => {
            return Err(config_error::parse_failed(
                &label,
                "Expected array of harnesses or object with 'harnesses' key",
            ));
        }
    };
    serde_json::from_value(list).map_err(|e| config_error::parse_failed(&label, e.to_string()))
}
