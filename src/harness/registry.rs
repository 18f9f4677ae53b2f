//! Harness registry: lookup by id

use std::collections::HashMap;
use std::path::Path;

use super::loader::HarnessLoader;
use super::{AssetMapper, HarnessSpec, SpecMapper, builtin_harnesses};
use crate::error::{Result, harness as harness_error};

/// Registry of known harnesses
pub struct HarnessRegistry {
    harnesses: Vec<HarnessSpec>,
    by_id: HashMap<String, usize>,
}

impl HarnessRegistry {
    pub fn new(harnesses: Vec<HarnessSpec>) -> Self {
        let by_id = harnesses
            .iter()
            .enumerate()
            .map(|(idx, h)| (h.id.clone(), idx))
            .collect();
        Self { harnesses, by_id }
    }

    /// Registry with only the built-in harnesses
    pub fn builtin() -> Self {
        Self::new(builtin_harnesses())
    }

    /// Built-ins plus the project's `.mush/harnesses.json`
    pub fn load(project_dir: &Path) -> Result<Self> {
        Ok(Self::new(HarnessLoader::new(project_dir).load()?))
    }

    pub fn get(&self, id: &str) -> Result<&HarnessSpec> {
        self.by_id
            .get(id)
            .and_then(|&idx| self.harnesses.get(idx))
            .ok_or_else(|| harness_error::not_found(id))
    }

    /// Mapper for a harness id
    pub fn mapper(&self, id: &str) -> Result<Box<dyn AssetMapper>> {
        Ok(Box::new(SpecMapper::new(self.get(id)?.clone())))
    }

    /// Known ids, in registration order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.harnesses.iter().map(|h| h.id.as_str())
    }
}
