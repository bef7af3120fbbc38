//! The standards catalogue.
//!
//! An immutable, ordered list of [`Standard`]s with id lookup. Catalogue
//! order is the display order every query preserves.

use std::collections::HashMap;
use std::path::Path;

use standards_state::{CatalogSource, Standard, StandardId};
use tracing::debug;

use crate::error::{ComplianceError, Result};

const BUNDLED_CATALOG: &str = include_str!("../data/standards.json");

/// Immutable catalogue of standards in catalogue order.
#[derive(Debug, Clone, Default)]
pub struct StandardCatalog {
    standards: Vec<Standard>,
    index: HashMap<StandardId, usize>,
}

impl StandardCatalog {
    /// Build a catalogue, rejecting duplicate ids.
    pub fn new(standards: Vec<Standard>) -> Result<Self> {
        let mut index = HashMap::with_capacity(standards.len());
        for (pos, standard) in standards.iter().enumerate() {
            if index.insert(standard.id, pos).is_some() {
                return Err(ComplianceError::DuplicateStandard(standard.id));
            }
        }
        Ok(Self { standards, index })
    }

    /// Parse a JSON array of `{ id, text, requirements }` objects.
    pub fn from_json(json: &str) -> Result<Self> {
        let standards: Vec<Standard> = serde_json::from_str(json)?;
        Self::new(standards)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let catalog = Self::from_json(&json)?;
        debug!(path = %path.display(), standards = catalog.len(), "catalogue loaded");
        Ok(catalog)
    }

    /// The catalogue shipped with the crate.
    pub fn bundled() -> Result<Self> {
        Self::from_json(BUNDLED_CATALOG)
    }

    /// Load from an external reference-data source.
    pub async fn load(source: &dyn CatalogSource) -> Result<Self> {
        Self::new(source.list_standards().await?)
    }

    pub fn get(&self, id: StandardId) -> Option<&Standard> {
        self.index.get(&id).map(|&pos| &self.standards[pos])
    }

    pub fn contains(&self, id: StandardId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Standard> {
        self.standards.iter()
    }

    pub fn len(&self) -> usize {
        self.standards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.standards.is_empty()
    }
}
