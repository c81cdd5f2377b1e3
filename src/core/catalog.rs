use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{TrendsError, TrendsResult};

/// Static description of one base district.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub title: String,
    pub population: f64,
}

/// Known district ids with their canonical names and populations.
///
/// Serialized as the map shape `{ "<id>": { "title": ..., "population": ... } }`.
/// Iteration is in ascending id order, which fixes the order of base regions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionCatalog {
    entries: BTreeMap<u32, CatalogEntry>,
}

impl RegionCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_region(mut self, id: u32, title: impl Into<String>, population: f64) -> Self {
        self.insert(id, title, population);
        self
    }

    /// Inserts or replaces the entry for `id`.
    pub fn insert(&mut self, id: u32, title: impl Into<String>, population: f64) {
        self.entries.insert(
            id,
            CatalogEntry {
                title: title.into(),
                population,
            },
        );
    }

    #[must_use]
    pub fn get(&self, id: u32) -> Option<&CatalogEntry> {
        self.entries.get(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &CatalogEntry)> {
        self.entries.iter().map(|(id, entry)| (*id, entry))
    }

    /// Rejects duplicate titles and non-positive or non-finite populations.
    pub fn validate(&self) -> TrendsResult<()> {
        let mut seen = std::collections::BTreeSet::new();
        for (id, entry) in &self.entries {
            if !entry.population.is_finite() || entry.population <= 0.0 {
                return Err(TrendsError::InvalidData(format!(
                    "catalog entry {id} (`{}`) must have a positive finite population",
                    entry.title
                )));
            }
            if !seen.insert(entry.title.as_str()) {
                return Err(TrendsError::InvalidData(format!(
                    "catalog title `{}` is used by more than one id",
                    entry.title
                )));
            }
        }
        Ok(())
    }

    pub fn to_json_pretty(&self) -> TrendsResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| TrendsError::InvalidData(format!("failed to serialize catalog: {e}")))
    }

    pub fn from_json_str(input: &str) -> TrendsResult<Self> {
        let catalog: Self = serde_json::from_str(input)
            .map_err(|e| TrendsError::InvalidData(format!("failed to parse catalog: {e}")))?;
        catalog.validate()?;
        Ok(catalog)
    }
}

impl FromIterator<(u32, CatalogEntry)> for RegionCatalog {
    fn from_iter<T: IntoIterator<Item = (u32, CatalogEntry)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
