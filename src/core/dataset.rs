use std::cmp::Reverse;

use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::catalog::RegionCatalog;
use crate::core::hierarchy::{HierarchyReport, SyntheticRegionDef, build_hierarchy};
use crate::core::metrics::{MetricOptions, derive_metrics};
use crate::core::normalize::normalize_regions;
use crate::core::raw::RawDailyRecord;
use crate::core::types::{Region, RegionLevel};
use crate::error::{TrendsError, TrendsResult};

/// Data-integrity signals collected while building a dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadDiagnostics {
    pub unknown_entries: usize,
    pub trimmed_trailing_day: bool,
    pub hierarchy: HierarchyReport,
}

/// Immutable result of one load: dates, base and synthetic regions, metrics.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    dates: Vec<String>,
    regions: Vec<Region>,
    index: IndexMap<String, usize>,
    options: MetricOptions,
    diagnostics: LoadDiagnostics,
}

impl Default for Dataset {
    fn default() -> Self {
        Self::empty()
    }
}

impl Dataset {
    #[must_use]
    pub fn empty() -> Self {
        Self {
            dates: Vec::new(),
            regions: Vec::new(),
            index: IndexMap::new(),
            options: MetricOptions::default(),
            diagnostics: LoadDiagnostics::default(),
        }
    }

    /// Runs normalize, trim, aggregate and derive over `records`.
    pub fn build(
        records: &[RawDailyRecord],
        catalog: &RegionCatalog,
        definitions: &[SyntheticRegionDef],
        options: MetricOptions,
    ) -> TrendsResult<Self> {
        let options = options.validate()?;
        let normalized = normalize_regions(records, catalog);
        let (regions, hierarchy) = build_hierarchy(normalized.regions, definitions);
        let diagnostics = LoadDiagnostics {
            unknown_entries: normalized.unknown_entries,
            trimmed_trailing_day: normalized.trimmed_trailing_day,
            hierarchy,
        };
        Self::assemble(normalized.dates, regions, options, diagnostics)
    }

    /// Builds a dataset from already-aggregated regions; only metrics are derived.
    pub fn from_regions(
        dates: Vec<String>,
        regions: Vec<Region>,
        options: MetricOptions,
    ) -> TrendsResult<Self> {
        let options = options.validate()?;
        Self::assemble(dates, regions, options, LoadDiagnostics::default())
    }

    fn assemble(
        dates: Vec<String>,
        mut regions: Vec<Region>,
        options: MetricOptions,
        diagnostics: LoadDiagnostics,
    ) -> TrendsResult<Self> {
        let mut index = IndexMap::with_capacity(regions.len());
        for (position, region) in regions.iter().enumerate() {
            if index.insert(region.name.clone(), position).is_some() {
                return Err(TrendsError::InvalidData(format!(
                    "region name `{}` appears more than once",
                    region.name
                )));
            }
        }

        derive_metrics(&mut regions, options);
        debug!(
            days = dates.len(),
            regions = regions.len(),
            per_capita = options.per_capita,
            lookback_days = options.lookback_days,
            "dataset ready"
        );

        Ok(Self {
            dates,
            regions,
            index,
            options,
            diagnostics,
        })
    }

    #[must_use]
    pub fn dates(&self) -> &[String] {
        &self.dates
    }

    #[must_use]
    pub fn num_dates(&self) -> usize {
        self.dates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Regions in build order: base districts by catalog id, then aggregates.
    #[must_use]
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    #[must_use]
    pub fn region(&self, name: &str) -> Option<&Region> {
        self.index.get(name).map(|&position| &self.regions[position])
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    #[must_use]
    pub fn metric_options(&self) -> MetricOptions {
        self.options
    }

    #[must_use]
    pub fn diagnostics(&self) -> &LoadDiagnostics {
        &self.diagnostics
    }

    /// Region names ordered by level (country first), then by name.
    #[must_use]
    pub fn region_names(&self) -> Vec<String> {
        let mut keyed: Vec<(RegionLevel, &str)> = self
            .regions
            .iter()
            .map(|region| (region.level, region.name.as_str()))
            .collect();
        keyed.sort_unstable();
        keyed.into_iter().map(|(_, name)| name.to_owned()).collect()
    }

    /// The `count` regions with the largest raw peak, ties kept in build order.
    #[must_use]
    pub fn top_by_max_cases(&self, count: usize) -> Vec<String> {
        let mut ranked: Vec<&Region> = self.regions.iter().collect();
        ranked.sort_by_key(|region| Reverse(OrderedFloat(region.max_cases)));
        ranked
            .into_iter()
            .take(count)
            .map(|region| region.name.clone())
            .collect()
    }

    /// Combined population of every district.
    #[must_use]
    pub fn district_population(&self) -> f64 {
        self.regions
            .iter()
            .filter(|region| region.level == RegionLevel::District)
            .map(|region| region.population)
            .sum()
    }
}
