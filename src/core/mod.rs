pub mod catalog;
pub mod dataset;
pub mod hierarchy;
pub mod metrics;
pub mod normalize;
pub mod raw;
pub mod source;
pub mod types;

pub use catalog::{CatalogEntry, RegionCatalog};
pub use dataset::{Dataset, LoadDiagnostics};
pub use hierarchy::{
    HierarchyReport, SkippedRegion, SyntheticRegionDef, build_hierarchy, slovak_region_hierarchy,
    sum_regions,
};
pub use metrics::{MetricOptions, derive_metrics, min_day, slope_series};
pub use normalize::{NormalizedRegions, normalize_regions, trim_trailing_carry};
pub use raw::{RawDailyRecord, RawEntry, parse_raw_dataset};
#[cfg(feature = "http-source")]
pub use source::HttpSource;
pub use source::{DEFAULT_DATASET_ENDPOINT, DatasetSource, StaticSource};
pub use types::{Region, RegionLevel};
