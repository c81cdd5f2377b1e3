mod axis_range_resolver;
mod chart_projection;
mod data_controller;
mod display_controller;
mod display_options;
mod engine;
mod engine_config;
mod engine_core;
mod engine_init;
mod engine_snapshot;
mod interaction_controller;
mod json_contract;
mod observer_registry;
mod playback;
mod playback_controller;
mod render_coordinator;
mod scheduler;
mod selection;
mod selection_controller;
mod url_codec;
mod validation;

pub use axis_range_resolver::{
    AxisRanges, RANGE_FLOOR, SeriesExtremes, default_ranges, series_extremes,
};
pub use chart_projection::{
    ProjectionInput, SPARSE_SELECTION_LIMIT, TREND_LINE_SPAN, project_chart, trend_factor,
    weekly_limit_per_capita,
};
pub use display_options::{
    DEFAULT_DOUBLING_TIME, DEFAULT_NEW_CASES_LIMIT, DataKind, DisplayOptions, UiState,
};
pub use engine::TrendsEngine;
pub use engine_config::TrendsEngineConfig;
pub use engine_snapshot::EngineSnapshot;
pub use json_contract::{
    CHART_DESCRIPTION_JSON_SCHEMA_V1, ChartDescriptionJsonContractV1,
    ENGINE_SNAPSHOT_JSON_SCHEMA_V1, EngineSnapshotJsonContractV1,
};
pub use playback::{PlayOutcome, PlaybackState, StepOutcome, clamp_day, lower_bound};
pub use scheduler::{ScheduledTask, TaskScheduler, TaskToken};
pub use selection::{SelectionState, filter_region_names, initial_selection};
pub use url_codec::{
    LEGACY_LOCATION_RENAMES, SelectOverride, UrlEncodeInput, UrlState, decode_query, encode_query,
};
