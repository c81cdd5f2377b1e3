use crate::core::{Dataset, RawDailyRecord, RegionCatalog, SyntheticRegionDef};
use crate::extensions::EngineObserver;
use crate::interaction::InteractionState;
use crate::render::{ChartDescription, SurfaceSize};

use super::scheduler::{TaskScheduler, TaskToken};
use super::{DisplayOptions, PlaybackState, SelectionState, TrendsEngineConfig, UiState};

/// Inputs of a load and the dataset built from them.
pub(super) struct TrendsModel {
    pub(super) catalog: RegionCatalog,
    pub(super) definitions: Vec<SyntheticRegionDef>,
    /// Last parsed feed, kept so metric toggles can rebuild without a fetch.
    pub(super) records: Vec<RawDailyRecord>,
    pub(super) dataset: Dataset,
}

/// Display options and what was last handed to the surface.
pub(super) struct PresentationState {
    pub(super) options: DisplayOptions,
    pub(super) interaction: InteractionState,
    pub(super) last_ui_state: Option<UiState>,
    pub(super) last_description: Option<ChartDescription>,
    pub(super) trendline_angle: f64,
    pub(super) surface_size: Option<SurfaceSize>,
    pub(super) surface_mounted: bool,
    pub(super) last_reported_day: Option<usize>,
}

impl PresentationState {
    pub(super) fn new(options: DisplayOptions) -> Self {
        Self {
            options,
            interaction: InteractionState::default(),
            last_ui_state: None,
            last_description: None,
            trendline_angle: f64::NAN,
            surface_size: None,
            surface_mounted: false,
            last_reported_day: None,
        }
    }
}

/// Timers, observers and session flags.
pub(super) struct RuntimeState {
    pub(super) config: TrendsEngineConfig,
    pub(super) scheduler: TaskScheduler,
    pub(super) search_token: Option<TaskToken>,
    pub(super) observers: Vec<Box<dyn EngineObserver>>,
    /// No dataset has been loaded yet.
    pub(super) first_load: bool,
    pub(super) url_query: String,
}

/// Internal engine state used by the public facade (`TrendsEngine`).
pub(super) struct EngineCore {
    pub(super) model: TrendsModel,
    pub(super) selection: SelectionState,
    pub(super) playback: PlaybackState,
    pub(super) presentation: PresentationState,
    pub(super) runtime: RuntimeState,
}
