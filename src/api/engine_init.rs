use tracing::debug;

use crate::core::{Dataset, RegionCatalog, SyntheticRegionDef, slovak_region_hierarchy};
use crate::error::TrendsResult;
use crate::render::ChartSurface;

use super::engine_core::{EngineCore, PresentationState, RuntimeState, TrendsModel};
use super::scheduler::TaskScheduler;
use super::validation::validate_display_options;
use super::{PlaybackState, SelectionState, TrendsEngine, TrendsEngineConfig};

impl<S: ChartSurface> TrendsEngine<S> {
    /// Creates an engine with an empty catalog and the built-in Slovak hierarchy.
    ///
    /// Nothing is drawn until a dataset is loaded.
    pub fn new(surface: S, config: TrendsEngineConfig) -> TrendsResult<Self> {
        Self::with_catalog(surface, config, RegionCatalog::new(), slovak_region_hierarchy())
    }

    /// Creates an engine for an explicit district catalog and aggregate definitions.
    pub fn with_catalog(
        surface: S,
        config: TrendsEngineConfig,
        catalog: RegionCatalog,
        definitions: Vec<SyntheticRegionDef>,
    ) -> TrendsResult<Self> {
        config.validate()?;
        validate_display_options(&config.display)?;
        catalog.validate()?;

        debug!(
            districts = catalog.len(),
            synthetic_definitions = definitions.len(),
            autoplay = config.autoplay,
            "creating trends engine"
        );

        Ok(Self {
            surface,
            core: EngineCore {
                model: TrendsModel {
                    catalog,
                    definitions,
                    records: Vec::new(),
                    dataset: Dataset::empty(),
                },
                selection: SelectionState::default(),
                playback: PlaybackState::new(config.autoplay),
                presentation: PresentationState::new(config.display),
                runtime: RuntimeState {
                    config,
                    scheduler: TaskScheduler::default(),
                    search_token: None,
                    observers: Vec::new(),
                    first_load: true,
                    url_query: String::new(),
                },
            },
        })
    }

    /// Replaces the district catalog used by the next load.
    pub fn set_catalog(&mut self, catalog: RegionCatalog) -> TrendsResult<()> {
        catalog.validate()?;
        self.core.model.catalog = catalog;
        Ok(())
    }

    /// Replaces the aggregate definitions used by the next load.
    pub fn set_hierarchy(&mut self, definitions: Vec<SyntheticRegionDef>) {
        self.core.model.definitions = definitions;
    }
}
