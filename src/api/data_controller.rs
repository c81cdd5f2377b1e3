use std::collections::BTreeSet;

use tracing::{debug, info};

use crate::core::{Dataset, DatasetSource, RawDailyRecord, parse_raw_dataset};
use crate::error::TrendsResult;
use crate::extensions::EngineEvent;
use crate::render::ChartSurface;

use super::selection::{filter_region_names, initial_selection};
use super::TrendsEngine;

impl<S: ChartSurface> TrendsEngine<S> {
    /// Fetches from `source` and loads the result as a full reload.
    ///
    /// On failure the current dataset stays in place.
    pub fn load_from_source(&mut self, source: &mut dyn DatasetSource) -> TrendsResult<()> {
        let payload = source.fetch_raw()?;
        self.load_raw_json(&payload)
    }

    /// Parses the feed payload and loads it as a full reload.
    pub fn load_raw_json(&mut self, payload: &str) -> TrendsResult<()> {
        let records = parse_raw_dataset(payload)?;
        self.load_records(records)
    }

    /// Loads parsed records as a full reload.
    ///
    /// The first load seeds the selection from the URL or from the regions
    /// with the largest peaks; later full reloads reset it to the latter.
    pub fn load_records(&mut self, records: Vec<RawDailyRecord>) -> TrendsResult<()> {
        let dataset = self.build_dataset(&records)?;
        self.core.model.records = records;
        self.core.model.dataset = dataset;
        self.after_load(true);
        Ok(())
    }

    /// Rebuilds from the cached feed after a metric toggle, keeping the selection.
    pub(super) fn rebuild_from_cache(&mut self) -> TrendsResult<()> {
        let dataset = self.build_dataset(&self.core.model.records)?;
        self.core.model.dataset = dataset;
        self.after_load(false);
        Ok(())
    }

    fn build_dataset(&self, records: &[RawDailyRecord]) -> TrendsResult<Dataset> {
        let options = self
            .core
            .runtime
            .config
            .metric_options(self.core.presentation.options.per_capita);
        Dataset::build(
            records,
            &self.core.model.catalog,
            &self.core.model.definitions,
            options,
        )
    }

    fn after_load(&mut self, update_selection: bool) {
        let dataset = &self.core.model.dataset;
        let num_dates = dataset.num_dates();
        let region_names = dataset.region_names();
        let top: BTreeSet<String> = dataset
            .top_by_max_cases(self.core.runtime.config.default_selection_size)
            .into_iter()
            .collect();
        let diagnostics = dataset.diagnostics();
        info!(
            days = num_dates,
            regions = region_names.len(),
            skipped_regions = diagnostics.hierarchy.skipped.len(),
            trimmed_trailing_day = diagnostics.trimmed_trailing_day,
            "dataset loaded"
        );

        self.core.playback.current_day = num_dates;

        let selection = &mut self.core.selection;
        selection.visible = filter_region_names(&region_names, &selection.search_text);
        let first_load = self.core.runtime.first_load;
        if first_load || update_selection {
            let default_selection: BTreeSet<String> = region_names
                .iter()
                .filter(|name| top.contains(*name))
                .cloned()
                .collect();
            let url_locations = if first_load {
                std::mem::take(&mut selection.selected)
            } else {
                BTreeSet::new()
            };
            selection.selected = initial_selection(
                &url_locations,
                selection.pending_override.take(),
                &region_names,
                &default_selection,
            );
            selection.default_selection = default_selection;
            debug!(
                selected = selection.selected.len(),
                from_url = !url_locations.is_empty(),
                "selection regenerated"
            );
        }
        selection.pending_override = None;
        selection.region_names = region_names;
        self.core.runtime.first_load = false;

        let regions_len = self.core.model.dataset.regions().len();
        self.emit_event(EngineEvent::DatasetLoaded {
            regions_len,
            num_dates,
        });
        let selected_len = self.core.selection.valid_selected().len();
        self.emit_event(EngineEvent::SelectionChanged { selected_len });

        self.try_autoplay();
        self.sync();
    }
}
