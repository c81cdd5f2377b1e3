use tracing::debug;

use crate::error::TrendsResult;
use crate::extensions::EngineEvent;
use crate::render::{AxisScale, ChartSurface};

use super::url_codec::{SelectOverride, UrlState, decode_query};
use super::validation::{validate_display_options, validate_doubling_time, validate_new_cases_limit};
use super::{DataKind, DisplayOptions, TrendsEngine};

impl<S: ChartSurface> TrendsEngine<S> {
    pub fn set_scale(&mut self, scale: AxisScale) {
        if self.core.presentation.options.scale != scale {
            self.core.presentation.options.scale = scale;
            self.sync();
        }
    }

    pub fn set_show_labels(&mut self, show: bool) {
        if self.core.presentation.options.show_labels != show {
            self.core.presentation.options.show_labels = show;
            self.sync();
        }
    }

    pub fn set_trend_line(&mut self, show: bool) {
        if self.core.presentation.options.show_trend_line != show {
            self.core.presentation.options.show_trend_line = show;
            self.sync();
        }
    }

    /// Days for the trend line to double. Non-positive values hide it.
    pub fn set_doubling_time(&mut self, doubling_time: f64) -> TrendsResult<()> {
        validate_doubling_time(doubling_time)?;
        self.core.presentation.options.doubling_time = doubling_time;
        self.sync();
        Ok(())
    }

    pub fn set_show_new_cases_limit(&mut self, show: bool) {
        if self.core.presentation.options.show_new_cases_limit != show {
            self.core.presentation.options.show_new_cases_limit = show;
            self.sync();
        }
    }

    /// Daily new-case limit across all districts behind the threshold line.
    pub fn set_new_cases_limit(&mut self, limit: u32) -> TrendsResult<()> {
        validate_new_cases_limit(limit)?;
        self.core.presentation.options.new_cases_limit = limit;
        self.sync();
        Ok(())
    }

    /// Switches per-capita normalization and rebuilds the metrics from the
    /// cached feed. Clears the search.
    pub fn set_per_capita(&mut self, per_capita: bool) -> TrendsResult<()> {
        if self.core.presentation.options.per_capita == per_capita {
            return Ok(());
        }
        self.core.presentation.options.per_capita = per_capita;
        self.reload_metrics()
    }

    /// Switches the counter the chart is labelled with. Clears the search.
    pub fn set_data_kind(&mut self, data_kind: DataKind) -> TrendsResult<()> {
        if self.core.presentation.options.data_kind == data_kind {
            return Ok(());
        }
        self.core.presentation.options.data_kind = data_kind;
        self.reload_metrics()
    }

    /// Applies every display option at once.
    pub fn set_display_options(&mut self, options: DisplayOptions) -> TrendsResult<()> {
        validate_display_options(&options)?;
        let previous = self.core.presentation.options;
        self.core.presentation.options = options;
        if previous.per_capita != options.per_capita || previous.data_kind != options.data_kind {
            return self.reload_metrics();
        }
        self.sync();
        Ok(())
    }

    /// Applies a shared link's query string.
    ///
    /// Before the first load, locations and `select` are held until the data
    /// arrives; afterwards they replace the selection right away.
    pub fn apply_url_query(&mut self, query: &str) -> TrendsResult<UrlState> {
        let state = decode_query(query);
        let mut options = self.core.presentation.options;
        state.apply_to_options(&mut options);
        validate_display_options(&options)?;
        let previous = self.core.presentation.options;
        self.core.presentation.options = options;

        if let Some(day) = state.start_at_day {
            self.core.playback.enable_start_at = true;
            self.core.playback.start_at_day = day;
        }

        let selection = &mut self.core.selection;
        if self.core.runtime.first_load {
            if !state.locations.is_empty() {
                selection.selected = state.location_set();
            }
            selection.pending_override = state.select;
        } else {
            match state.select {
                Some(SelectOverride::All) => {
                    selection.selected = selection.region_names.iter().cloned().collect();
                }
                Some(SelectOverride::None) => selection.selected.clear(),
                None if !state.locations.is_empty() => selection.selected = state.location_set(),
                None => {}
            }
        }
        debug!(
            locations = state.locations.len(),
            select = ?state.select,
            "url state applied"
        );

        if previous.per_capita != options.per_capita || previous.data_kind != options.data_kind {
            self.reload_metrics()?;
        } else {
            self.sync();
        }
        Ok(state)
    }

    fn reload_metrics(&mut self) -> TrendsResult<()> {
        self.reset_search();
        let visible_len = self.core.selection.visible.len();
        self.emit_event(EngineEvent::VisibleRegionsChanged { visible_len });
        if self.has_dataset() {
            self.rebuild_from_cache()
        } else {
            self.sync();
            Ok(())
        }
    }
}
