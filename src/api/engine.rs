use crate::core::{Dataset, metrics};
use crate::interaction::{HoverTarget, UserAxisRange};
use crate::render::{ChartDescription, ChartSurface};

use super::engine_core::EngineCore;
use super::{DisplayOptions, PlaybackState, SelectionState, TrendsEngineConfig};

/// Main orchestration facade consumed by host applications.
///
/// `TrendsEngine` owns the dataset, selection, playback and display options.
/// Its methods are the only way to mutate them; every mutation ends by
/// re-projecting the chart onto the surface and refreshing the query string.
pub struct TrendsEngine<S: ChartSurface> {
    pub(super) surface: S,
    pub(super) core: EngineCore,
}

impl<S: ChartSurface> TrendsEngine<S> {
    #[must_use]
    pub fn config(&self) -> &TrendsEngineConfig {
        &self.core.runtime.config
    }

    #[must_use]
    pub fn dataset(&self) -> &Dataset {
        &self.core.model.dataset
    }

    #[must_use]
    pub fn num_dates(&self) -> usize {
        self.core.model.dataset.num_dates()
    }

    #[must_use]
    pub fn has_dataset(&self) -> bool {
        !self.core.runtime.first_load
    }

    #[must_use]
    pub fn selection(&self) -> &SelectionState {
        &self.core.selection
    }

    #[must_use]
    pub fn selected_regions(&self) -> Vec<&str> {
        self.core.selection.valid_selected()
    }

    #[must_use]
    pub fn visible_regions(&self) -> &[String] {
        &self.core.selection.visible
    }

    #[must_use]
    pub fn playback(&self) -> PlaybackState {
        self.core.playback
    }

    #[must_use]
    pub fn current_day(&self) -> usize {
        self.core.playback.current_day
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.core.playback.paused
    }

    #[must_use]
    pub fn display_options(&self) -> DisplayOptions {
        self.core.presentation.options
    }

    /// First day (1-based) on which a selected region's slope turns positive.
    #[must_use]
    pub fn min_day(&self) -> Option<usize> {
        let selected = &self.core.selection.selected;
        metrics::min_day(
            self.core
                .model
                .dataset
                .regions()
                .iter()
                .filter(|region| selected.contains(&region.name))
                .map(|region| region.slope.as_slice()),
        )
    }

    /// `min_day` with `-1` standing for "never positive".
    #[must_use]
    pub fn min_day_sentinel(&self) -> i64 {
        self.min_day()
            .and_then(|day| i64::try_from(day).ok())
            .unwrap_or(-1)
    }

    #[must_use]
    pub fn user_range(&self) -> Option<UserAxisRange> {
        self.core.presentation.interaction.user_range()
    }

    #[must_use]
    pub fn hovered(&self) -> Option<&HoverTarget> {
        self.core.presentation.interaction.hovered()
    }

    /// Query string mirroring the current state, without the leading `?`.
    #[must_use]
    pub fn url_query(&self) -> &str {
        &self.core.runtime.url_query
    }

    /// Last description handed to the surface.
    #[must_use]
    pub fn chart_description(&self) -> Option<&ChartDescription> {
        self.core.presentation.last_description.as_ref()
    }

    /// Trend-line angle last read back from the surface.
    #[must_use]
    pub fn trendline_angle(&self) -> f64 {
        self.core.presentation.trendline_angle
    }

    #[must_use]
    pub fn now_ms(&self) -> u64 {
        self.core.runtime.scheduler.now_ms()
    }

    /// Time until the next pending timer fires, if any.
    #[must_use]
    pub fn next_timer_in_ms(&self) -> Option<u64> {
        self.core.runtime.scheduler.next_due_in_ms()
    }

    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    #[must_use]
    pub fn into_surface(self) -> S {
        self.surface
    }
}
