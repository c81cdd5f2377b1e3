use tracing::{trace, warn};

use crate::core::types::same_count;
use crate::extensions::EngineEvent;
use crate::render::{ChartDescription, ChartSurface};

use super::chart_projection::{ProjectionInput, project_chart};
use super::url_codec::{UrlEncodeInput, encode_query};
use super::{TrendsEngine, UiState};

impl<S: ChartSurface> TrendsEngine<S> {
    /// Recomputes everything derived from state, in dependency order:
    /// playback window, range reset, projection, surface render, query string.
    pub(super) fn sync(&mut self) {
        let min_day = self.min_day();
        let num_dates = self.num_dates();
        self.core.playback.clamp_to_window(min_day, num_dates);

        let playback = self.core.playback;
        let ui_state = UiState::capture(
            &self.core.presentation.options,
            playback.enable_start_at,
            playback.start_at_day,
        );
        let ui_changed = self
            .core
            .presentation
            .last_ui_state
            .is_some_and(|previous| previous != ui_state);
        self.core.presentation.last_ui_state = Some(ui_state);
        if ui_changed && self.core.presentation.interaction.clear_user_range() {
            self.emit_event(EngineEvent::UserRangeCleared);
        }

        self.render_chart();
        self.refresh_url();

        let day = self.core.playback.current_day;
        if self.core.presentation.last_reported_day != Some(day) {
            self.core.presentation.last_reported_day = Some(day);
            self.emit_event(EngineEvent::DayChanged { day });
        }
    }

    pub(super) fn project(&self) -> ChartDescription {
        let playback = self.core.playback;
        let input = ProjectionInput {
            dataset: &self.core.model.dataset,
            selected: &self.core.selection.selected,
            current_day: playback.current_day,
            options: &self.core.presentation.options,
            start_at: playback.enable_start_at.then_some(playback.start_at_day),
            user_range: self.core.presentation.interaction.user_range(),
            trendline_angle: self.core.presentation.trendline_angle,
            surface_size: self.core.presentation.surface_size,
            title: &self.core.runtime.config.chart_title,
        };
        project_chart(&input)
    }

    /// Renders, then re-renders once if the drawn trend-line angle moved.
    pub(super) fn render_chart(&mut self) {
        self.core.presentation.surface_size = self.surface.query_size();
        let mut description = self.project();
        self.push_to_surface(&description);

        let angle = self.read_trendline_angle();
        if !same_count(angle, self.core.presentation.trendline_angle) {
            trace!(angle, "trend-line angle changed");
            self.core.presentation.trendline_angle = angle;
            description = self.project();
            self.push_to_surface(&description);
        }

        self.core.presentation.last_description = Some(description);
        self.emit_event(EngineEvent::Rendered);
    }

    /// Re-reads surface geometry and re-renders when it changed.
    pub(super) fn refresh_geometry(&mut self) {
        let size = self.surface.query_size();
        let angle = self.read_trendline_angle();
        let size_changed = size != self.core.presentation.surface_size;
        let angle_changed = !same_count(angle, self.core.presentation.trendline_angle);
        if size_changed || angle_changed {
            self.core.presentation.trendline_angle = angle;
            self.render_chart();
        }
    }

    fn read_trendline_angle(&self) -> f64 {
        if self.core.presentation.options.trend_line_drawn() {
            self.surface.query_rendered_trendline_angle()
        } else {
            f64::NAN
        }
    }

    fn push_to_surface(&mut self, description: &ChartDescription) {
        if let Err(err) = self.surface.render(description) {
            warn!(error = %err, "surface rejected chart description");
        }
    }

    /// Re-encodes the query string once a dataset exists.
    pub(super) fn refresh_url(&mut self) {
        if self.core.runtime.first_load {
            return;
        }
        let playback = self.core.playback;
        let query = encode_query(&UrlEncodeInput {
            options: &self.core.presentation.options,
            enable_start_at: playback.enable_start_at,
            start_at_day: playback.start_at_day,
            selected: &self.core.selection.selected,
            region_names: &self.core.selection.region_names,
            default_selection: &self.core.selection.default_selection,
        });
        if query != self.core.runtime.url_query {
            trace!(%query, "query string updated");
            self.core.runtime.url_query = query.clone();
            self.emit_event(EngineEvent::UrlUpdated { query });
        }
    }
}
