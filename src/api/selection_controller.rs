use tracing::{debug, trace};

use crate::extensions::EngineEvent;
use crate::render::ChartSurface;

use super::TrendsEngine;
use super::scheduler::ScheduledTask;
use super::selection::filter_region_names;

impl<S: ChartSurface> TrendsEngine<S> {
    /// Adds `name` to the selection. Returns whether the selection changed.
    pub fn select_region(&mut self, name: &str) -> bool {
        if !self.core.model.dataset.contains(name)
            || !self.core.selection.selected.insert(name.to_owned())
        {
            return false;
        }
        self.selection_changed();
        true
    }

    /// Removes `name` from the selection. Returns whether the selection changed.
    pub fn deselect_region(&mut self, name: &str) -> bool {
        if !self.core.selection.selected.remove(name) {
            return false;
        }
        self.selection_changed();
        true
    }

    /// Flips the selection of a known region. Unknown names are ignored.
    pub fn toggle_region(&mut self, name: &str) -> bool {
        if !self.core.model.dataset.contains(name) {
            return false;
        }
        let selected = &mut self.core.selection.selected;
        if !selected.remove(name) {
            selected.insert(name.to_owned());
        }
        self.selection_changed();
        true
    }

    pub fn select_all(&mut self) {
        let selection = &mut self.core.selection;
        selection.selected = selection.region_names.iter().cloned().collect();
        self.selection_changed();
    }

    pub fn deselect_all(&mut self) {
        self.core.selection.selected.clear();
        self.selection_changed();
    }

    /// Replaces the selection with the known names among `names`.
    pub fn set_selection<I, N>(&mut self, names: I)
    where
        I: IntoIterator<Item = N>,
        N: AsRef<str>,
    {
        let dataset = &self.core.model.dataset;
        self.core.selection.selected = names
            .into_iter()
            .filter(|name| dataset.contains(name.as_ref()))
            .map(|name| name.as_ref().to_owned())
            .collect();
        self.selection_changed();
    }

    /// Debounced search over the region list. A newer call replaces a
    /// pending one; the filter runs once the debounce delay has elapsed.
    pub fn search(&mut self, text: &str) {
        self.core.selection.search_text = text.to_owned();
        let runtime = &mut self.core.runtime;
        if let Some(token) = runtime.search_token.take() {
            runtime.scheduler.cancel(token);
        }
        let token = runtime
            .scheduler
            .schedule(ScheduledTask::SearchRefresh, runtime.config.search_debounce_ms);
        runtime.search_token = Some(token);
        trace!(text, "search scheduled");
    }

    #[must_use]
    pub fn search_text(&self) -> &str {
        &self.core.selection.search_text
    }

    pub(super) fn refresh_visible(&mut self) {
        let selection = &mut self.core.selection;
        selection.visible = filter_region_names(&selection.region_names, &selection.search_text);
        let visible_len = selection.visible.len();
        debug!(visible = visible_len, "region list filtered");
        self.emit_event(EngineEvent::VisibleRegionsChanged { visible_len });
    }

    /// Drops the search text and any pending refresh.
    pub(super) fn reset_search(&mut self) {
        let runtime = &mut self.core.runtime;
        if let Some(token) = runtime.search_token.take() {
            runtime.scheduler.cancel(token);
        }
        let selection = &mut self.core.selection;
        selection.search_text.clear();
        selection.visible = selection.region_names.clone();
    }

    fn selection_changed(&mut self) {
        let selected_len = self.core.selection.valid_selected().len();
        debug!(selected = selected_len, "selection changed");
        self.emit_event(EngineEvent::SelectionChanged { selected_len });
        self.sync();
    }
}
