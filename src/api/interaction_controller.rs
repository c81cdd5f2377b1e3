use serde_json::{Map, Value};
use smallvec::SmallVec;
use tracing::{debug, trace, warn};

use crate::extensions::EngineEvent;
use crate::interaction::{HoverTarget, RelayoutEvent};
use crate::render::{ChartSurface, HIGHLIGHT_COLOR, HISTORY_COLOR, Rgba, TraceRestyle, TraceRole};

use super::TrendsEngine;

impl<S: ChartSurface> TrendsEngine<S> {
    /// Highlights every trace drawn for the region under the pointer.
    ///
    /// `curve_index` indexes the last rendered description. Returns whether a
    /// region is now highlighted.
    pub fn hover(&mut self, curve_index: usize) -> bool {
        let Some(target) = self.hover_target(curve_index) else {
            return false;
        };
        if self.core.presentation.interaction.hovered() == Some(&target) {
            return true;
        }
        if let Some(previous) = self.core.presentation.interaction.end_hover() {
            self.restyle_traces(&previous, HISTORY_COLOR);
        }
        trace!(region = %target.region, "hover");
        self.restyle_traces(&target, HIGHLIGHT_COLOR);
        self.core.presentation.interaction.begin_hover(target);
        true
    }

    /// Restores the faint style of the hovered region.
    pub fn unhover(&mut self) {
        if let Some(previous) = self.core.presentation.interaction.end_hover() {
            trace!(region = %previous.region, "unhover");
            self.restyle_traces(&previous, HISTORY_COLOR);
        }
    }

    /// Axis range change reported by the surface.
    pub fn relayout(&mut self, event: RelayoutEvent) {
        match event {
            RelayoutEvent::Autorange => {
                if self.core.presentation.interaction.clear_user_range() {
                    debug!("user axis range cleared");
                    self.emit_event(EngineEvent::UserRangeCleared);
                }
                self.sync();
            }
            RelayoutEvent::Range(range) => {
                debug!(x = ?range.x, y = ?range.y, "user axis range set");
                self.core.presentation.interaction.set_user_range(range);
                self.sync();
            }
            RelayoutEvent::Other => self.refresh_geometry(),
        }
    }

    /// `relayout` from the surface's flat field map.
    pub fn relayout_fields(&mut self, fields: &Map<String, Value>) {
        self.relayout(RelayoutEvent::from_fields(fields));
    }

    /// Host window resized: lets the surface refit, then re-reads geometry.
    pub fn request_resize(&mut self) {
        if let Err(err) = self.surface.resize() {
            warn!(error = %err, "surface resize failed");
        }
        self.refresh_geometry();
    }

    fn hover_target(&self, curve_index: usize) -> Option<HoverTarget> {
        let description = self.core.presentation.last_description.as_ref()?;
        let trace = description.traces.get(curve_index)?;
        if trace.hover_skip || !matches!(trace.role, TraceRole::History | TraceRole::CurrentMarker)
        {
            return None;
        }
        let trace_indices: SmallVec<[usize; 2]> = description
            .traces
            .iter()
            .enumerate()
            .filter(|(_, candidate)| {
                candidate.name == trace.name
                    && matches!(candidate.role, TraceRole::History | TraceRole::CurrentMarker)
            })
            .map(|(index, _)| index)
            .collect();
        Some(HoverTarget {
            region: trace.name.clone(),
            trace_indices,
        })
    }

    fn restyle_traces(&mut self, target: &HoverTarget, line_color: Rgba) {
        if let Err(err) = self
            .surface
            .restyle(&target.trace_indices, TraceRestyle { line_color })
        {
            warn!(error = %err, region = %target.region, "surface restyle failed");
        }
    }
}
