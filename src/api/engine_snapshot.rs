use serde::{Deserialize, Serialize};

use crate::core::LoadDiagnostics;
use crate::interaction::UserAxisRange;
use crate::render::ChartSurface;

use super::{DisplayOptions, PlaybackState, TrendsEngine};

/// Serializable deterministic state snapshot used by regression tests and
/// debugging tooling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub dates: Vec<String>,
    pub region_names: Vec<String>,
    /// Valid selected regions in list order.
    pub selected: Vec<String>,
    pub visible: Vec<String>,
    pub search_text: String,
    pub playback: PlaybackState,
    pub min_day: Option<usize>,
    pub display: DisplayOptions,
    pub user_range: Option<UserAxisRange>,
    pub hovered_region: Option<String>,
    pub url_query: String,
    pub diagnostics: LoadDiagnostics,
}

impl<S: ChartSurface> TrendsEngine<S> {
    #[must_use]
    pub fn snapshot(&self) -> EngineSnapshot {
        let dataset = &self.core.model.dataset;
        let selection = &self.core.selection;
        EngineSnapshot {
            dates: dataset.dates().to_vec(),
            region_names: selection.region_names.clone(),
            selected: selection
                .valid_selected()
                .into_iter()
                .map(str::to_owned)
                .collect(),
            visible: selection.visible.clone(),
            search_text: selection.search_text.clone(),
            playback: self.core.playback,
            min_day: self.min_day(),
            display: self.core.presentation.options,
            user_range: self.core.presentation.interaction.user_range(),
            hovered_region: self
                .core
                .presentation
                .interaction
                .hovered()
                .map(|target| target.region.clone()),
            url_query: self.core.runtime.url_query.clone(),
            diagnostics: dataset.diagnostics().clone(),
        }
    }
}
