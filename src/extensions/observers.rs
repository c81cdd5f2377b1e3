use serde::{Deserialize, Serialize};

/// Read-only state snapshot passed to observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineContext {
    pub num_dates: usize,
    pub regions_len: usize,
    pub current_day: usize,
    pub paused: bool,
    pub min_day: Option<usize>,
    pub selected_len: usize,
    pub visible_len: usize,
}

/// Event stream exposed to observers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EngineEvent {
    DatasetLoaded { regions_len: usize, num_dates: usize },
    SelectionChanged { selected_len: usize },
    VisibleRegionsChanged { visible_len: usize },
    DayChanged { day: usize },
    PlaybackStarted,
    PlaybackPaused,
    UserRangeCleared,
    Rendered,
    /// New query string without the leading `?`; empty means all defaults.
    UrlUpdated { query: String },
}

/// Observer hook for hosts mirroring engine state (history API, status bars).
///
/// Observers see events and context but cannot mutate the engine.
pub trait EngineObserver {
    fn id(&self) -> &str;
    fn on_event(&mut self, event: &EngineEvent, context: EngineContext);
}
