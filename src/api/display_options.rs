use serde::{Deserialize, Serialize};

use crate::render::AxisScale;

pub const DEFAULT_DOUBLING_TIME: f64 = 2.0;
pub const DEFAULT_NEW_CASES_LIMIT: u32 = 750;

/// Which counter the chart is labelled with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataKind {
    Cases,
    Deaths,
}

impl DataKind {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Cases => "confirmed cases",
            Self::Deaths => "reported deaths",
        }
    }
}

/// User-facing chart toggles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayOptions {
    pub scale: AxisScale,
    pub data_kind: DataKind,
    pub per_capita: bool,
    pub show_trend_line: bool,
    pub doubling_time: f64,
    pub show_new_cases_limit: bool,
    /// New cases per day across all districts.
    pub new_cases_limit: u32,
    pub show_labels: bool,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            scale: AxisScale::Log,
            data_kind: DataKind::Cases,
            per_capita: true,
            show_trend_line: true,
            doubling_time: DEFAULT_DOUBLING_TIME,
            show_new_cases_limit: false,
            new_cases_limit: DEFAULT_NEW_CASES_LIMIT,
            show_labels: true,
        }
    }
}

impl DisplayOptions {
    #[must_use]
    pub fn with_scale(mut self, scale: AxisScale) -> Self {
        self.scale = scale;
        self
    }

    #[must_use]
    pub fn with_per_capita(mut self, per_capita: bool) -> Self {
        self.per_capita = per_capita;
        self
    }

    #[must_use]
    pub fn with_trend_line(mut self, show: bool, doubling_time: f64) -> Self {
        self.show_trend_line = show;
        self.doubling_time = doubling_time;
        self
    }

    #[must_use]
    pub fn with_new_cases_limit(mut self, show: bool, limit: u32) -> Self {
        self.show_new_cases_limit = show;
        self.new_cases_limit = limit;
        self
    }

    /// Trend trace is drawn only for a positive doubling time.
    #[must_use]
    pub fn trend_line_drawn(&self) -> bool {
        self.show_trend_line && self.doubling_time > 0.0
    }

    /// Threshold line only makes sense on per-capita values.
    #[must_use]
    pub fn threshold_drawn(&self) -> bool {
        self.per_capita && self.show_new_cases_limit
    }
}

/// Display-relevant state compared between projections.
///
/// Any difference from the previously projected value drops a user-set
/// axis range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UiState {
    pub data_kind: DataKind,
    pub scale: AxisScale,
    pub show_labels: bool,
    pub show_trend_line: bool,
    pub per_capita: bool,
    pub doubling_time: f64,
    pub show_new_cases_limit: bool,
    pub new_cases_limit: u32,
    pub enable_start_at: bool,
    pub start_at_day: usize,
}

impl UiState {
    #[must_use]
    pub fn capture(options: &DisplayOptions, enable_start_at: bool, start_at_day: usize) -> Self {
        Self {
            data_kind: options.data_kind,
            scale: options.scale,
            show_labels: options.show_labels,
            show_trend_line: options.show_trend_line,
            per_capita: options.per_capita,
            doubling_time: options.doubling_time,
            show_new_cases_limit: options.show_new_cases_limit,
            new_cases_limit: options.new_cases_limit,
            enable_start_at,
            start_at_day,
        }
    }
}
