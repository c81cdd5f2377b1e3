use serde::{Deserialize, Serialize};

use crate::core::metrics::{DEFAULT_LOOKBACK_DAYS, DEFAULT_PER_CAPITA_DENOMINATOR, MetricOptions};
use crate::core::source::DEFAULT_DATASET_ENDPOINT;
use crate::error::{TrendsError, TrendsResult};

use super::DisplayOptions;

/// Public engine bootstrap configuration.
///
/// Serializable so hosts can persist and reload their setup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendsEngineConfig {
    #[serde(default = "default_lookback_days")]
    pub lookback_days: usize,
    #[serde(default = "default_per_capita_denominator")]
    pub per_capita_denominator: f64,
    /// Number of regions selected by default, ranked by peak count.
    #[serde(default = "default_selection_size")]
    pub default_selection_size: usize,
    /// Delay before the first playback step.
    #[serde(default = "default_first_tick_ms")]
    pub first_tick_ms: u64,
    /// Delay between later playback steps.
    #[serde(default = "default_cadence_ms")]
    pub cadence_ms: u64,
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,
    #[serde(default = "default_autoplay")]
    pub autoplay: bool,
    #[serde(default = "default_dataset_endpoint")]
    pub dataset_endpoint: String,
    #[serde(default = "default_chart_title")]
    pub chart_title: String,
    #[serde(default)]
    pub display: DisplayOptions,
}

impl Default for TrendsEngineConfig {
    fn default() -> Self {
        Self {
            lookback_days: default_lookback_days(),
            per_capita_denominator: default_per_capita_denominator(),
            default_selection_size: default_selection_size(),
            first_tick_ms: default_first_tick_ms(),
            cadence_ms: default_cadence_ms(),
            search_debounce_ms: default_search_debounce_ms(),
            autoplay: default_autoplay(),
            dataset_endpoint: default_dataset_endpoint(),
            chart_title: default_chart_title(),
            display: DisplayOptions::default(),
        }
    }
}

impl TrendsEngineConfig {
    #[must_use]
    pub fn with_lookback_days(mut self, lookback_days: usize) -> Self {
        self.lookback_days = lookback_days;
        self
    }

    #[must_use]
    pub fn with_default_selection_size(mut self, size: usize) -> Self {
        self.default_selection_size = size;
        self
    }

    /// Sets first-step and steady-state playback delays.
    #[must_use]
    pub fn with_playback_timing(mut self, first_tick_ms: u64, cadence_ms: u64) -> Self {
        self.first_tick_ms = first_tick_ms;
        self.cadence_ms = cadence_ms;
        self
    }

    #[must_use]
    pub fn with_search_debounce_ms(mut self, debounce_ms: u64) -> Self {
        self.search_debounce_ms = debounce_ms;
        self
    }

    #[must_use]
    pub fn with_autoplay(mut self, autoplay: bool) -> Self {
        self.autoplay = autoplay;
        self
    }

    #[must_use]
    pub fn with_dataset_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.dataset_endpoint = endpoint.into();
        self
    }

    #[must_use]
    pub fn with_chart_title(mut self, title: impl Into<String>) -> Self {
        self.chart_title = title.into();
        self
    }

    #[must_use]
    pub fn with_display(mut self, display: DisplayOptions) -> Self {
        self.display = display;
        self
    }

    /// Metric options for a load with the given per-capita toggle.
    #[must_use]
    pub fn metric_options(&self, per_capita: bool) -> MetricOptions {
        MetricOptions {
            per_capita,
            lookback_days: self.lookback_days,
            per_capita_denominator: self.per_capita_denominator,
        }
    }

    pub fn validate(&self) -> TrendsResult<()> {
        self.metric_options(self.display.per_capita)
            .validate()
            .map_err(|e| TrendsError::InvalidConfig(e.to_string()))?;
        if self.cadence_ms == 0 {
            return Err(TrendsError::InvalidConfig(
                "playback cadence must be > 0 ms".to_owned(),
            ));
        }
        if !self.display.doubling_time.is_finite() {
            return Err(TrendsError::InvalidConfig(
                "doubling time must be finite".to_owned(),
            ));
        }
        Ok(())
    }

    /// Serializes config to pretty JSON.
    pub fn to_json_pretty(&self) -> TrendsResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| TrendsError::InvalidConfig(format!("failed to serialize config: {e}")))
    }

    /// Deserializes config from JSON; absent fields take their defaults.
    pub fn from_json_str(input: &str) -> TrendsResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| TrendsError::InvalidConfig(format!("failed to parse config: {e}")))
    }
}

fn default_lookback_days() -> usize {
    DEFAULT_LOOKBACK_DAYS
}

fn default_per_capita_denominator() -> f64 {
    DEFAULT_PER_CAPITA_DENOMINATOR
}

fn default_selection_size() -> usize {
    9
}

fn default_first_tick_ms() -> u64 {
    10
}

fn default_cadence_ms() -> u64 {
    200
}

fn default_search_debounce_ms() -> u64 {
    250
}

fn default_autoplay() -> bool {
    true
}

fn default_dataset_endpoint() -> String {
    DEFAULT_DATASET_ENDPOINT.to_owned()
}

fn default_chart_title() -> String {
    "Case trends by district".to_owned()
}
