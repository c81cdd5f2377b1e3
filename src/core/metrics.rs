use serde::{Deserialize, Serialize};

use crate::core::types::Region;
use crate::error::{TrendsError, TrendsResult};

pub const DEFAULT_LOOKBACK_DAYS: usize = 7;
pub const DEFAULT_PER_CAPITA_DENOMINATOR: f64 = 10_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricOptions {
    pub per_capita: bool,
    pub lookback_days: usize,
    pub per_capita_denominator: f64,
}

impl Default for MetricOptions {
    fn default() -> Self {
        Self {
            per_capita: true,
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            per_capita_denominator: DEFAULT_PER_CAPITA_DENOMINATOR,
        }
    }
}

impl MetricOptions {
    #[must_use]
    pub fn with_per_capita(mut self, per_capita: bool) -> Self {
        self.per_capita = per_capita;
        self
    }

    #[must_use]
    pub fn with_lookback_days(mut self, lookback_days: usize) -> Self {
        self.lookback_days = lookback_days;
        self
    }

    pub fn validate(self) -> TrendsResult<Self> {
        if self.lookback_days == 0 {
            return Err(TrendsError::InvalidData(
                "lookback window must be at least one day".to_owned(),
            ));
        }
        if !self.per_capita_denominator.is_finite() || self.per_capita_denominator <= 0.0 {
            return Err(TrendsError::InvalidData(
                "per-capita denominator must be finite and > 0".to_owned(),
            ));
        }
        Ok(self)
    }
}

/// Rescales to per-capita (when enabled) and then derives slopes.
///
/// Runs once per load on freshly built regions; calling it twice would
/// rescale twice.
pub fn derive_metrics(regions: &mut [Region], options: MetricOptions) {
    #[cfg(feature = "parallel-metrics")]
    {
        use rayon::prelude::*;
        regions
            .par_iter_mut()
            .for_each(|region| derive_region_metrics(region, options));
    }

    #[cfg(not(feature = "parallel-metrics"))]
    {
        for region in regions.iter_mut() {
            derive_region_metrics(region, options);
        }
    }
}

fn derive_region_metrics(region: &mut Region, options: MetricOptions) {
    if options.per_capita {
        let scale = options.per_capita_denominator / region.population;
        for value in &mut region.cases {
            *value *= scale;
        }
    }
    region.slope = slope_series(&region.cases, options.lookback_days);
}

/// `slope[i] = cases[i] - cases[i - lookback]`, `NaN` inside the first window.
#[must_use]
pub fn slope_series(cases: &[f64], lookback: usize) -> Vec<f64> {
    cases
        .iter()
        .enumerate()
        .map(|(index, value)| match index.checked_sub(lookback) {
            Some(earlier) => value - cases[earlier],
            None => f64::NAN,
        })
        .collect()
}

/// Index of the first strictly positive slope, if any.
#[must_use]
pub fn first_positive_index(slope: &[f64]) -> Option<usize> {
    slope.iter().position(|value| *value > 0.0)
}

/// First day (1-based) on which any of `slopes` turns positive.
///
/// `None` is the "never positive" sentinel; playback treats it as nothing to
/// animate and the chart hides trend-dependent decorations.
#[must_use]
pub fn min_day<'a, I>(slopes: I) -> Option<usize>
where
    I: IntoIterator<Item = &'a [f64]>,
{
    slopes
        .into_iter()
        .filter_map(first_positive_index)
        .min()
        .map(|index| index + 1)
}
