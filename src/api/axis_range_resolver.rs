use serde::{Deserialize, Serialize};

use crate::core::Region;
use crate::interaction::UserAxisRange;
use crate::render::AxisScale;

/// Floor for both maxima and the `x` minimum, so tiny datasets still get a
/// readable window.
pub const RANGE_FLOOR: f64 = 50.0;

/// Extremes of the selected series, `NaN` values dropped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesExtremes {
    pub x_min: f64,
    pub x_max: f64,
    /// `+inf` when no slope is readable.
    pub y_min: f64,
    pub y_max: f64,
}

/// Gathers extremes over whole series, sliced from `start_at` when set.
#[must_use]
pub fn series_extremes(regions: &[&Region], start_at: Option<usize>) -> SeriesExtremes {
    let from = start_at.unwrap_or(0);
    let readable = |series: &[f64]| -> Vec<f64> {
        series
            .get(from..)
            .unwrap_or(&[])
            .iter()
            .copied()
            .filter(|value| !value.is_nan())
            .collect()
    };
    let xs: Vec<f64> = regions.iter().flat_map(|r| readable(r.cases.as_slice())).collect();
    let ys: Vec<f64> = regions.iter().flat_map(|r| readable(r.slope.as_slice())).collect();

    SeriesExtremes {
        x_min: xs.iter().copied().fold(RANGE_FLOOR, f64::min),
        x_max: xs.iter().copied().fold(RANGE_FLOOR, f64::max),
        y_min: ys.iter().copied().fold(f64::INFINITY, f64::min),
        y_max: ys.iter().copied().fold(RANGE_FLOOR, f64::max),
    }
}

/// Axis ranges in axis units (`log10` space on log axes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisRanges {
    pub x: (f64, f64),
    pub y: (f64, f64),
}

impl AxisRanges {
    /// Replaces each axis the user has pinned.
    #[must_use]
    pub fn with_user_override(self, user: Option<UserAxisRange>) -> Self {
        let Some(user) = user else {
            return self;
        };
        Self {
            x: user.x.unwrap_or(self.x),
            y: user.y.unwrap_or(self.y),
        }
    }
}

/// Default ranges for the chosen scale.
#[must_use]
pub fn default_ranges(
    extremes: SeriesExtremes,
    scale: AxisScale,
    per_capita: bool,
    start_at_enabled: bool,
) -> AxisRanges {
    match scale {
        AxisScale::Log => {
            let x_floor = if per_capita { 0.0 } else { 0.5 };
            let y_floor = if per_capita { -1.5 } else { 0.0 };
            let x_low = start_at_enabled
                .then(|| log_lower_bound(extremes.x_min))
                .flatten()
                .unwrap_or(x_floor);
            let y_low = start_at_enabled
                .then(|| log_lower_bound(extremes.y_min))
                .flatten()
                .unwrap_or(y_floor);
            AxisRanges {
                x: (x_low, (1.5 * extremes.x_max).log10()),
                y: (y_low, (1.2 * extremes.y_max).log10()),
            }
        }
        AxisScale::Linear => {
            let y_pad = 10f64.powf(extremes.y_max.log10().floor() - 2.0);
            AxisRanges {
                x: (0.0, (1.2 * extremes.x_max).round()),
                y: (-y_pad, (1.05 * extremes.y_max).round()),
            }
        }
    }
}

/// `log10(0.8 * min)` when that is defined.
fn log_lower_bound(min: f64) -> Option<f64> {
    let bound = (0.8 * min).log10();
    bound.is_finite().then_some(bound)
}
