use std::collections::BTreeSet;
use std::f64::consts::PI;

use crate::core::{Dataset, Region};
use crate::interaction::UserAxisRange;
use crate::render::{
    Annotation, AnnotationKind, Axis, AxisScale, ChartDescription, HIGHLIGHT_COLOR, HISTORY_COLOR,
    ImageExport, Layout, LineDash, LineStyle, MarkerStyle, REFERENCE_COLOR, SurfaceConfig,
    SurfaceSize, Trace, TraceMode, TraceRole,
};

use super::DisplayOptions;
use super::axis_range_resolver::{AxisRanges, default_ranges, series_extremes};

/// Trend trace spans this x interval; wide enough for any per-capita or raw value.
pub const TREND_LINE_SPAN: (f64, f64) = (0.1, 1_000_000.0);
/// History traces get markers when at most this many regions are selected.
pub const SPARSE_SELECTION_LIMIT: usize = 2;
/// Offset between the trend label and the line, in pixels.
const TREND_LABEL_OFFSET_PX: f64 = 50.0;
const EXPORT_HEIGHT_PX: f64 = 600.0;

/// Everything the projection reads.
#[derive(Debug, Clone, Copy)]
pub struct ProjectionInput<'a> {
    pub dataset: &'a Dataset,
    pub selected: &'a BTreeSet<String>,
    pub current_day: usize,
    pub options: &'a DisplayOptions,
    /// `Some(day)` when start-at is enabled.
    pub start_at: Option<usize>,
    pub user_range: Option<UserAxisRange>,
    /// Read back from the surface after the previous render.
    pub trendline_angle: f64,
    pub surface_size: Option<SurfaceSize>,
    pub title: &'a str,
}

/// Slope of the reference line: value after one lookback window of growth
/// with the given doubling time, per unit of cumulative count.
#[must_use]
pub fn trend_factor(lookback_days: usize, doubling_time: f64) -> f64 {
    1.0 - 2f64.powf(-(lookback_days as f64) / doubling_time)
}

/// Weekly new cases per `denominator` residents for a per-day national limit,
/// rounded to two decimals. `NaN` without population.
#[must_use]
pub fn weekly_limit_per_capita(new_cases_limit: u32, denominator: f64, population: f64) -> f64 {
    if population.is_nan() || population <= 0.0 {
        return f64::NAN;
    }
    (100.0 * denominator * f64::from(new_cases_limit) * 7.0 / population).round() / 100.0
}

/// Builds the chart for the current state.
#[must_use]
pub fn project_chart(input: &ProjectionInput<'_>) -> ChartDescription {
    let dataset = input.dataset;
    let options = input.options;
    let metrics = dataset.metric_options();
    let day = input.current_day.min(dataset.num_dates());
    let regions: Vec<&Region> = dataset
        .regions()
        .iter()
        .filter(|region| input.selected.contains(&region.name))
        .collect();

    let mut traces = Vec::with_capacity(regions.len() * 2 + 2);
    let history_mode = if regions.len() <= SPARSE_SELECTION_LIMIT {
        TraceMode::LinesMarkers
    } else {
        TraceMode::Lines
    };
    for region in &regions {
        traces.push(history_trace(region, dataset.dates(), day, history_mode));
    }
    for region in &regions {
        traces.push(current_marker_trace(region, day, options.show_labels));
    }

    let threshold = weekly_limit_per_capita(
        options.new_cases_limit,
        metrics.per_capita_denominator,
        dataset.district_population(),
    );
    let threshold_drawn = options.threshold_drawn() && threshold.is_finite();
    if threshold_drawn {
        traces.push(reference_trace(
            TraceRole::Threshold,
            "threshold",
            (0.0, metrics.per_capita_denominator),
            (threshold, threshold),
        ));
    }

    let factor = trend_factor(metrics.lookback_days, options.doubling_time);
    let trend_drawn = options.trend_line_drawn();
    if trend_drawn {
        // Must stay last: surfaces report the angle of the last trace.
        let (x0, x1) = TREND_LINE_SPAN;
        traces.push(reference_trace(
            TraceRole::TrendLine,
            "trend",
            (x0, x1),
            (x0 * factor, x1 * factor),
        ));
    }

    let start_at = input.start_at;
    let extremes = series_extremes(&regions, start_at);
    // Labels stay anchored to the computed ranges while the user zooms.
    let computed = default_ranges(extremes, options.scale, options.per_capita, start_at.is_some());
    let ranges = computed.with_user_override(input.user_range);

    let kind = options.data_kind.label();
    let per_capita_suffix = if options.per_capita {
        format!(" per {} residents", metrics.per_capita_denominator)
    } else {
        String::new()
    };
    let date = day
        .checked_sub(1)
        .and_then(|index| dataset.dates().get(index))
        .map_or("", String::as_str);

    let annotations = vec![
        trend_annotation(options, computed, factor, trend_drawn, input.trendline_angle),
        threshold_annotation(options, computed, threshold, threshold_drawn, metrics.per_capita_denominator),
    ];

    ChartDescription {
        traces,
        layout: Layout {
            title: format!("{}, {kind} (through {date})", input.title),
            x_axis: Axis {
                title: format!("Total {kind}{per_capita_suffix}"),
                scale: options.scale,
                range: ranges.x,
            },
            y_axis: Axis {
                title: format!("New {kind} (past week){per_capita_suffix}"),
                scale: options.scale,
                range: ranges.y,
            },
            annotations,
            show_legend: false,
            hover_mode: "closest".to_owned(),
        },
        config: surface_config(input.title, input.surface_size),
    }
}

fn history_trace(region: &Region, dates: &[String], day: usize, mode: TraceMode) -> Trace {
    let end = day.min(region.cases.len());
    let slope_end = day.min(region.slope.len());
    Trace {
        role: TraceRole::History,
        name: region.name.clone(),
        x: region.cases[..end].to_vec(),
        y: region.slope[..slope_end].to_vec(),
        mode,
        text: dates
            .iter()
            .take(end)
            .map(|date| format!("{}<br>{date}", region.name))
            .collect(),
        text_position: None,
        line: LineStyle {
            color: HISTORY_COLOR,
            dash: LineDash::Solid,
        },
        marker: MarkerStyle {
            size: 4.0,
            color: HISTORY_COLOR,
        },
        hover_skip: false,
    }
}

fn current_marker_trace(region: &Region, day: usize, show_labels: bool) -> Trace {
    let (x, y) = match day.checked_sub(1) {
        Some(index) => (vec![region.case_at(index)], vec![region.slope_at(index)]),
        None => (Vec::new(), Vec::new()),
    };
    Trace {
        role: TraceRole::CurrentMarker,
        name: region.name.clone(),
        x,
        y,
        mode: if show_labels {
            TraceMode::MarkersText
        } else {
            TraceMode::Markers
        },
        text: vec![region.name.clone()],
        text_position: Some("center right".to_owned()),
        line: LineStyle {
            color: HIGHLIGHT_COLOR,
            dash: LineDash::Solid,
        },
        marker: MarkerStyle {
            size: 6.0,
            color: HIGHLIGHT_COLOR,
        },
        hover_skip: false,
    }
}

fn reference_trace(role: TraceRole, name: &str, x: (f64, f64), y: (f64, f64)) -> Trace {
    Trace {
        role,
        name: name.to_owned(),
        x: vec![x.0, x.1],
        y: vec![y.0, y.1],
        mode: TraceMode::Lines,
        text: Vec::new(),
        text_position: None,
        line: LineStyle {
            color: REFERENCE_COLOR,
            dash: LineDash::Dot,
        },
        marker: MarkerStyle {
            size: 6.0,
            color: REFERENCE_COLOR,
        },
        hover_skip: true,
    }
}

/// Label where the trend line leaves the plot through the top or right edge.
fn trend_annotation(
    options: &DisplayOptions,
    ranges: AxisRanges,
    factor: f64,
    drawn: bool,
    angle: f64,
) -> Annotation {
    let (x, y) = match options.scale {
        AxisScale::Log => {
            let offset = factor.log10();
            let x_at_top = ranges.y.1 - offset;
            if x_at_top < ranges.x.1 {
                (x_at_top, ranges.y.1)
            } else {
                (ranges.x.1, ranges.x.1 + offset)
            }
        }
        AxisScale::Linear => {
            let x_at_top = ranges.y.1 / factor;
            if x_at_top < ranges.x.1 {
                (x_at_top, ranges.y.1)
            } else {
                (ranges.x.1, ranges.x.1 * factor)
            }
        }
    };
    let visible = drawn && angle.is_finite() && x.is_finite() && y.is_finite();
    let unit = if options.doubling_time == 1.0 { "day" } else { "days" };
    Annotation {
        kind: AnnotationKind::TrendLine,
        visible,
        x: finite_or_zero(x),
        y: finite_or_zero(y),
        x_shift: if visible { -TREND_LABEL_OFFSET_PX * angle.cos() } else { 0.0 },
        y_shift: if visible { TREND_LABEL_OFFSET_PX * angle.sin() } else { 0.0 },
        text_angle: if visible { angle * 180.0 / PI } else { 0.0 },
        text: format!(
            "doubling every {} {unit}<br>{}",
            options.doubling_time,
            options.data_kind.label()
        ),
    }
}

fn threshold_annotation(
    options: &DisplayOptions,
    ranges: AxisRanges,
    threshold: f64,
    drawn: bool,
    denominator: f64,
) -> Annotation {
    let y = match options.scale {
        AxisScale::Log => threshold.log10(),
        AxisScale::Linear => threshold,
    };
    let visible = drawn && y.is_finite();
    Annotation {
        kind: AnnotationKind::Threshold,
        visible,
        x: ranges.x.1 * 0.9,
        y: finite_or_zero(y),
        x_shift: 0.0,
        y_shift: 0.0,
        text_angle: 0.0,
        text: format!(
            "{} new cases per day<br>i.e. {} per week per {denominator} residents",
            options.new_cases_limit,
            finite_or_zero(threshold)
        ),
    }
}

fn surface_config(title: &str, size: Option<SurfaceSize>) -> SurfaceConfig {
    let width = size
        .filter(|size| size.is_valid())
        .map_or(EXPORT_HEIGHT_PX, |size| {
            EXPORT_HEIGHT_PX * size.width / size.height
        });
    SurfaceConfig {
        responsive: true,
        image_export: ImageExport {
            format: "png".to_owned(),
            filename: title.to_owned(),
            width,
            height: EXPORT_HEIGHT_PX,
        },
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trend_factor_for_weekly_doubling_halves() {
        assert!((trend_factor(7, 7.0) - 0.5).abs() <= 1e-12);
    }

    #[test]
    fn weekly_limit_rounds_to_hundredths() {
        // 750 per day nationally over 5.45M residents, per 10k per week.
        let value = weekly_limit_per_capita(750, 10_000.0, 5_450_000.0);
        assert!((value - 9.63).abs() <= 1e-9);
        assert!(weekly_limit_per_capita(750, 10_000.0, 0.0).is_nan());
    }
}
