use std::collections::BTreeSet;
use std::f64::consts::PI;

use approx::assert_relative_eq;

use case_trends::api::{DisplayOptions, ProjectionInput, project_chart, trend_factor};
use case_trends::core::{Dataset, MetricOptions, Region, RegionLevel};
use case_trends::interaction::UserAxisRange;
use case_trends::render::{
    AnnotationKind, AxisScale, ChartDescription, HIGHLIGHT_COLOR, HISTORY_COLOR, SurfaceSize,
    TraceMode, TraceRole,
};

fn dataset() -> Dataset {
    let regions = vec![
        Region::with_cases("North", RegionLevel::District, 10_000.0, vec![0.0, 10.0, 20.0, 40.0]),
        Region::with_cases("South", RegionLevel::District, 10_000.0, vec![5.0, 5.0, 10.0, 20.0]),
        Region::with_cases("East", RegionLevel::District, 10_000.0, vec![1.0, 2.0, 3.0, 4.0]),
    ];
    let dates = vec![
        "2020.03.01".to_owned(),
        "2020.03.02".to_owned(),
        "2020.03.03".to_owned(),
        "2020.03.04".to_owned(),
    ];
    Dataset::from_regions(dates, regions, MetricOptions::default().with_lookback_days(1))
        .expect("dataset builds")
}

fn selection(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|name| (*name).to_owned()).collect()
}

fn project(
    dataset: &Dataset,
    selected: &BTreeSet<String>,
    day: usize,
    options: &DisplayOptions,
) -> ChartDescription {
    project_chart(&ProjectionInput {
        dataset,
        selected,
        current_day: day,
        options,
        start_at: None,
        user_range: None,
        trendline_angle: f64::NAN,
        surface_size: None,
        title: "Trends",
    })
}

#[test]
fn traces_follow_history_marker_reference_order() {
    let dataset = dataset();
    let selected = selection(&["North", "South"]);
    let options = DisplayOptions::default();
    let description = project(&dataset, &selected, 3, &options);

    let roles: Vec<TraceRole> = description.traces.iter().map(|trace| trace.role).collect();
    assert_eq!(
        roles,
        vec![
            TraceRole::History,
            TraceRole::History,
            TraceRole::CurrentMarker,
            TraceRole::CurrentMarker,
            TraceRole::TrendLine,
        ]
    );

    let north = &description.traces[0];
    assert_eq!(north.name, "North");
    assert_eq!(north.x, vec![0.0, 10.0, 20.0]);
    assert_eq!(north.y.len(), 3);
    assert!(north.y[0].is_nan());
    assert_eq!(north.mode, TraceMode::LinesMarkers);
    assert_eq!(north.line.color, HISTORY_COLOR);
    assert_eq!(north.text[2], "North<br>2020.03.03");

    let marker = &description.traces[2];
    assert_eq!(marker.x, vec![20.0]);
    assert_eq!(marker.y, vec![10.0]);
    assert_eq!(marker.mode, TraceMode::MarkersText);
    assert_eq!(marker.marker.color, HIGHLIGHT_COLOR);

    let trend = description.traces.last().expect("trend trace");
    let factor = trend_factor(1, 2.0);
    assert_eq!(trend.name, "trend");
    assert!(trend.hover_skip);
    assert_relative_eq!(trend.x[1], 1_000_000.0);
    assert_relative_eq!(trend.y[1], 1_000_000.0 * factor, max_relative = 1e-12);
    assert!(description.validate().is_ok());
}

#[test]
fn day_zero_draws_empty_markers() {
    let dataset = dataset();
    let selected = selection(&["North"]);
    let description = project(&dataset, &selected, 0, &DisplayOptions::default());

    let marker = description
        .traces_with_role(TraceRole::CurrentMarker)
        .next()
        .expect("marker trace");
    assert!(marker.x.is_empty());
    assert!(description.traces[0].x.is_empty());
}

#[test]
fn dense_selection_drops_history_markers() {
    let dataset = dataset();
    let selected = selection(&["North", "South", "East"]);
    let options = DisplayOptions {
        show_labels: false,
        ..DisplayOptions::default()
    };
    let description = project(&dataset, &selected, 4, &options);

    assert!(
        description
            .traces_with_role(TraceRole::History)
            .all(|trace| trace.mode == TraceMode::Lines)
    );
    assert!(
        description
            .traces_with_role(TraceRole::CurrentMarker)
            .all(|trace| trace.mode == TraceMode::Markers)
    );
    let names: Vec<&str> = description
        .traces_with_role(TraceRole::History)
        .map(|trace| trace.name.as_str())
        .collect();
    assert_eq!(names, vec!["North", "South", "East"]);
}

#[test]
fn threshold_uses_weekly_limit_per_district_population() {
    let dataset = dataset();
    let selected = selection(&["North"]);
    let options = DisplayOptions::default().with_new_cases_limit(true, 750);
    let description = project(&dataset, &selected, 4, &options);

    let threshold = description
        .traces_with_role(TraceRole::Threshold)
        .next()
        .expect("threshold trace");
    // 750 per day * 7 days over 30k residents, per 10k residents.
    assert_relative_eq!(threshold.y[0], 1750.0);
    assert_eq!(threshold.x, vec![0.0, 10_000.0]);
    assert_eq!(
        description.traces.last().map(|trace| trace.role),
        Some(TraceRole::TrendLine)
    );

    let annotation = description
        .annotation(AnnotationKind::Threshold)
        .expect("threshold annotation");
    assert!(annotation.visible);
    assert_relative_eq!(annotation.y, 1750f64.log10());
    assert_relative_eq!(annotation.x, 0.9 * description.layout.x_axis.range.1);
}

#[test]
fn threshold_needs_per_capita_values() {
    let dataset = dataset();
    let selected = selection(&["North"]);
    let options = DisplayOptions::default()
        .with_new_cases_limit(true, 750)
        .with_per_capita(false);
    let description = project(&dataset, &selected, 4, &options);

    assert_eq!(description.traces_with_role(TraceRole::Threshold).count(), 0);
    let annotation = description
        .annotation(AnnotationKind::Threshold)
        .expect("threshold annotation");
    assert!(!annotation.visible);
}

#[test]
fn non_positive_doubling_time_hides_trend() {
    let dataset = dataset();
    let selected = selection(&["North"]);
    let options = DisplayOptions::default().with_trend_line(true, 0.0);
    let description = project_chart(&ProjectionInput {
        dataset: &dataset,
        selected: &selected,
        current_day: 4,
        options: &options,
        start_at: None,
        user_range: None,
        trendline_angle: 0.3,
        surface_size: None,
        title: "Trends",
    });

    assert_eq!(description.traces_with_role(TraceRole::TrendLine).count(), 0);
    let annotation = description
        .annotation(AnnotationKind::TrendLine)
        .expect("trend annotation");
    assert!(!annotation.visible);
    assert!(description.validate().is_ok());
}

#[test]
fn trend_annotation_follows_rendered_angle() {
    let dataset = dataset();
    let selected = selection(&["North"]);
    let options = DisplayOptions::default();
    let input = ProjectionInput {
        dataset: &dataset,
        selected: &selected,
        current_day: 4,
        options: &options,
        start_at: None,
        user_range: None,
        trendline_angle: 0.5,
        surface_size: None,
        title: "Trends",
    };

    let visible = project_chart(&input);
    let annotation = visible
        .annotation(AnnotationKind::TrendLine)
        .expect("trend annotation");
    assert!(annotation.visible);
    assert_relative_eq!(annotation.text_angle, 0.5 * 180.0 / PI);
    assert_relative_eq!(annotation.x_shift, -50.0 * 0.5f64.cos());
    assert_relative_eq!(annotation.y_shift, 50.0 * 0.5f64.sin());
    assert!(annotation.text.starts_with("doubling every 2 days"));

    let hidden = project_chart(&ProjectionInput {
        trendline_angle: f64::NAN,
        ..input
    });
    let annotation = hidden
        .annotation(AnnotationKind::TrendLine)
        .expect("trend annotation");
    assert!(!annotation.visible);
    assert_relative_eq!(annotation.text_angle, 0.0);
}

#[test]
fn log_ranges_use_floors_and_padding() {
    let dataset = dataset();
    let selected = selection(&["North", "South"]);
    let description = project(&dataset, &selected, 4, &DisplayOptions::default());

    let x = description.layout.x_axis.range;
    let y = description.layout.y_axis.range;
    assert_relative_eq!(x.0, 0.0);
    assert_relative_eq!(x.1, 75f64.log10());
    assert_relative_eq!(y.0, -1.5);
    assert_relative_eq!(y.1, 60f64.log10());
    assert_eq!(description.layout.x_axis.scale, AxisScale::Log);
}

#[test]
fn linear_ranges_round_outward() {
    let dataset = dataset();
    let selected = selection(&["North", "South"]);
    let options = DisplayOptions::default().with_scale(AxisScale::Linear);
    let description = project(&dataset, &selected, 4, &options);

    let x = description.layout.x_axis.range;
    let y = description.layout.y_axis.range;
    assert_relative_eq!(x.0, 0.0);
    assert_relative_eq!(x.1, 60.0);
    assert_relative_eq!(y.0, -0.1);
    assert_relative_eq!(y.1, 53.0);
}

#[test]
fn start_at_ranges_read_from_start_day() {
    let dataset = dataset();
    let selected = selection(&["North"]);
    let options = DisplayOptions::default();
    let description = project_chart(&ProjectionInput {
        dataset: &dataset,
        selected: &selected,
        current_day: 4,
        options: &options,
        start_at: Some(2),
        user_range: None,
        trendline_angle: f64::NAN,
        surface_size: None,
        title: "Trends",
    });

    // From day 2 North reads x = [20, 40] and y = [10, 20].
    assert_relative_eq!(description.layout.x_axis.range.0, 16f64.log10());
    assert_relative_eq!(description.layout.y_axis.range.0, 8f64.log10());
}

#[test]
fn user_range_overrides_pinned_axes_only() {
    let dataset = dataset();
    let selected = selection(&["North"]);
    let options = DisplayOptions::default();
    let description = project_chart(&ProjectionInput {
        dataset: &dataset,
        selected: &selected,
        current_day: 4,
        options: &options,
        start_at: None,
        user_range: Some(UserAxisRange {
            x: Some((1.0, 2.0)),
            y: None,
        }),
        trendline_angle: f64::NAN,
        surface_size: None,
        title: "Trends",
    });

    assert_eq!(description.layout.x_axis.range, (1.0, 2.0));
    assert_relative_eq!(description.layout.y_axis.range.0, -1.5);
}

#[test]
fn annotations_stay_anchored_while_zoomed() {
    let dataset = dataset();
    let selected = selection(&["North", "South"]);
    let options = DisplayOptions::default().with_new_cases_limit(true, 750);
    let input = ProjectionInput {
        dataset: &dataset,
        selected: &selected,
        current_day: 4,
        options: &options,
        start_at: None,
        user_range: None,
        trendline_angle: 0.5,
        surface_size: None,
        title: "Trends",
    };
    let plain = project_chart(&input);
    let zoomed = project_chart(&ProjectionInput {
        user_range: Some(UserAxisRange {
            x: Some((0.2, 0.9)),
            y: Some((-0.5, 0.4)),
        }),
        ..input
    });

    assert_eq!(zoomed.layout.x_axis.range, (0.2, 0.9));
    assert_eq!(zoomed.layout.y_axis.range, (-0.5, 0.4));
    assert_eq!(zoomed.layout.annotations, plain.layout.annotations);
    let trend = zoomed
        .annotation(AnnotationKind::TrendLine)
        .expect("trend annotation");
    assert!(trend.visible);
    assert_relative_eq!(trend.x, 75f64.log10());
    let threshold = zoomed
        .annotation(AnnotationKind::Threshold)
        .expect("threshold annotation");
    assert_relative_eq!(threshold.x, 0.9 * 75f64.log10());
}

#[test]
fn layout_titles_and_export_size_follow_state() {
    let dataset = dataset();
    let selected = selection(&["North"]);
    let options = DisplayOptions::default();
    let description = project_chart(&ProjectionInput {
        dataset: &dataset,
        selected: &selected,
        current_day: 2,
        options: &options,
        start_at: None,
        user_range: None,
        trendline_angle: f64::NAN,
        surface_size: Some(SurfaceSize::new(800.0, 400.0)),
        title: "Trends",
    });

    assert_eq!(
        description.layout.title,
        "Trends, confirmed cases (through 2020.03.02)"
    );
    assert_eq!(
        description.layout.x_axis.title,
        "Total confirmed cases per 10000 residents"
    );
    assert_eq!(
        description.layout.y_axis.title,
        "New confirmed cases (past week) per 10000 residents"
    );
    assert!(description.config.responsive);
    assert_relative_eq!(description.config.image_export.width, 1200.0);
    assert_relative_eq!(description.config.image_export.height, 600.0);
}

#[test]
fn description_contract_keeps_gaps_as_null() {
    let dataset = dataset();
    let selected = selection(&["North"]);
    let description = project(&dataset, &selected, 4, &DisplayOptions::default());

    let json = description
        .to_json_contract_v1_pretty()
        .expect("serialize contract");
    assert!(json.contains("\"schema_version\": 1"));
    assert!(json.contains("null"));
    assert!(json.contains("rgba(0, 0, 0, 0.15)"));

    let parsed = ChartDescription::from_json_compat_str(&json).expect("parse contract");
    assert_eq!(parsed.traces.len(), description.traces.len());
    assert!(parsed.traces[0].y[0].is_nan());
    assert_eq!(parsed.layout, description.layout);

    let bare = description.to_json_pretty().expect("serialize bare");
    let parsed_bare = ChartDescription::from_json_compat_str(&bare).expect("parse bare");
    assert_eq!(parsed_bare.config, description.config);
}
