use std::f64::consts::PI;

use approx::assert_relative_eq;
use serde_json::{Map, Value};

use case_trends::api::{TrendsEngine, TrendsEngineConfig};
use case_trends::core::RegionCatalog;
use case_trends::interaction::{RelayoutEvent, UserAxisRange};
use case_trends::render::{
    AnnotationKind, AxisScale, HIGHLIGHT_COLOR, HISTORY_COLOR, NullSurface, SurfaceSize,
    TraceRestyle,
};

const FEED: &str = r#"{"days": [
    {"day": "2020-03-01", "list": [{"id": 1, "infected": 0}, {"id": 2, "infected": 0}, {"id": 3, "infected": 1}]},
    {"day": "2020-03-02", "list": [{"id": 1, "infected": 10}, {"id": 2, "infected": 0}, {"id": 3, "infected": 1}]},
    {"day": "2020-03-03", "list": [{"id": 1, "infected": 20}, {"id": 2, "infected": 5}, {"id": 3, "infected": 1}]},
    {"day": "2020-03-04", "list": [{"id": 1, "infected": 40}, {"id": 2, "infected": 5}, {"id": 3, "infected": 1}]},
    {"day": "2020-03-05", "list": [{"id": 1, "infected": 80}, {"id": 2, "infected": 6}, {"id": 3, "infected": 2}]}
]}"#;

fn engine_on(surface: NullSurface) -> TrendsEngine<NullSurface> {
    let catalog = RegionCatalog::new()
        .with_region(1, "Alpha", 10_000.0)
        .with_region(2, "beta", 10_000.0)
        .with_region(3, "Gamma", 10_000.0);
    let config = TrendsEngineConfig::default()
        .with_lookback_days(1)
        .with_default_selection_size(2)
        .with_autoplay(false);
    let mut engine =
        TrendsEngine::with_catalog(surface, config, catalog, Vec::new()).expect("engine init");
    engine.load_raw_json(FEED).expect("load feed");
    engine
}

fn loaded_engine() -> TrendsEngine<NullSurface> {
    engine_on(NullSurface::default())
}

fn restyle(indices: &[usize], line_color: case_trends::render::Rgba) -> (Vec<usize>, TraceRestyle) {
    (indices.to_vec(), TraceRestyle { line_color })
}

#[test]
fn hover_highlights_region_and_restores_previous() {
    let mut engine = loaded_engine();
    let description = engine.chart_description().expect("rendered").clone();
    let alpha = description.trace_indices_named("Alpha");
    let beta = description.trace_indices_named("beta");
    assert_eq!(alpha.len(), 2);
    assert_eq!(beta.len(), 2);

    assert!(engine.hover(alpha[0]));
    assert!(engine.hover(alpha[1]));
    assert_eq!(engine.surface().restyles, vec![restyle(&alpha, HIGHLIGHT_COLOR)]);

    assert!(engine.hover(beta[1]));
    assert_eq!(engine.hovered().map(|target| target.region.as_str()), Some("beta"));
    assert_eq!(
        engine.surface().restyles[1..],
        [restyle(&alpha, HISTORY_COLOR), restyle(&beta, HIGHLIGHT_COLOR)]
    );

    engine.unhover();
    assert!(engine.hovered().is_none());
    assert_eq!(
        engine.surface().restyles.last(),
        Some(&restyle(&beta, HISTORY_COLOR))
    );

    engine.unhover();
    assert_eq!(engine.surface().restyles.len(), 4);
}

#[test]
fn reference_traces_and_missing_curves_are_not_hoverable() {
    let mut engine = loaded_engine();
    let trace_count = engine.chart_description().expect("rendered").traces.len();

    assert!(!engine.hover(trace_count - 1));
    assert!(!engine.hover(trace_count + 10));
    assert!(engine.surface().restyles.is_empty());

    let catalog = RegionCatalog::new().with_region(1, "Alpha", 10_000.0);
    let mut empty = TrendsEngine::with_catalog(
        NullSurface::default(),
        TrendsEngineConfig::default(),
        catalog,
        Vec::new(),
    )
    .expect("engine init");
    assert!(!empty.hover(0));
}

#[test]
fn user_range_survives_redraws_until_autorange() {
    let mut engine = loaded_engine();
    let range = UserAxisRange {
        x: Some((1.0, 2.0)),
        y: None,
    };
    engine.relayout(RelayoutEvent::Range(range));

    assert_eq!(engine.user_range(), Some(range));
    let description = engine.chart_description().expect("rendered");
    assert_eq!(description.layout.x_axis.range, (1.0, 2.0));

    engine.scrub(3);
    assert_eq!(engine.user_range(), Some(range));

    engine.relayout(RelayoutEvent::Autorange);
    assert_eq!(engine.user_range(), None);
    let description = engine.chart_description().expect("rendered");
    assert_ne!(description.layout.x_axis.range, (1.0, 2.0));
}

#[test]
fn display_change_drops_user_range() {
    let mut engine = loaded_engine();
    engine.relayout(RelayoutEvent::Range(UserAxisRange {
        x: Some((0.5, 1.5)),
        y: Some((0.0, 1.0)),
    }));

    engine.set_scale(AxisScale::Linear);

    assert_eq!(engine.user_range(), None);
}

#[test]
fn relayout_fields_reads_surface_field_map() {
    let mut engine = loaded_engine();
    let fields: Map<String, Value> =
        serde_json::from_str(r#"{"xaxis.range[0]": 0.5, "xaxis.range[1]": "1.5"}"#)
            .expect("field map");
    engine.relayout_fields(&fields);
    assert_eq!(
        engine.user_range(),
        Some(UserAxisRange {
            x: Some((0.5, 1.5)),
            y: None,
        })
    );

    let renders = engine.surface().render_count;
    let fields: Map<String, Value> =
        serde_json::from_str(r#"{"width": 640}"#).expect("field map");
    engine.relayout_fields(&fields);
    assert_eq!(engine.surface().render_count, renders);
    assert!(engine.user_range().is_some());
}

#[test]
fn resize_rerenders_only_when_geometry_moved() {
    let mut engine = loaded_engine();
    let renders = engine.surface().render_count;

    engine.surface_mut().size = Some(SurfaceSize::new(800.0, 400.0));
    engine.request_resize();
    assert_eq!(engine.surface().resize_count, 1);
    assert_eq!(engine.surface().render_count, renders + 1);

    engine.request_resize();
    assert_eq!(engine.surface().resize_count, 2);
    assert_eq!(engine.surface().render_count, renders + 1);
}

#[test]
fn trend_annotation_uses_angle_read_back_from_surface() {
    let mut engine = engine_on(NullSurface::default().with_trendline_angle(0.4));

    assert_relative_eq!(engine.trendline_angle(), 0.4);
    let annotation = engine
        .chart_description()
        .expect("rendered")
        .annotation(AnnotationKind::TrendLine)
        .expect("trend annotation")
        .clone();
    assert!(annotation.visible);
    assert_relative_eq!(annotation.text_angle, 0.4 * 180.0 / PI);

    engine.set_trend_line(false);
    assert!(engine.trendline_angle().is_nan());
    let annotation = engine
        .chart_description()
        .expect("rendered")
        .annotation(AnnotationKind::TrendLine)
        .expect("trend annotation")
        .clone();
    assert!(!annotation.visible);
}
