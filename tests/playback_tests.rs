use case_trends::api::{TrendsEngine, TrendsEngineConfig};
use case_trends::core::RegionCatalog;
use case_trends::render::NullSurface;

// Alpha slopes turn positive on day 2, beta on day 3, Gamma on day 5.
const FEED: &str = r#"{"days": [
    {"day": "2020-03-01", "list": [{"id": 1, "infected": 0}, {"id": 2, "infected": 0}, {"id": 3, "infected": 1}]},
    {"day": "2020-03-02", "list": [{"id": 1, "infected": 10}, {"id": 2, "infected": 0}, {"id": 3, "infected": 1}]},
    {"day": "2020-03-03", "list": [{"id": 1, "infected": 20}, {"id": 2, "infected": 5}, {"id": 3, "infected": 1}]},
    {"day": "2020-03-04", "list": [{"id": 1, "infected": 40}, {"id": 2, "infected": 5}, {"id": 3, "infected": 1}]},
    {"day": "2020-03-05", "list": [{"id": 1, "infected": 80}, {"id": 2, "infected": 6}, {"id": 3, "infected": 2}]}
]}"#;

fn catalog() -> RegionCatalog {
    RegionCatalog::new()
        .with_region(1, "Alpha", 10_000.0)
        .with_region(2, "beta", 10_000.0)
        .with_region(3, "Gamma", 10_000.0)
}

fn config() -> TrendsEngineConfig {
    TrendsEngineConfig::default()
        .with_lookback_days(1)
        .with_default_selection_size(2)
        .with_autoplay(false)
}

fn engine_with(config: TrendsEngineConfig) -> TrendsEngine<NullSurface> {
    TrendsEngine::with_catalog(NullSurface::default(), config, catalog(), Vec::new())
        .expect("engine init")
}

fn loaded_engine() -> TrendsEngine<NullSurface> {
    let mut engine = engine_with(config());
    engine.load_raw_json(FEED).expect("load feed");
    engine
}

#[test]
fn load_moves_cursor_to_last_day() {
    let engine = loaded_engine();
    assert_eq!(engine.num_dates(), 5);
    assert_eq!(engine.current_day(), 5);
    assert!(engine.is_paused());
    assert_eq!(engine.min_day(), Some(2));
    assert_eq!(engine.min_day_sentinel(), 2);
}

#[test]
fn play_from_last_day_rewinds_and_waits_for_first_tick() {
    let mut engine = loaded_engine();
    engine.play();

    assert!(!engine.is_paused());
    assert_eq!(engine.current_day(), 2);
    assert_eq!(engine.next_timer_in_ms(), Some(10));

    engine.advance_time(9);
    assert_eq!(engine.current_day(), 2);
    engine.advance_time(1);
    assert_eq!(engine.current_day(), 3);
    assert_eq!(engine.next_timer_in_ms(), Some(200));

    engine.advance_time(199);
    assert_eq!(engine.current_day(), 3);
    engine.advance_time(1);
    assert_eq!(engine.current_day(), 4);
}

#[test]
fn step_into_last_day_pauses() {
    let mut engine = loaded_engine();
    engine.scrub(4);
    engine.play();
    assert_eq!(engine.current_day(), 4);

    engine.advance_time(10);

    assert_eq!(engine.current_day(), 5);
    assert!(engine.is_paused());
    assert_eq!(engine.next_timer_in_ms(), None);
}

#[test]
fn long_advance_runs_rescheduled_steps_to_the_end() {
    let mut engine = loaded_engine();
    engine.play();
    engine.advance_time(10_000);

    assert_eq!(engine.current_day(), 5);
    assert!(engine.is_paused());
    assert_eq!(engine.now_ms(), 10_000);
}

#[test]
fn pause_stops_pending_step_from_advancing() {
    let mut engine = loaded_engine();
    engine.play();
    engine.pause();
    engine.advance_time(1_000);

    assert_eq!(engine.current_day(), 2);
    assert!(engine.is_paused());
}

#[test]
fn restarted_playback_ignores_steps_of_earlier_run() {
    let mut engine = loaded_engine();
    engine.play();
    engine.pause();
    engine.play();

    engine.advance_time(10);
    assert_eq!(engine.current_day(), 3);
    engine.advance_time(200);
    assert_eq!(engine.current_day(), 4);
}

#[test]
fn play_toggles_into_pause() {
    let mut engine = loaded_engine();
    engine.play();
    engine.play();
    assert!(engine.is_paused());
    assert_eq!(engine.current_day(), 2);
}

#[test]
fn scrub_pauses_and_clamps_to_window() {
    let mut engine = loaded_engine();
    engine.play();
    engine.scrub(0);
    assert!(engine.is_paused());
    assert_eq!(engine.current_day(), 2);

    engine.scrub(99);
    assert_eq!(engine.current_day(), 5);
}

#[test]
fn keyboard_steps_stay_inside_window() {
    let mut engine = loaded_engine();

    assert!(engine.handle_key('-'));
    assert_eq!(engine.current_day(), 4);
    assert!(engine.handle_key('_'));
    assert_eq!(engine.current_day(), 3);

    engine.scrub(2);
    assert!(engine.handle_key('-'));
    assert_eq!(engine.current_day(), 2);

    assert!(engine.handle_key('+'));
    assert_eq!(engine.current_day(), 3);
    engine.scrub(5);
    assert!(engine.handle_key('='));
    assert_eq!(engine.current_day(), 5);

    assert!(engine.handle_key(' '));
    assert!(!engine.is_paused());
    assert!(engine.handle_key('+'));
    assert!(engine.is_paused());

    assert!(!engine.handle_key('x'));
}

#[test]
fn keyboard_is_ignored_without_dates() {
    let mut engine = engine_with(config());
    assert!(!engine.handle_key(' '));
    assert!(engine.is_paused());
}

#[test]
fn nothing_to_animate_finishes_on_first_step() {
    let mut engine = loaded_engine();
    engine.deselect_all();
    assert_eq!(engine.min_day(), None);
    assert_eq!(engine.min_day_sentinel(), -1);

    engine.play();
    assert!(!engine.is_paused());
    engine.advance_time(10);

    assert!(engine.is_paused());
    assert_eq!(engine.current_day(), 5);
}

#[test]
fn selection_change_clamps_cursor_to_new_min_day() {
    let mut engine = loaded_engine();
    engine.scrub(2);
    engine.set_selection(["Gamma"]);

    assert_eq!(engine.min_day(), Some(5));
    assert_eq!(engine.current_day(), 5);
}

#[test]
fn autoplay_waits_for_mounted_surface() {
    let mut engine = engine_with(config().with_autoplay(true));
    engine.load_raw_json(FEED).expect("load feed");
    assert!(engine.is_paused());
    assert_eq!(engine.current_day(), 5);

    engine.surface_mounted();

    assert!(!engine.is_paused());
    assert_eq!(engine.current_day(), 2);
    assert_eq!(engine.playback().start_at_day, 2);
    assert!(!engine.playback().autoplay);

    engine.pause();
    engine.surface_mounted();
    assert!(engine.is_paused());
}

#[test]
fn autoplay_fires_on_load_when_already_mounted() {
    let mut engine = engine_with(config().with_autoplay(true));
    engine.surface_mounted();
    assert!(engine.is_paused());

    engine.load_raw_json(FEED).expect("load feed");

    assert!(!engine.is_paused());
    assert_eq!(engine.current_day(), 2);
}

#[test]
fn start_at_day_restarts_playback_and_anchors_rewind() {
    let mut engine = loaded_engine();

    engine.set_enable_start_at(true);
    assert!(!engine.is_paused());
    assert_eq!(engine.current_day(), 2);
    engine.pause();

    engine.set_start_at_day(4);
    assert_eq!(engine.playback().start_at_day, 4);
    assert_eq!(engine.current_day(), 4);
    assert!(!engine.is_paused());

    engine.scrub(5);
    engine.play();
    assert_eq!(engine.current_day(), 4);

    engine.pause();
    engine.set_start_at_day(1);
    assert_eq!(engine.playback().start_at_day, 2);
}
