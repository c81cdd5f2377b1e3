use std::cell::RefCell;
use std::rc::Rc;

use case_trends::TrendsError;
use case_trends::api::{TrendsEngine, TrendsEngineConfig};
use case_trends::core::RegionCatalog;
use case_trends::extensions::{EngineContext, EngineEvent, EngineObserver};
use case_trends::render::NullSurface;

const FEED: &str = r#"{"days": [
    {"day": "2020-03-01", "list": [{"id": 1, "infected": 0}, {"id": 2, "infected": 0}, {"id": 3, "infected": 1}]},
    {"day": "2020-03-02", "list": [{"id": 1, "infected": 10}, {"id": 2, "infected": 0}, {"id": 3, "infected": 1}]},
    {"day": "2020-03-03", "list": [{"id": 1, "infected": 20}, {"id": 2, "infected": 5}, {"id": 3, "infected": 1}]},
    {"day": "2020-03-04", "list": [{"id": 1, "infected": 40}, {"id": 2, "infected": 5}, {"id": 3, "infected": 1}]},
    {"day": "2020-03-05", "list": [{"id": 1, "infected": 80}, {"id": 2, "infected": 6}, {"id": 3, "infected": 2}]}
]}"#;

type Log = Rc<RefCell<Vec<(EngineEvent, EngineContext)>>>;

struct Recorder {
    id: String,
    log: Log,
}

impl Recorder {
    fn boxed(id: &str) -> (Box<dyn EngineObserver>, Log) {
        let log = Log::default();
        let observer = Self {
            id: id.to_owned(),
            log: Rc::clone(&log),
        };
        (Box::new(observer), log)
    }
}

impl EngineObserver for Recorder {
    fn id(&self) -> &str {
        &self.id
    }

    fn on_event(&mut self, event: &EngineEvent, context: EngineContext) {
        self.log.borrow_mut().push((event.clone(), context));
    }
}

fn new_engine() -> TrendsEngine<NullSurface> {
    let catalog = RegionCatalog::new()
        .with_region(1, "Alpha", 10_000.0)
        .with_region(2, "beta", 10_000.0)
        .with_region(3, "Gamma", 10_000.0);
    let config = TrendsEngineConfig::default()
        .with_lookback_days(1)
        .with_default_selection_size(2)
        .with_autoplay(false);
    TrendsEngine::with_catalog(NullSurface::default(), config, catalog, Vec::new())
        .expect("engine init")
}

fn events(log: &Log) -> Vec<EngineEvent> {
    log.borrow().iter().map(|(event, _)| event.clone()).collect()
}

#[test]
fn observer_ids_must_be_unique_and_non_empty() {
    let mut engine = new_engine();
    let (first, _) = Recorder::boxed("history");
    let (duplicate, _) = Recorder::boxed("history");
    let (anonymous, _) = Recorder::boxed("");

    engine.register_observer(first).expect("first registration");
    assert!(matches!(
        engine.register_observer(duplicate),
        Err(TrendsError::InvalidData(_))
    ));
    assert!(matches!(
        engine.register_observer(anonymous),
        Err(TrendsError::InvalidData(_))
    ));
    assert_eq!(engine.observer_count(), 1);
    assert!(engine.has_observer("history"));

    assert!(engine.unregister_observer("history"));
    assert!(!engine.unregister_observer("history"));
    assert_eq!(engine.observer_count(), 0);
}

#[test]
fn first_load_reports_dataset_selection_render_and_day() {
    let mut engine = new_engine();
    let (observer, log) = Recorder::boxed("status-bar");
    engine.register_observer(observer).expect("register");

    engine.load_raw_json(FEED).expect("load feed");

    assert_eq!(
        events(&log),
        vec![
            EngineEvent::DatasetLoaded {
                regions_len: 3,
                num_dates: 5,
            },
            EngineEvent::SelectionChanged { selected_len: 2 },
            EngineEvent::Rendered,
            EngineEvent::DayChanged { day: 5 },
        ]
    );
    let context = log.borrow()[0].1;
    assert_eq!(context.num_dates, 5);
    assert_eq!(context.selected_len, 2);
    assert_eq!(context.visible_len, 3);
    assert_eq!(context.min_day, Some(2));
}

#[test]
fn query_changes_and_playback_are_reported() {
    let mut engine = new_engine();
    engine.load_raw_json(FEED).expect("load feed");
    let (observer, log) = Recorder::boxed("history-api");
    engine.register_observer(observer).expect("register");

    engine.select_all();
    assert!(events(&log).contains(&EngineEvent::UrlUpdated {
        query: "perMillion=true&select=all".to_owned(),
    }));

    log.borrow_mut().clear();
    engine.play();
    engine.advance_time(10);
    let seen = events(&log);
    assert_eq!(seen.first(), Some(&EngineEvent::PlaybackStarted));
    assert!(seen.contains(&EngineEvent::DayChanged { day: 3 }));
}

#[test]
fn unregistered_observer_stops_receiving_events() {
    let mut engine = new_engine();
    let (observer, log) = Recorder::boxed("temp");
    engine.register_observer(observer).expect("register");
    engine.unregister_observer("temp");

    engine.load_raw_json(FEED).expect("load feed");
    assert!(log.borrow().is_empty());
}
