//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

use cellchain::config::AppConfig;
use cellchain::messages::{AppMsg, CanvasMsg, Msg};
use cellchain::model::AppModel;
use cellchain::update::update;

/// Create a test model whose manifest lives in `dir`
pub fn test_model(dir: &Path) -> AppModel {
    let config = AppConfig {
        state_file: dir.join("state.yml"),
        ..AppConfig::default()
    };
    AppModel::new(1024, 720, config)
}

/// Run `Tick` until `done` holds, failing after five seconds
pub fn tick_until(model: &mut AppModel, mut done: impl FnMut(&AppModel) -> bool) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while !done(model) {
        assert!(Instant::now() < deadline, "timed out waiting for condition");
        update(model, Msg::App(AppMsg::Tick));
        std::thread::sleep(Duration::from_millis(2));
    }
}

/// Send `Tick` exactly `n` times
pub fn tick_n(model: &mut AppModel, n: usize) {
    for _ in 0..n {
        update(model, Msg::App(AppMsg::Tick));
    }
}

pub fn left_click(model: &mut AppModel, x: f64, y: f64) {
    update(model, Msg::Canvas(CanvasMsg::LeftPress { x, y }));
    update(model, Msg::Canvas(CanvasMsg::LeftRelease { x, y }));
}

pub fn right_click(model: &mut AppModel, x: f64, y: f64) {
    update(model, Msg::Canvas(CanvasMsg::RightPress { x, y }));
    update(model, Msg::Canvas(CanvasMsg::RightRelease { x, y }));
}

pub fn write_csv(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).expect("write csv fixture");
    path
}

/// Counts events at `max_level` or more severe
struct EventCounter {
    max_level: Level,
    count: Arc<AtomicUsize>,
}

impl<S: Subscriber> Layer<S> for EventCounter {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() <= self.max_level {
            self.count.fetch_add(1, Ordering::SeqCst);
        }
    }
}

/// Run `f` on this thread and count the tracing events it emits at
/// `max_level` or above
pub fn count_events<R>(max_level: Level, f: impl FnOnce() -> R) -> (R, usize) {
    let count = Arc::new(AtomicUsize::new(0));
    let subscriber = tracing_subscriber::registry().with(EventCounter {
        max_level,
        count: Arc::clone(&count),
    });
    let result = tracing::subscriber::with_default(subscriber, f);
    (result, count.load(Ordering::SeqCst))
}
