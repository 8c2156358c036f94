use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use quotescope_api::{
    ApiError, ListQuery, PagesInfoResponse, PaginatedResponse, Quote, QuoteFilters, QuoteType, Topic,
};
use quotescope_core::{ControllerHandle, ControllerOptions, QuoteController, QuoteSource, QuoteView};

/// In-memory backend: one total per type filter, quote ids equal to positions
#[derive(Default)]
struct FakeSource {
    totals: HashMap<Option<u64>, u64>,
    count_delays: HashMap<Option<u64>, Duration>,
    failing_positions: Vec<u64>,
    quote_delay: Option<Duration>,
    quote_fetches: AtomicUsize,
    completed_fetches: AtomicUsize,
    fetched_positions: Mutex<Vec<u64>>,
}

impl FakeSource {
    fn with_total(total: u64) -> Self {
        let mut source = Self::default();
        source.totals.insert(None, total);
        source
    }

    fn fetches(&self) -> usize {
        self.quote_fetches.load(Ordering::SeqCst)
    }

    fn completed(&self) -> usize {
        self.completed_fetches.load(Ordering::SeqCst)
    }

    fn times_fetched(&self, position: u64) -> usize {
        self.fetched_positions
            .lock()
            .unwrap()
            .iter()
            .filter(|&&p| p == position)
            .count()
    }
}

fn quote(id: u64) -> Quote {
    Quote {
        id,
        quote: format!("Quote number {}", id),
        author: "Anon".to_string(),
        book: "Collected".to_string(),
        font_size: None,
        signs: None,
    }
}

fn unsupported<T>() -> quotescope_core::Result<T> {
    Err(quotescope_core::Error::ApiError(ApiError::RequestFailed(
        "not used by the controller".into(),
    )))
}

#[async_trait::async_trait]
impl QuoteSource for FakeSource {
    async fn total_count(&self, filters: &QuoteFilters) -> quotescope_core::Result<u64> {
        if let Some(delay) = self.count_delays.get(&filters.type_id) {
            tokio::time::sleep(*delay).await;
        }
        Ok(self.totals.get(&filters.type_id).copied().unwrap_or(0))
    }

    async fn quote_at(&self, _filters: &QuoteFilters, position: u64) -> quotescope_core::Result<Quote> {
        self.quote_fetches.fetch_add(1, Ordering::SeqCst);
        self.fetched_positions.lock().unwrap().push(position);
        if let Some(delay) = self.quote_delay {
            tokio::time::sleep(delay).await;
        }
        self.completed_fetches.fetch_add(1, Ordering::SeqCst);

        if self.failing_positions.contains(&position) {
            return Err(quotescope_core::Error::ApiError(ApiError::RequestFailed(
                "Status 500".into(),
            )));
        }
        Ok(quote(position))
    }

    async fn pages_info(&self, _query: &ListQuery) -> quotescope_core::Result<PagesInfoResponse> {
        unsupported()
    }

    async fn quotes_page(&self, _page: u32, _query: &ListQuery) -> quotescope_core::Result<PaginatedResponse<Quote>> {
        unsupported()
    }

    async fn search(&self, _term: &str, _filters: &QuoteFilters) -> quotescope_core::Result<Vec<Quote>> {
        unsupported()
    }

    async fn types(&self, _topic_id: Option<u64>) -> quotescope_core::Result<Vec<QuoteType>> {
        unsupported()
    }

    async fn topics(&self, _type_id: Option<u64>) -> quotescope_core::Result<Vec<Topic>> {
        unsupported()
    }
}

fn options() -> ControllerOptions {
    ControllerOptions {
        seed: Some(1234),
        ..ControllerOptions::default()
    }
}

async fn settled(handle: &ControllerHandle) -> QuoteView {
    let mut rx = handle.subscribe();
    let view = rx.wait_for(|v| !v.loading && v.quote.is_some()).await.unwrap();
    view.clone()
}

/// Let spawned tasks run and the paused clock move forward
async fn idle(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}

#[tokio::test(start_paused = true)]
async fn test_initial_position_is_random_and_in_range() {
    let source = Arc::new(FakeSource::with_total(50));
    let (handle, _task) = QuoteController::start(source.clone(), options());

    handle.set_filters(QuoteFilters::default()).unwrap();
    let view = settled(&handle).await;

    let position = view.position.unwrap();
    assert!((1..=50).contains(&position));
    assert_eq!(view.total, 50);
    assert_eq!(view.quote.unwrap().id, position);
    assert!(!view.disabled);
    assert_eq!(source.fetches(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_single_quote_is_centered_and_disabled() {
    let source = Arc::new(FakeSource::with_total(1));
    let (handle, _task) = QuoteController::start(source, options());

    handle.set_filters(QuoteFilters::default()).unwrap();
    let view = settled(&handle).await;

    assert_eq!(view.position, Some(1));
    assert_eq!(view.progress, 50.0);
    assert!(view.disabled);

    // Navigation is a no-op
    handle.step_next().unwrap();
    idle(500).await;
    assert_eq!(handle.view().position, Some(1));
}

#[tokio::test(start_paused = true)]
async fn test_zero_total_leaves_quote_absent() {
    let source = Arc::new(FakeSource::with_total(0));
    let (handle, _task) = QuoteController::start(source.clone(), options());

    handle.set_filters(QuoteFilters::default()).unwrap();
    idle(50).await;

    let view = handle.view();
    assert!(view.quote.is_none());
    assert!(!view.loading);
    assert_eq!(view.position, None);
    assert_eq!(source.fetches(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_drag_is_throttled_and_settles_once() {
    let source = Arc::new(FakeSource::with_total(1000));
    let (handle, _task) = QuoteController::start(source.clone(), options());

    handle.set_filters(QuoteFilters::default()).unwrap();
    let start = settled(&handle).await.position.unwrap();
    let base = if start < 500 { 600 } else { 100 };
    let before = source.fetches();

    // 20 moves, 10ms apart: all inside one 300ms throttle window
    handle.press().unwrap();
    for step in 0..20 {
        handle.drag_to(base + step).unwrap();
        idle(10).await;
    }
    assert_eq!(source.fetches() - before, 1, "only the leading preview goes out");
    assert!(handle.view().dragging);

    handle.release().unwrap();
    idle(400).await;

    // Leading preview plus one settle fetch for the final position
    assert_eq!(source.fetches() - before, 2);
    let positions = source.fetched_positions.lock().unwrap().clone();
    assert_eq!(positions.last(), Some(&(base + 19)));

    let view = handle.view();
    assert!(!view.dragging);
    assert_eq!(view.position, Some(base + 19));
    assert_eq!(view.quote.unwrap().id, base + 19);
}

#[tokio::test(start_paused = true)]
async fn test_long_drag_gets_trailing_previews() {
    let source = Arc::new(FakeSource::with_total(1000));
    let (handle, _task) = QuoteController::start(source.clone(), options());

    handle.set_filters(QuoteFilters::default()).unwrap();
    let start = settled(&handle).await.position.unwrap();
    let base = if start < 500 { 600 } else { 100 };
    let before = source.fetches();

    // 100 moves over ~1s
    handle.press().unwrap();
    for step in 0..100 {
        handle.drag_to(base + step).unwrap();
        idle(10).await;
    }

    let previews = source.fetches() - before;
    // One per 300ms window, give or take the window boundaries
    assert!((3..=5).contains(&previews), "got {} previews", previews);

    handle.release().unwrap();
    idle(400).await;
    assert_eq!(handle.view().quote.unwrap().id, base + 99);
}

#[tokio::test(start_paused = true)]
async fn test_cached_position_skips_network() {
    let source = Arc::new(FakeSource::with_total(100));
    let (handle, _task) = QuoteController::start(source.clone(), options());

    handle.set_filters(QuoteFilters::default()).unwrap();
    let start = settled(&handle).await.position.unwrap();
    let other = if start == 1 { 2 } else { start - 1 };

    handle.jump_to(other).unwrap();
    idle(300).await;
    let after_jump = source.fetches();
    assert_eq!(handle.view().quote.unwrap().id, other);

    // Back to the starting position: served from cache
    handle.jump_to(start).unwrap();
    idle(300).await;
    assert_eq!(source.fetches(), after_jump);
    assert_eq!(handle.view().quote.unwrap().id, start);
}

#[tokio::test(start_paused = true)]
async fn test_rapid_filter_changes_apply_only_latest() {
    let mut fake = FakeSource::with_total(5);
    fake.totals.insert(Some(1), 40);
    fake.count_delays.insert(Some(1), Duration::from_millis(200));
    fake.totals.insert(Some(2), 3);
    let source = Arc::new(fake);

    let (handle, _task) = QuoteController::start(source, options());

    handle.set_filters(QuoteFilters::new(Some(1), None)).unwrap();
    handle.set_filters(QuoteFilters::new(Some(2), None)).unwrap();

    let view = settled(&handle).await;
    assert_eq!(view.total, 3);
    assert_eq!(view.filters.type_id, Some(2));

    // The slow, superseded count never lands
    idle(500).await;
    assert_eq!(handle.view().total, 3);
}

#[tokio::test(start_paused = true)]
async fn test_failed_fetch_keeps_previous_quote() {
    let mut fake = FakeSource::with_total(10);
    // Fail every position except the one we start on
    fake.failing_positions = (1..=10).collect();
    let healthy = Arc::new(FakeSource::with_total(10));

    // Find the seeded start position with a well-behaved source first
    let (scout, _scout_task) = QuoteController::start(healthy, options());
    scout.set_filters(QuoteFilters::default()).unwrap();
    let start = settled(&scout).await.position.unwrap();
    scout.dispose().unwrap();

    fake.failing_positions.retain(|&p| p != start);
    let source = Arc::new(fake);
    let (handle, _task) = QuoteController::start(source, options());
    handle.set_filters(QuoteFilters::default()).unwrap();
    assert_eq!(settled(&handle).await.position, Some(start));

    if start < 10 {
        handle.step_next().unwrap();
    } else {
        handle.step_previous().unwrap();
    }
    idle(300).await;

    let view = handle.view();
    assert_ne!(view.position, Some(start));
    assert_eq!(view.quote.unwrap().id, start);
    assert!(!view.loading);
}

#[tokio::test(start_paused = true)]
async fn test_dispose_stops_controller() {
    let source = Arc::new(FakeSource::with_total(10));
    let (handle, task) = QuoteController::start(source, options());

    handle.set_filters(QuoteFilters::default()).unwrap();
    handle.dispose().unwrap();
    task.await.unwrap();

    assert!(handle.step_next().is_err());
}

#[tokio::test(start_paused = true)]
async fn test_small_collection_publishes_ticks() {
    let source = Arc::new(FakeSource::with_total(5));
    let (handle, _task) = QuoteController::start(source, options());

    handle.set_filters(QuoteFilters::default()).unwrap();
    let view = settled(&handle).await;

    assert_eq!(view.ticks.len(), 5);
    assert_eq!(view.ticks[0], (1, 0.0));
    assert_eq!(view.ticks[4], (5, 100.0));
}

#[tokio::test(start_paused = true)]
async fn test_large_collection_has_no_ticks() {
    let source = Arc::new(FakeSource::with_total(50));
    let (handle, _task) = QuoteController::start(source, options());

    handle.set_filters(QuoteFilters::default()).unwrap();
    assert!(settled(&handle).await.ticks.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_rejump_on_settle_tick_waits_full_debounce() {
    let source = Arc::new(FakeSource::with_total(1000));
    let (handle, _task) = QuoteController::start(source.clone(), options());

    handle.set_filters(QuoteFilters::default()).unwrap();
    settled(&handle).await;

    // Second jump lands on the very tick the first one's 150ms settle fires
    for i in 0..40 {
        let first = 100 + 2 * i;
        let second = first + 1;

        // The random start may already be one of these
        let already = source.times_fetched(second);

        handle.jump_to(first).unwrap();
        idle(150).await;
        handle.jump_to(second).unwrap();
        idle(10).await;

        assert_eq!(source.times_fetched(second), already, "{} fetched before its debounce", second);
    }

    idle(200).await;
    assert_eq!(handle.view().quote.unwrap().id, 100 + 2 * 39 + 1);
}

#[tokio::test(start_paused = true)]
async fn test_filter_change_clears_cache() {
    let mut fake = FakeSource::with_total(100);
    fake.totals.insert(Some(1), 0);
    let source = Arc::new(fake);
    let (handle, _task) = QuoteController::start(source.clone(), options());

    handle.set_filters(QuoteFilters::default()).unwrap();
    let start = settled(&handle).await.position.unwrap();
    assert_eq!(source.times_fetched(start), 1);

    handle.set_filters(QuoteFilters::new(Some(1), None)).unwrap();
    handle.set_filters(QuoteFilters::default()).unwrap();
    idle(10).await;
    let view = settled(&handle).await;

    if view.position != Some(start) {
        handle.jump_to(start).unwrap();
        idle(300).await;
    }

    // Same position, same filters, but the cache went with the first filter change
    assert_eq!(source.times_fetched(start), 2);
    assert_eq!(handle.view().quote.unwrap().id, start);
}

#[tokio::test(start_paused = true)]
async fn test_dispose_cancels_pending_settle() {
    let source = Arc::new(FakeSource::with_total(100));
    let (handle, task) = QuoteController::start(source.clone(), options());

    handle.set_filters(QuoteFilters::default()).unwrap();
    let start = settled(&handle).await.position.unwrap();
    let other = if start == 1 { 2 } else { start - 1 };
    let before = source.fetches();

    handle.jump_to(other).unwrap();
    handle.dispose().unwrap();
    task.await.unwrap();
    idle(300).await;

    assert_eq!(source.fetches(), before);
    assert_eq!(source.times_fetched(other), 0);
}

#[tokio::test(start_paused = true)]
async fn test_dispose_aborts_fetch_in_flight() {
    let mut fake = FakeSource::with_total(100);
    fake.quote_delay = Some(Duration::from_millis(500));
    let source = Arc::new(fake);
    let (handle, task) = QuoteController::start(source.clone(), options());

    handle.set_filters(QuoteFilters::default()).unwrap();
    idle(10).await;
    assert_eq!(source.fetches(), 1);
    assert!(handle.view().loading);

    handle.dispose().unwrap();
    task.await.unwrap();
    idle(1000).await;

    assert_eq!(source.fetches(), 1);
    assert_eq!(source.completed(), 0);
}
