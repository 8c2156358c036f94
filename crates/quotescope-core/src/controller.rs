// Position/paging controller for the single-quote view
//
// One tokio task owns every piece of mutable state (position, cache, drag
// coordinator, timers, in-flight requests). Callers talk to it through a
// `ControllerHandle` and watch a `QuoteView`. Timers and requests are spawned
// tasks that post back into the same loop. Requests are tagged with the filter
// generation they were started under so late arrivals from old filters are
// dropped; timer events carry the sequence number of the timer that sent them.
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use quotescope_api::{Quote, QuoteFilters};
use quotescope_cache::FifoCache;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use crate::config::NavigationConfig;
use crate::coordinator::{Directive, DragCoordinator};
use crate::position::PositionStore;
use crate::source::QuoteSource;

/// Snapshot of what the quote view should render
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuoteView {
    pub filters: QuoteFilters,
    pub quote: Option<Quote>,
    pub position: Option<u64>,
    pub total: u64,
    pub progress: f64,
    /// `(position, progress)` tick marks, only for small collections
    pub ticks: Vec<(u64, f64)>,
    pub disabled: bool,
    pub dragging: bool,
    pub loading: bool,
}

#[derive(Debug, Clone)]
pub struct ControllerOptions {
    pub throttle: Duration,
    pub debounce: Duration,
    pub cache_capacity: usize,
    /// Fixed seed for the random starting position (tests)
    pub seed: Option<u64>,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self::from(&NavigationConfig::default())
    }
}

impl From<&NavigationConfig> for ControllerOptions {
    fn from(config: &NavigationConfig) -> Self {
        Self {
            throttle: config.throttle(),
            debounce: config.debounce(),
            cache_capacity: config.cache_capacity,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    SetFilters(QuoteFilters),
    Press,
    DragTo(u64),
    Release,
    JumpTo(u64),
    StepNext,
    StepPrevious,
    Dispose,
}

#[derive(Debug)]
enum Event {
    Counted {
        generation: u64,
        result: crate::Result<u64>,
    },
    Fetched {
        generation: u64,
        position: u64,
        result: crate::Result<Quote>,
    },
    TrailingElapsed {
        seq: u64,
    },
    SettleElapsed {
        seq: u64,
    },
}

/// Cloneable front door to a running controller
#[derive(Debug, Clone)]
pub struct ControllerHandle {
    commands: mpsc::UnboundedSender<Command>,
    view: watch::Receiver<QuoteView>,
}

impl ControllerHandle {
    /// Switch filters: clears the cache, cancels pending work and picks a new
    /// random quote from the filtered set
    pub fn set_filters(&self, filters: QuoteFilters) -> crate::Result<()> {
        self.send(Command::SetFilters(filters))
    }

    /// Pointer down on the slider track
    pub fn press(&self) -> crate::Result<()> {
        self.send(Command::Press)
    }

    /// Continuous position change while dragging
    pub fn drag_to(&self, position: u64) -> crate::Result<()> {
        self.send(Command::DragTo(position))
    }

    /// Pointer up; settles on the current position
    pub fn release(&self) -> crate::Result<()> {
        self.send(Command::Release)
    }

    /// Final position change (track click, typed position)
    pub fn jump_to(&self, position: u64) -> crate::Result<()> {
        self.send(Command::JumpTo(position))
    }

    pub fn step_next(&self) -> crate::Result<()> {
        self.send(Command::StepNext)
    }

    pub fn step_previous(&self) -> crate::Result<()> {
        self.send(Command::StepPrevious)
    }

    /// Cancel every timer and request and stop the controller task
    pub fn dispose(&self) -> crate::Result<()> {
        self.send(Command::Dispose)
    }

    pub fn view(&self) -> QuoteView {
        self.view.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<QuoteView> {
        self.view.clone()
    }

    fn send(&self, command: Command) -> crate::Result<()> {
        self.commands
            .send(command)
            .map_err(|_| crate::Error::ControllerClosed)
    }
}

pub struct QuoteController {
    source: Arc<dyn QuoteSource>,
    filters: QuoteFilters,
    generation: u64,
    position: PositionStore,
    cache: FifoCache<u64, Quote>,
    coordinator: DragCoordinator,
    quote: Option<Quote>,
    loading: bool,
    rng: StdRng,
    count_task: Option<JoinHandle<()>>,
    in_flight: HashMap<u64, JoinHandle<()>>,
    timer_seq: u64,
    trailing_timer: Option<Timer>,
    settle_timer: Option<Timer>,
    events: mpsc::UnboundedSender<Event>,
    view: watch::Sender<QuoteView>,
}

impl QuoteController {
    /// Spawn the controller task. Must be called from inside a tokio runtime.
    ///
    /// Nothing is fetched until the first `set_filters`.
    pub fn start(
        source: Arc<dyn QuoteSource>,
        options: ControllerOptions,
    ) -> (ControllerHandle, JoinHandle<()>) {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (view_tx, view_rx) = watch::channel(QuoteView {
            disabled: true,
            ..QuoteView::default()
        });

        let rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let controller = Self {
            source,
            filters: QuoteFilters::default(),
            generation: 0,
            position: PositionStore::new(),
            cache: FifoCache::new(options.cache_capacity),
            coordinator: DragCoordinator::new(options.throttle, options.debounce),
            quote: None,
            loading: false,
            rng,
            count_task: None,
            in_flight: HashMap::new(),
            timer_seq: 0,
            trailing_timer: None,
            settle_timer: None,
            events: event_tx,
            view: view_tx,
        };

        let task = tokio::spawn(controller.run(command_rx, event_rx));
        let handle = ControllerHandle {
            commands: command_tx,
            view: view_rx,
        };

        (handle, task)
    }

    async fn run(
        mut self,
        mut commands: mpsc::UnboundedReceiver<Command>,
        mut events: mpsc::UnboundedReceiver<Event>,
    ) {
        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(Command::Dispose) | None => break,
                    Some(command) => self.handle_command(command),
                },
                // We hold a sender ourselves, so this never yields None
                Some(event) = events.recv() => self.handle_event(event),
            }
            self.publish();
        }

        self.dispose();
        debug!("Quote controller stopped");
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::SetFilters(filters) => self.change_filters(filters),
            Command::Press => {
                if self.position.is_disabled() {
                    return;
                }
                self.coordinator.press();
                abort(&mut self.settle_timer);
            }
            Command::DragTo(position) => {
                if self.position.is_disabled() {
                    return;
                }
                let position = self.position.clamp(position);
                self.position.set(position);
                self.show_cached(position);

                let directive = self.coordinator.update(position, Instant::now());
                self.apply(directive);
            }
            Command::Release => {
                if !self.coordinator.is_dragging() {
                    return;
                }
                if let Some(position) = self.position.current() {
                    let directive = self.coordinator.release(position);
                    self.apply(directive);
                }
            }
            Command::JumpTo(position) => {
                if self.position.is_disabled() {
                    return;
                }
                let position = self.position.clamp(position);
                self.settle_on(position);
            }
            Command::StepNext => {
                if let Some(position) = self.position.step_next() {
                    self.settle_on(position);
                }
            }
            Command::StepPrevious => {
                if let Some(position) = self.position.step_previous() {
                    self.settle_on(position);
                }
            }
            // Handled by the run loop
            Command::Dispose => {}
        }
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Counted { generation, result } => {
                if generation != self.generation {
                    return;
                }
                self.count_task = None;

                match result {
                    Ok(0) => {
                        info!("No quotes match {:?}", self.filters);
                        self.quote = None;
                        self.loading = false;
                    }
                    Ok(total) => {
                        if let Some(position) = self.position.randomize(total, &mut self.rng) {
                            debug!("Starting at {}/{}", position, total);
                            self.request_quote(position);
                        }
                    }
                    Err(e) => {
                        error!("Failed to fetch total count: {}", e);
                        self.quote = None;
                        self.loading = false;
                    }
                }
            }
            Event::Fetched {
                generation,
                position,
                result,
            } => {
                if generation != self.generation {
                    return;
                }
                self.in_flight.remove(&position);

                match result {
                    Ok(quote) => {
                        self.cache.put(position, quote.clone());
                        if self.should_display(position) {
                            self.quote = Some(quote);
                        }
                    }
                    Err(e) => warn!("Failed to fetch quote at position {}: {}", position, e),
                }

                if self.in_flight.is_empty() {
                    self.loading = false;
                }
            }
            Event::TrailingElapsed { seq } => {
                // A timer re-armed or cancelled after this one fired
                if !is_armed(&self.trailing_timer, seq) {
                    return;
                }
                self.trailing_timer = None;
                if let Some(position) = self.coordinator.trailing_elapsed(Instant::now()) {
                    self.request_quote(position);
                }
            }
            Event::SettleElapsed { seq } => {
                if !is_armed(&self.settle_timer, seq) {
                    return;
                }
                self.settle_timer = None;
                if let Some(position) = self.coordinator.settle_elapsed() {
                    debug!("Settled on {}", position);
                    self.request_quote(position);
                }
            }
        }
    }

    fn change_filters(&mut self, filters: QuoteFilters) {
        info!("Filters changed to {:?}", filters);
        self.cancel_pending();

        self.generation += 1;
        self.filters = filters;
        self.cache.clear();
        self.position.reset();
        self.coordinator.reset();
        self.quote = None;
        self.loading = true;

        let generation = self.generation;
        let source = Arc::clone(&self.source);
        let events = self.events.clone();
        self.count_task = Some(tokio::spawn(async move {
            let result = source.total_count(&filters).await;
            let _ = events.send(Event::Counted { generation, result });
        }));
    }

    /// Discrete, final position change
    fn settle_on(&mut self, position: u64) {
        self.position.set(position);
        self.show_cached(position);
        let directive = self.coordinator.release(position);
        self.apply(directive);
    }

    fn apply(&mut self, directive: Directive) {
        match directive {
            Directive::Skip => {}
            Directive::CancelTrailing => abort(&mut self.trailing_timer),
            Directive::Preview(position) => {
                abort(&mut self.trailing_timer);
                self.request_quote(position);
            }
            Directive::ScheduleTrailing { delay, .. } => {
                abort(&mut self.trailing_timer);
                self.trailing_timer = Some(self.schedule(delay, |seq| Event::TrailingElapsed { seq }));
            }
            Directive::ScheduleSettle { delay, .. } => {
                abort(&mut self.trailing_timer);
                abort(&mut self.settle_timer);
                self.settle_timer = Some(self.schedule(delay, |seq| Event::SettleElapsed { seq }));
            }
        }
    }

    /// Arm a timer. Its event carries a fresh sequence number, so an event
    /// already queued by a timer that was since replaced is recognisably stale.
    fn schedule(&mut self, delay: Duration, event: impl FnOnce(u64) -> Event) -> Timer {
        self.timer_seq += 1;
        let seq = self.timer_seq;
        let event = event(seq);
        let events = self.events.clone();
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = events.send(event);
        });
        Timer { seq, task }
    }

    /// Cache first, then the network. One request per position at a time.
    fn request_quote(&mut self, position: u64) {
        if let Some(quote) = self.cache.get(&position) {
            debug!("Cache hit for position {}", position);
            if self.should_display(position) {
                self.quote = Some(quote.clone());
            }
            if self.in_flight.is_empty() {
                self.loading = false;
            }
            return;
        }

        if self.in_flight.contains_key(&position) {
            debug!("Position {} already in flight", position);
            return;
        }

        debug!("Cache miss for position {}, fetching", position);
        let generation = self.generation;
        let filters = self.filters;
        let source = Arc::clone(&self.source);
        let events = self.events.clone();

        let task = tokio::spawn(async move {
            let result = source.quote_at(&filters, position).await;
            let _ = events.send(Event::Fetched {
                generation,
                position,
                result,
            });
        });
        self.in_flight.insert(position, task);
    }

    fn show_cached(&mut self, position: u64) {
        if let Some(quote) = self.cache.get(&position) {
            self.quote = Some(quote.clone());
        }
    }

    /// The quote for the current position always shows; while dragging, the
    /// newest preview shows even if the thumb has already moved on.
    fn should_display(&self, position: u64) -> bool {
        self.position.current() == Some(position)
            || (self.coordinator.is_dragging() && self.coordinator.last_requested() == Some(position))
    }

    fn cancel_pending(&mut self) {
        if let Some(task) = self.count_task.take() {
            task.abort();
        }
        for (_, task) in self.in_flight.drain() {
            task.abort();
        }
        abort(&mut self.trailing_timer);
        abort(&mut self.settle_timer);
    }

    fn dispose(&mut self) {
        self.cancel_pending();
        self.generation += 1;
        self.cache.clear();
    }

    fn publish(&self) {
        let view = QuoteView {
            filters: self.filters,
            quote: self.quote.clone(),
            position: self.position.current(),
            total: self.position.total(),
            progress: self.position.progress(),
            ticks: self.position.ticks(),
            disabled: self.position.is_disabled(),
            dragging: self.coordinator.is_dragging(),
            loading: self.loading,
        };

        self.view.send_if_modified(|current| {
            if *current == view {
                false
            } else {
                *current = view;
                true
            }
        });
    }
}

/// A pending timer task and the sequence number its event will carry
#[derive(Debug)]
struct Timer {
    seq: u64,
    task: JoinHandle<()>,
}

fn abort(timer: &mut Option<Timer>) {
    if let Some(timer) = timer.take() {
        timer.task.abort();
    }
}

fn is_armed(timer: &Option<Timer>, seq: u64) -> bool {
    timer.as_ref().is_some_and(|t| t.seq == seq)
}
