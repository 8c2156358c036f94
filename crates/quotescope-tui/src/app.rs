// TUI application state
use std::time::Duration;

use quotescope_api::{ListQuery, QuoteFilters};
use quotescope_core::position::snap_to;
use quotescope_core::{Debouncer, FilterCatalog, ListBrowser, QuoteView, SearchResults, Theme};
use ratatui::layout::Rect;
use ratatui::widgets::ListState;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Quote, // One quote with the position slider
    List,  // Paged list, newest first
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,    // Navigating
    Searching, // Typing in search box
}

/// Where the slider track was last drawn, for mouse hit testing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliderTrack {
    pub x: u16,
    pub y: u16,
    pub width: u16,
}

impl SliderTrack {
    pub fn from_rect(area: Rect) -> Self {
        Self {
            x: area.x,
            y: area.y,
            width: area.width,
        }
    }

    pub fn contains(&self, column: u16, row: u16) -> bool {
        row == self.y && column >= self.x && column < self.x + self.width
    }

    /// Percentage along the track for a column, clamped to the ends
    pub fn progress_at(&self, column: u16) -> f64 {
        if self.width <= 1 {
            return 50.0;
        }
        let offset = column.saturating_sub(self.x).min(self.width - 1);
        offset as f64 / (self.width - 1) as f64 * 100.0
    }

    /// Column for a percentage along the track
    pub fn column_at(&self, progress: f64) -> u16 {
        if self.width <= 1 {
            return self.x;
        }
        let offset = (progress.clamp(0.0, 100.0) / 100.0 * (self.width - 1) as f64).round() as u16;
        self.x + offset
    }
}

pub struct App {
    pub should_quit: bool,
    pub screen: Screen,
    pub input_mode: InputMode,
    pub theme: Theme,
    pub filters: QuoteFilters,
    pub catalog: FilterCatalog,
    pub view: QuoteView,
    pub search_input: String,
    pub search_debouncer: Debouncer<String>,
    /// Term that `search` was produced for
    pub active_search: String,
    pub search: SearchResults,
    pub list: ListBrowser,
    pub list_state: ListState,
    /// List query changed while the list screen was hidden
    pub list_stale: bool,
    pub slider: Option<SliderTrack>,
    pub mouse_dragging: bool,
    pub error_message: Option<String>,
}

impl App {
    pub fn new(theme: Theme, page_size: usize, search_debounce: Duration) -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));

        Self {
            should_quit: false,
            screen: Screen::Quote,
            input_mode: InputMode::Normal,
            theme,
            filters: QuoteFilters::default(),
            catalog: FilterCatalog::default(),
            view: QuoteView::default(),
            search_input: String::new(),
            search_debouncer: Debouncer::new(search_debounce),
            active_search: String::new(),
            search: SearchResults::default(),
            list: ListBrowser::new(page_size),
            list_state,
            list_stale: true,
            slider: None,
            mouse_dragging: false,
            error_message: None,
        }
    }

    pub fn enter_search_mode(&mut self) {
        self.input_mode = InputMode::Searching;
    }

    pub fn enter_normal_mode(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn push_search_char(&mut self, c: char, now: Instant) {
        self.search_input.push(c);
        self.search_debouncer.push(self.search_input.clone(), now);
    }

    pub fn pop_search_char(&mut self, now: Instant) {
        if self.search_input.pop().is_some() {
            self.search_debouncer.push(self.search_input.clone(), now);
        }
    }

    /// Esc in the search box: drop the term right away, no debounce
    pub fn clear_search(&mut self) {
        self.search_input.clear();
        self.search_debouncer.cancel();
    }

    pub fn is_searching(&self) -> bool {
        self.search.searched || self.search.error.is_some()
    }

    /// Query the list should show for the current filters and search term
    pub fn list_query(&self) -> ListQuery {
        ListQuery::with_filters(self.filters).search(&self.active_search)
    }

    /// Point the list at the current query. True when it needs a refresh now.
    pub fn sync_list_query(&mut self) -> bool {
        if self.list.set_query(self.list_query()) {
            self.list_stale = true;
            self.reset_selection();
        }
        self.list_stale && self.screen == Screen::List
    }

    pub fn cycle_type(&mut self) -> QuoteFilters {
        self.filters.type_id = self.catalog.next_type(self.filters.type_id);
        self.filters
    }

    pub fn cycle_topic(&mut self) -> QuoteFilters {
        self.filters.topic_id = self.catalog.next_topic(self.filters.topic_id);
        self.filters
    }

    pub fn clear_filters(&mut self) -> QuoteFilters {
        self.filters = QuoteFilters::default();
        self.filters
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggle();
        self.theme
    }

    pub fn toggle_screen(&mut self) {
        self.screen = match self.screen {
            Screen::Quote => Screen::List,
            Screen::List => Screen::Quote,
        };
    }

    /// Slider position under a column, if the slider is live
    pub fn position_at_column(&self, column: u16) -> Option<u64> {
        let slider = self.slider?;
        if self.view.disabled || self.view.total == 0 {
            return None;
        }
        Some(snap_to(slider.progress_at(column), self.view.total))
    }

    /// Rows shown in the list pane: search hits on the quote screen, else the page
    pub fn visible_count(&self) -> usize {
        match self.screen {
            Screen::Quote => self.search.quotes.len(),
            Screen::List => self.list.quotes().len(),
        }
    }

    pub fn next_row(&mut self) {
        let count = self.visible_count();
        if count == 0 {
            return;
        }
        let next = self.list_state.selected().map_or(0, |i| (i + 1).min(count - 1));
        self.list_state.select(Some(next));
    }

    pub fn previous_row(&mut self) {
        let previous = self.list_state.selected().map_or(0, |i| i.saturating_sub(1));
        self.list_state.select(Some(previous));
    }

    pub fn reset_selection(&mut self) {
        self.list_state.select(Some(0));
    }

    pub fn clear_error(&mut self) {
        self.error_message = None;
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new(
            Theme::default(),
            quotescope_core::pagination::DEFAULT_PAGE_SIZE,
            Duration::from_millis(300),
        )
    }
}
