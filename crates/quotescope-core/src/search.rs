use std::time::Duration;

use quotescope_api::{Quote, QuoteFilters};
use tokio::time::Instant;
use tracing::{error, info};

use crate::source::QuoteSource;

pub const SEARCH_ERROR: &str = "Failed to search quotes";

/// Holds the latest input and releases it once things have been quiet long enough
///
/// Poll-driven so a UI event loop can call `poll` on every tick.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// New input restarts the quiet period
    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now));
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Time left until the pending value fires
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.pending
            .as_ref()
            .map(|(_, at)| self.delay.saturating_sub(now.saturating_duration_since(*at)))
    }

    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let ready = matches!(
            &self.pending,
            Some((_, at)) if now.saturating_duration_since(*at) >= self.delay
        );

        if ready {
            self.pending.take().map(|(value, _)| value)
        } else {
            None
        }
    }
}

/// Outcome of a search, ready for display
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResults {
    pub quotes: Vec<Quote>,
    pub error: Option<String>,
    /// False when the term was empty and no request went out
    pub searched: bool,
}

/// Search quotes, newest first. A blank term is not an error, just no search.
pub async fn search_quotes(source: &dyn QuoteSource, term: &str, filters: &QuoteFilters) -> SearchResults {
    let term = term.trim();
    if term.is_empty() {
        return SearchResults::default();
    }

    match source.search(term, filters).await {
        Ok(mut quotes) => {
            quotes.sort_by(|a, b| b.id.cmp(&a.id));
            info!("Search {:?} found {} quotes", term, quotes.len());
            SearchResults {
                quotes,
                error: None,
                searched: true,
            }
        }
        Err(e) => {
            error!("Failed to search quotes: {}", e);
            SearchResults {
                quotes: Vec::new(),
                error: Some(SEARCH_ERROR.to_string()),
                searched: false,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MockQuoteSource;

    fn quote(id: u64) -> Quote {
        Quote {
            id,
            quote: "text".to_string(),
            author: String::new(),
            book: String::new(),
            font_size: None,
            signs: None,
        }
    }

    #[test]
    fn test_debouncer_waits_for_quiet() {
        let t0 = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(300));

        debouncer.push("l", t0);
        debouncer.push("lo", t0 + Duration::from_millis(100));
        assert_eq!(debouncer.poll(t0 + Duration::from_millis(350)), None);
        assert_eq!(
            debouncer.remaining(t0 + Duration::from_millis(350)),
            Some(Duration::from_millis(50))
        );

        assert_eq!(debouncer.poll(t0 + Duration::from_millis(400)), Some("lo"));
        assert!(!debouncer.is_pending());
        assert_eq!(debouncer.poll(t0 + Duration::from_millis(900)), None);
    }

    #[test]
    fn test_debouncer_cancel() {
        let t0 = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(10));
        debouncer.push(1, t0);
        debouncer.cancel();
        assert_eq!(debouncer.poll(t0 + Duration::from_secs(1)), None);
    }

    #[tokio::test]
    async fn test_blank_term_skips_request() {
        let mut source = MockQuoteSource::new();
        source.expect_search().never();

        let results = search_quotes(&source, "   ", &QuoteFilters::default()).await;
        assert!(!results.searched);
        assert!(results.quotes.is_empty());
        assert!(results.error.is_none());
    }

    #[tokio::test]
    async fn test_results_sorted_newest_first() {
        let mut source = MockQuoteSource::new();
        source
            .expect_search()
            .withf(|term, _| term == "love")
            .returning(|_, _| Ok(vec![quote(3), quote(12), quote(7)]));

        let results = search_quotes(&source, " love ", &QuoteFilters::default()).await;
        let ids: Vec<u64> = results.quotes.iter().map(|q| q.id).collect();
        assert_eq!(ids, vec![12, 7, 3]);
        assert!(results.searched);
    }

    #[tokio::test]
    async fn test_failure_gives_message() {
        let mut source = MockQuoteSource::new();
        source.expect_search().returning(|_, _| {
            Err(crate::Error::ApiError(quotescope_api::ApiError::RequestFailed(
                "boom".into(),
            )))
        });

        let results = search_quotes(&source, "war", &QuoteFilters::default()).await;
        assert_eq!(results.error.as_deref(), Some(SEARCH_ERROR));
        assert!(results.quotes.is_empty());
    }
}
