// Paged list of quotes, newest first
use quotescope_api::{ListQuery, PageInfo, PagesInfoResponse, Quote};
use tracing::{error, warn};

use crate::pagination::Pagination;
use crate::source::QuoteSource;

pub const PAGES_INFO_ERROR: &str = "Failed to load pagination info";
pub const QUOTES_ERROR: &str = "Failed to load quotes";

/// State behind the list view
///
/// The backend pages unfiltered listings itself. As soon as a type, topic or
/// search term is in play it turns pagination off and returns everything on
/// page 1; those results are bucketed locally so the view still pages.
#[derive(Debug, Clone)]
pub struct ListBrowser {
    query: ListQuery,
    page_size: usize,
    pages_info: Option<PagesInfoResponse>,
    /// Current server page; unused while paging locally
    quotes: Vec<Quote>,
    pagination: Pagination,
    error: Option<String>,
    loading: bool,
}

impl ListBrowser {
    pub fn new(page_size: usize) -> Self {
        Self {
            query: ListQuery::default(),
            page_size,
            pages_info: None,
            quotes: Vec::new(),
            pagination: Pagination::server(1, 1),
            error: None,
            loading: false,
        }
    }

    pub fn query(&self) -> &ListQuery {
        &self.query
    }

    pub fn page(&self) -> u32 {
        self.pagination.current_page() as u32
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_paged_locally(&self) -> bool {
        matches!(self.pagination, Pagination::Client { .. })
    }

    /// Swap the query. The page goes back to 1 only on an actual change.
    pub fn set_query(&mut self, query: ListQuery) -> bool {
        if query == self.query {
            return false;
        }
        self.query = query;
        self.pagination.go_to_page(1);
        true
    }

    pub fn total_pages(&self) -> u32 {
        self.pagination.total_pages() as u32
    }

    /// Labels for the page bar, in page order
    pub fn page_labels(&self) -> Vec<String> {
        match (&self.pagination, &self.pages_info) {
            (Pagination::Client { .. }, _) => self.pagination.labels().to_vec(),
            (Pagination::Server { .. }, Some(info)) => info.pages.iter().map(|p| p.label.clone()).collect(),
            (Pagination::Server { .. }, None) => Vec::new(),
        }
    }

    /// Page metadata for the page bar; locally paged results get it built
    /// from their buckets
    pub fn page_infos(&self) -> Vec<PageInfo> {
        match (&self.pagination, &self.pages_info) {
            (Pagination::Client { buckets, .. }, _) => {
                let mut start = 1;
                buckets
                    .labels()
                    .iter()
                    .enumerate()
                    .map(|(i, label)| {
                        let count = buckets.page(i + 1).len() as u64;
                        let info = PageInfo {
                            page: i as u32 + 1,
                            start_item: start,
                            end_item: start + count.saturating_sub(1),
                            items_count: count,
                            label: label.clone(),
                        };
                        start += count;
                        info
                    })
                    .collect()
            }
            (Pagination::Server { .. }, Some(info)) => info.pages.clone(),
            (Pagination::Server { .. }, None) => Vec::new(),
        }
    }

    /// Quotes to render for the current page
    pub fn quotes(&self) -> &[Quote] {
        match &self.pagination {
            Pagination::Client { .. } => self.pagination.current_items(),
            Pagination::Server { .. } => &self.quotes,
        }
    }

    /// Move to a page. Returns true when the owner should `load_page`.
    pub fn go_to_page(&mut self, page: u32) -> bool {
        self.pagination.go_to_page(page as usize).is_some()
    }

    pub fn go_next(&mut self) -> bool {
        self.pagination.go_next().is_some()
    }

    pub fn go_previous(&mut self) -> bool {
        self.pagination.go_previous().is_some()
    }

    /// Fetch page metadata, fix up an out-of-range page, then fetch the page
    pub async fn refresh(&mut self, source: &dyn QuoteSource) {
        self.loading = true;
        self.error = None;

        match source.pages_info(&self.query).await {
            Ok(info) => {
                if !info.pagination_disabled {
                    self.pagination = Pagination::server(self.page(), info.total_pages);
                }
                self.pages_info = Some(info);
            }
            Err(e) => {
                error!("Failed to fetch pages info: {}", e);
                self.error = Some(PAGES_INFO_ERROR.to_string());
                self.loading = false;
                return;
            }
        }

        self.load_page(source).await;
    }

    /// Fetch the quotes for the current page
    pub async fn load_page(&mut self, source: &dyn QuoteSource) {
        let disabled = self
            .pages_info
            .as_ref()
            .map(|info| info.pagination_disabled)
            .unwrap_or(false);

        self.loading = true;
        self.error = None;

        // With pagination off there is only page 1 on the server
        let server_page = if disabled { 1 } else { self.page() };

        match source.quotes_page(server_page, &self.query).await {
            Ok(response) => {
                if disabled {
                    self.pagination.replace_items(response.results, self.page_size);
                    self.quotes.clear();
                } else {
                    self.quotes = response.results;
                }
            }
            Err(e) => {
                warn!("Failed to fetch quotes page {}: {}", server_page, e);
                self.error = Some(QUOTES_ERROR.to_string());
                self.quotes.clear();
                if self.is_paged_locally() {
                    self.pagination.replace_items(Vec::new(), self.page_size);
                }
            }
        }

        self.loading = false;
    }
}

impl Default for ListBrowser {
    fn default() -> Self {
        Self::new(crate::pagination::DEFAULT_PAGE_SIZE)
    }
}
