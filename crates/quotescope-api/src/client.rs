use std::time::Duration;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::models::{PagesInfoResponse, PaginatedResponse, Quote, QuoteType, Topic, TotalCount};
use crate::query::{ListQuery, QuoteFilters, ORDER_BY_ID_DESC};

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api/";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Invalid base URL: {0}")]
    InvalidUrl(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    ParseError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ApiError>;

/// Client for the quotes REST API
///
/// Cheap to clone: reqwest's client is reference counted internally, so the
/// controller hands a clone to every spawned request task.
#[derive(Debug, Clone)]
pub struct QuotesClient {
    client: reqwest::Client,
    base_url: String,
}

impl QuotesClient {
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_API_URL, Duration::from_secs(10))
    }

    pub fn with_base_url(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = normalize_base_url(base_url)?;

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static("Quotescope/0.1.0"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET quotes/total_count/` - how many quotes match the filters
    pub async fn total_count(&self, filters: &QuoteFilters) -> Result<u64> {
        let mut params = Vec::new();
        filters.push_params(&mut params);

        let body: TotalCount = self.get_json("quotes/total_count/", &params).await?;
        Ok(body.total_count)
    }

    /// `GET quotes/?position=` - the quote at a 1-based position of the filtered ordering
    pub async fn quote_at_position(&self, filters: &QuoteFilters, position: u64) -> Result<Quote> {
        let mut params = Vec::new();
        filters.push_params(&mut params);
        params.push(("position", position.to_string()));

        self.get_json("quotes/", &params).await
    }

    /// `GET quotes/pages_info/`
    pub async fn pages_info(&self, query: &ListQuery) -> Result<PagesInfoResponse> {
        self.get_json("quotes/pages_info/", &query.to_params()).await
    }

    /// `GET quotes/?page=`
    pub async fn quotes_page(&self, page: u32, query: &ListQuery) -> Result<PaginatedResponse<Quote>> {
        let mut params = vec![("page", page.to_string())];
        params.extend(query.to_params());

        self.get_json("quotes/", &params).await
    }

    /// Full-text search. The backend turns pagination off when a search term
    /// is present, so everything comes back in one response.
    pub async fn search(&self, term: &str, filters: &QuoteFilters) -> Result<Vec<Quote>> {
        let query = ListQuery {
            filters: *filters,
            search: Some(term.to_string()),
            ordering: Some(ORDER_BY_ID_DESC.to_string()),
        };

        let page: PaginatedResponse<Quote> = self.get_json("quotes/", &query.to_params()).await?;
        Ok(page.results)
    }

    /// `GET types/?topic=`
    pub async fn types(&self, topic_id: Option<u64>) -> Result<Vec<QuoteType>> {
        let params: Vec<_> = topic_id.map(|id| ("topic", id.to_string())).into_iter().collect();
        self.get_json("types/", &params).await
    }

    /// `GET topics/?type=`, sorted by id ascending
    pub async fn topics(&self, type_id: Option<u64>) -> Result<Vec<Topic>> {
        let params: Vec<_> = type_id.map(|id| ("type", id.to_string())).into_iter().collect();
        let mut topics: Vec<Topic> = self.get_json("topics/", &params).await?;
        topics.sort_by_key(|t| t.id);
        Ok(topics)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&'static str, String)],
    ) -> Result<T> {
        let url = self.endpoint(path);
        debug!("GET {} {:?}", url, params);

        let response = self.client.get(&url).query(params).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(match status {
                StatusCode::NOT_FOUND => ApiError::NotFound(url),
                StatusCode::BAD_REQUEST => ApiError::BadRequest(body),
                _ => ApiError::RequestFailed(format!("Status {}: {}", status, body)),
            });
        }

        // Read as text first so decode errors carry serde_json's message
        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// Endpoints are joined by plain concatenation, so the base must end in `/`
fn normalize_base_url(base_url: &str) -> Result<String> {
    let trimmed = base_url.trim();
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ApiError::InvalidUrl(trimmed.to_string()));
    }

    if trimmed.ends_with('/') {
        Ok(trimmed.to_string())
    } else {
        Ok(format!("{}/", trimmed))
    }
}
