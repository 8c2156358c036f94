// Client for the quotes REST API
pub mod client;
pub mod models;
pub mod query;

// Re-export common types
pub use client::{ApiError, QuotesClient, DEFAULT_API_URL};
pub use models::{FontSize, PageInfo, PagesInfoResponse, PaginatedResponse, Quote, QuoteType, Topic};
pub use query::{ListQuery, QuoteFilters, ORDER_BY_ID_DESC};
