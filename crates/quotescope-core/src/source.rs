use crate::Result;
use quotescope_api::{
    ListQuery, PagesInfoResponse, PaginatedResponse, Quote, QuoteFilters, QuoteType, QuotesClient, Topic,
};

/// Where quotes come from - the REST client in production, fakes in tests
///
/// Keeps the controller, list browser and search free of HTTP details.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait QuoteSource: Send + Sync {
    async fn total_count(&self, filters: &QuoteFilters) -> Result<u64>;
    async fn quote_at(&self, filters: &QuoteFilters, position: u64) -> Result<Quote>;
    async fn pages_info(&self, query: &ListQuery) -> Result<PagesInfoResponse>;
    async fn quotes_page(&self, page: u32, query: &ListQuery) -> Result<PaginatedResponse<Quote>>;
    async fn search(&self, term: &str, filters: &QuoteFilters) -> Result<Vec<Quote>>;
    async fn types(&self, topic_id: Option<u64>) -> Result<Vec<QuoteType>>;
    async fn topics(&self, type_id: Option<u64>) -> Result<Vec<Topic>>;
}

#[async_trait::async_trait]
impl QuoteSource for QuotesClient {
    async fn total_count(&self, filters: &QuoteFilters) -> Result<u64> {
        Ok(QuotesClient::total_count(self, filters).await?)
    }

    async fn quote_at(&self, filters: &QuoteFilters, position: u64) -> Result<Quote> {
        Ok(self.quote_at_position(filters, position).await?)
    }

    async fn pages_info(&self, query: &ListQuery) -> Result<PagesInfoResponse> {
        Ok(QuotesClient::pages_info(self, query).await?)
    }

    async fn quotes_page(&self, page: u32, query: &ListQuery) -> Result<PaginatedResponse<Quote>> {
        Ok(QuotesClient::quotes_page(self, page, query).await?)
    }

    async fn search(&self, term: &str, filters: &QuoteFilters) -> Result<Vec<Quote>> {
        Ok(QuotesClient::search(self, term, filters).await?)
    }

    async fn types(&self, topic_id: Option<u64>) -> Result<Vec<QuoteType>> {
        Ok(QuotesClient::types(self, topic_id).await?)
    }

    async fn topics(&self, type_id: Option<u64>) -> Result<Vec<Topic>> {
        Ok(QuotesClient::topics(self, type_id).await?)
    }
}
