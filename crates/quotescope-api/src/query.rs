// Query-string building for the quotes endpoints
use serde::{Deserialize, Serialize};

/// Type/topic filter pair. Position semantics are relative to this.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuoteFilters {
    pub type_id: Option<u64>,
    pub topic_id: Option<u64>,
}

impl QuoteFilters {
    pub fn new(type_id: Option<u64>, topic_id: Option<u64>) -> Self {
        Self { type_id, topic_id }
    }

    pub fn is_empty(&self) -> bool {
        self.type_id.is_none() && self.topic_id.is_none()
    }

    pub(crate) fn push_params(&self, params: &mut Vec<(&'static str, String)>) {
        if let Some(id) = self.type_id {
            params.push(("type", id.to_string()));
        }
        if let Some(id) = self.topic_id {
            params.push(("topic", id.to_string()));
        }
    }
}

/// Everything the list endpoints accept besides the page number
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListQuery {
    pub filters: QuoteFilters,
    pub search: Option<String>,
    pub ordering: Option<String>,
}

/// Newest first - what both the list and search views ask for
pub const ORDER_BY_ID_DESC: &str = "-id";

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            filters: QuoteFilters::default(),
            search: None,
            ordering: Some(ORDER_BY_ID_DESC.to_string()),
        }
    }
}

impl ListQuery {
    pub fn with_filters(filters: QuoteFilters) -> Self {
        Self {
            filters,
            ..Self::default()
        }
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        let term = term.into();
        self.search = if term.trim().is_empty() { None } else { Some(term) };
        self
    }

    pub(crate) fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        self.filters.push_params(&mut params);

        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            params.push(("search", search.to_string()));
        }
        if let Some(ordering) = self.ordering.as_deref().filter(|s| !s.is_empty()) {
            params.push(("ordering", ordering.to_string()));
        }

        params
    }
}
