// Type and topic choices for the filter bar
use quotescope_api::{QuoteFilters, QuoteType, Topic};

use crate::source::QuoteSource;

/// Filter options narrowed by the other filter: types that occur under the
/// selected topic, topics that occur under the selected type
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCatalog {
    pub types: Vec<QuoteType>,
    pub topics: Vec<Topic>,
}

impl FilterCatalog {
    /// Fetch both lists concurrently
    pub async fn load(source: &dyn QuoteSource, filters: &QuoteFilters) -> crate::Result<Self> {
        let (types, topics) = futures::join!(source.types(filters.topic_id), source.topics(filters.type_id));
        Ok(Self {
            types: types?,
            topics: topics?,
        })
    }

    pub fn type_name(&self, id: Option<u64>) -> Option<&str> {
        let id = id?;
        self.types.iter().find(|t| t.id == id).map(|t| t.name.as_str())
    }

    pub fn topic_name(&self, id: Option<u64>) -> Option<&str> {
        let id = id?;
        self.topics.iter().find(|t| t.id == id).map(|t| t.name.as_str())
    }

    /// "All" -> first -> ... -> last -> "All"
    pub fn next_type(&self, current: Option<u64>) -> Option<u64> {
        cycle(self.types.iter().map(|t| t.id), current)
    }

    pub fn next_topic(&self, current: Option<u64>) -> Option<u64> {
        cycle(self.topics.iter().map(|t| t.id), current)
    }
}

fn cycle(ids: impl Iterator<Item = u64>, current: Option<u64>) -> Option<u64> {
    let ids: Vec<u64> = ids.collect();
    match current {
        None => ids.first().copied(),
        Some(id) => ids
            .iter()
            .position(|&i| i == id)
            .and_then(|i| ids.get(i + 1).copied()),
    }
}
