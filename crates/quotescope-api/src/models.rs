use serde::{Deserialize, Serialize};

/// A single quote as the backend serves it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub id: u64,
    pub quote: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub book: String,
    #[serde(default)]
    pub font_size: Option<FontSize>,
    /// Character count of the quote text
    #[serde(default)]
    pub signs: Option<u32>,
}

/// Display size bucket, picked by the backend from the text length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontSize {
    Min,    // > 600 chars
    Under,  // > 400
    Middle, // > 300
    Upper,  // > 100
    Max,
}

impl FontSize {
    /// Same thresholds the backend uses, for quotes that arrive without one
    pub fn for_length(signs: usize) -> Self {
        match signs {
            s if s > 600 => FontSize::Min,
            s if s > 400 => FontSize::Under,
            s if s > 300 => FontSize::Middle,
            s if s > 100 => FontSize::Upper,
            _ => FontSize::Max,
        }
    }
}

impl Quote {
    pub fn font_size(&self) -> FontSize {
        self.font_size
            .unwrap_or_else(|| FontSize::for_length(self.quote.chars().count()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteType {
    pub id: u64,
    #[serde(rename = "type")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    pub id: u64,
    #[serde(rename = "topic")]
    pub name: String,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub(crate) struct TotalCount {
    pub total_count: u64,
}

/// One entry of the `pages_info` listing. Opaque to the client beyond display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    pub page: u32,
    pub start_item: u64,
    pub end_item: u64,
    pub items_count: u64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagesInfoResponse {
    pub total_count: u64,
    pub total_pages: u32,
    pub page_size: u32,
    pub pages: Vec<PageInfo>,
    /// Set when type/topic/search make the backend return everything at once
    #[serde(default)]
    pub pagination_disabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub count: u64,
    pub total_pages: u32,
    pub current_page: u32,
    pub page_size: u64,
    pub items_on_page: u64,
    pub start_item: u64,
    pub end_item: u64,
    pub page_label: String,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_ignores_unknown_fields() {
        let json = r#"{
            "id": 42,
            "quote": "Manuscripts don't burn.",
            "author": "Bulgakov",
            "book": "The Master and Margarita",
            "type": [1, 3],
            "topics": [2],
            "signs": 23,
            "font_size": "max"
        }"#;

        let quote: Quote = serde_json::from_str(json).unwrap();
        assert_eq!(quote.id, 42);
        assert_eq!(quote.font_size, Some(FontSize::Max));
        assert_eq!(quote.signs, Some(23));
    }

    #[test]
    fn test_quote_missing_optional_fields() {
        let quote: Quote = serde_json::from_str(r#"{"id": 1, "quote": "x"}"#).unwrap();
        assert!(quote.author.is_empty());
        assert_eq!(quote.font_size(), FontSize::Max);
    }

    #[test]
    fn test_font_size_thresholds() {
        assert_eq!(FontSize::for_length(601), FontSize::Min);
        assert_eq!(FontSize::for_length(600), FontSize::Under);
        assert_eq!(FontSize::for_length(301), FontSize::Middle);
        assert_eq!(FontSize::for_length(101), FontSize::Upper);
        assert_eq!(FontSize::for_length(100), FontSize::Max);
    }

    #[test]
    fn test_pages_info_defaults_pagination_flag() {
        let json = r#"{
            "total_count": 250,
            "total_pages": 2,
            "page_size": 100,
            "pages": [
                {"page": 1, "start_item": 1, "end_item": 100, "items_count": 100, "label": "151 - 250"},
                {"page": 2, "start_item": 101, "end_item": 250, "items_count": 150, "label": "1 - 150"}
            ]
        }"#;

        let info: PagesInfoResponse = serde_json::from_str(json).unwrap();
        assert!(!info.pagination_disabled);
        assert_eq!(info.pages[1].label, "1 - 150");
    }

    #[test]
    fn test_type_and_topic_field_names() {
        let kind: QuoteType = serde_json::from_str(r#"{"id": 2, "type": "Prose"}"#).unwrap();
        let topic: Topic = serde_json::from_str(r#"{"id": 7, "topic": "Love"}"#).unwrap();
        assert_eq!(kind.name, "Prose");
        assert_eq!(topic.name, "Love");
    }
}
