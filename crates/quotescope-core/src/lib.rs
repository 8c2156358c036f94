// Core logic: position tracking, drag coordination, paging, search
pub mod catalog;
pub mod config;
pub mod controller;
pub mod coordinator;
pub mod error;
pub mod list;
pub mod pagination;
pub mod position;
pub mod search;
pub mod source;
pub mod theme;

pub use catalog::FilterCatalog;
pub use config::Config;
pub use controller::{ControllerHandle, ControllerOptions, QuoteController, QuoteView};
pub use coordinator::{Directive, DragCoordinator, DragPhase};
pub use error::Error;
pub use list::ListBrowser;
pub use pagination::{Buckets, PageSlot, Pagination};
pub use position::PositionStore;
pub use search::{search_quotes, Debouncer, SearchResults};
pub use source::QuoteSource;
pub use theme::Theme;

/// Result type alias because typing Result<T, Error> everywhere is tedious
pub type Result<T> = std::result::Result<T, Error>;
