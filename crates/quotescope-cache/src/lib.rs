// In-memory quote cache
// Keeps slider scrubbing from hammering the API

pub mod cache;

pub use cache::{FifoCache, DEFAULT_CAPACITY};
