//! Core business logic abstractions

pub mod config;
pub mod conversion;
pub mod feed;
pub mod log;
pub mod rates;

// Re-export main types for cleaner imports
pub use conversion::{ValidationError, ValidationErrors, convert, rate_between};
pub use feed::FeedError;
pub use rates::{RateEntry, RateTable, RateTableProvider};
