//! Core abstractions shared by the server and the rate pipeline

pub mod cache;
pub mod config;
pub mod journal;
pub mod log;
pub mod rate;

// Re-export main types for cleaner imports
pub use cache::RateCache;
pub use journal::{FileJournal, MessageJournal};
pub use rate::{DailyRateResult, RateEntry, RateProvider, RateRequestSpec};
