//! Core business logic abstractions

pub mod analytics;
pub mod cache;
pub mod config;
pub mod log;
pub mod market;
pub mod quote;
pub mod session;
pub mod synthetic;

// Re-export main types for cleaner imports
pub use quote::{FundQuote, QuoteOutcome, QuoteProvider};
pub use session::{Session, View};
pub use synthetic::SyntheticData;
