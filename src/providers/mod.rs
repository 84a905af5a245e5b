pub mod caching;
pub mod fundgz;

pub use caching::CachingQuoteProvider;
pub use fundgz::FundgzProvider;
