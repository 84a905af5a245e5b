use crate::core::cache::Cache;
use crate::core::quote::{FundQuote, QuoteOutcome, QuoteProvider};
use crate::store::MemoryCache;
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// Serves repeated lookups of a code from memory for `ttl`.
///
/// Only available quotes are kept, so a code that failed is fetched again on
/// the next call.
pub struct CachingQuoteProvider<P: QuoteProvider> {
    inner: P,
    cache: MemoryCache<String, FundQuote>,
    ttl: Duration,
}

impl<P: QuoteProvider> CachingQuoteProvider<P> {
    pub fn new(inner: P, ttl: Duration) -> Self {
        Self {
            inner,
            cache: MemoryCache::new(),
            ttl,
        }
    }
}

#[async_trait]
impl<P: QuoteProvider> QuoteProvider for CachingQuoteProvider<P> {
    async fn fetch_quote(&self, code: &str) -> QuoteOutcome {
        let key = code.to_string();
        if let Some(quote) = self.cache.get(&key).await {
            debug!("Cache hit for quote: {}", code);
            return QuoteOutcome::Available(quote);
        }

        let outcome = self.inner.fetch_quote(code).await;
        if let QuoteOutcome::Available(quote) = &outcome {
            self.cache.put(key, quote.clone(), Some(self.ttl)).await;
        }
        outcome
    }

    async fn invalidate(&self) {
        debug!("Clearing quote cache");
        self.cache.clear().await;
        self.inner.invalidate().await;
    }
}
