//! Batch lookups and the market index board.
use crate::core::config::MarketIndex;
use crate::core::quote::{QuoteOutcome, QuoteProvider};
use futures::future::join_all;
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct IndexSnapshot {
    pub name: String,
    pub value: f64,
    pub change_percent: f64,
}

/// Fetches every code concurrently. The result keeps the order of `codes`
/// and each outcome only reflects its own lookup.
pub async fn fetch_many(
    provider: &(dyn QuoteProvider + Send + Sync),
    codes: &[String],
    update_callback: &(dyn Fn() + Sync),
) -> Vec<(String, QuoteOutcome)> {
    let futures = codes.iter().map(|code| async move {
        let outcome = provider.fetch_quote(code).await;
        update_callback();
        (code.clone(), outcome)
    });
    join_all(futures).await
}

/// Values of the configured index proxies. Entries that cannot be fetched
/// are left out.
pub async fn market_board(
    provider: &(dyn QuoteProvider + Send + Sync),
    indices: &[MarketIndex],
) -> Vec<IndexSnapshot> {
    let codes: Vec<String> = indices.iter().map(|idx| idx.code.clone()).collect();
    let outcomes = fetch_many(provider, &codes, &|| ()).await;

    indices
        .iter()
        .zip(outcomes)
        .filter_map(|(index, (_, outcome))| match outcome {
            QuoteOutcome::Available(quote) => Some(IndexSnapshot {
                name: index.name.clone(),
                value: quote.current_valuation,
                change_percent: quote.change_percent,
            }),
            QuoteOutcome::Unavailable => {
                debug!("Skipping index {} ({})", index.name, index.code);
                None
            }
        })
        .collect()
}
