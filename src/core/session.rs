//! Per-session dashboard state and the actions that change it.
//!
//! A [`Session`] is created when the user starts looking at funds, is mutated
//! only through the methods below, and is dropped when the session ends.
//! Nothing here is persisted.
use crate::core::config::HoldingConfig;
use crate::core::market::fetch_many;
use crate::core::quote::{FundQuote, QuoteOutcome, QuoteProvider};
use crate::core::synthetic::{CostBasis, SyntheticData};
use chrono::{DateTime, Local};
use tracing::{debug, info, warn};

/// Minimum query length before a search hits the network.
pub const MIN_SEARCH_LEN: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Portfolio,
    Watchlist,
    Market,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Holding {
    pub quote: FundQuote,
    pub held_share: f64,
    pub cost: CostBasis,
}

impl Holding {
    pub fn market_value(&self) -> f64 {
        self.quote.current_valuation * self.held_share
    }

    pub fn profit(&self) -> f64 {
        (self.quote.current_valuation - self.cost.value()) * self.held_share
    }
}

#[derive(Debug, Default, PartialEq)]
pub struct RefreshReport {
    pub updated: usize,
    /// Codes whose previous quote was kept because the refresh failed.
    pub stale: Vec<String>,
}

#[derive(Debug, PartialEq)]
pub enum SearchOutcome {
    TooShort,
    Found(FundQuote),
    NotFound,
}

#[derive(Debug, Default)]
pub struct Session {
    holdings: Vec<Holding>,
    watchlist: Vec<String>,
    view: View,
    selected: Option<FundQuote>,
    refreshed_at: Option<DateTime<Local>>,
}

impl Session {
    pub fn new(watchlist: Vec<String>) -> Self {
        Self {
            watchlist,
            ..Self::default()
        }
    }

    /// Fetches every configured holding. Codes that cannot be fetched are
    /// skipped; a missing cost gets a synthetic placeholder.
    pub async fn load_holdings(
        &mut self,
        provider: &(dyn QuoteProvider + Send + Sync),
        configured: &[HoldingConfig],
        synthetic: &SyntheticData,
        update_callback: &(dyn Fn() + Sync),
    ) {
        let codes: Vec<String> = configured.iter().map(|h| h.code.clone()).collect();
        let outcomes = fetch_many(provider, &codes, update_callback).await;

        self.holdings = configured
            .iter()
            .zip(outcomes)
            .filter_map(|(config, (code, outcome))| match outcome {
                QuoteOutcome::Available(quote) => {
                    let cost = config.cost.map_or_else(
                        || synthetic.placeholder_cost(quote.current_valuation),
                        CostBasis::Recorded,
                    );
                    Some(Holding {
                        quote,
                        held_share: config.shares,
                        cost,
                    })
                }
                QuoteOutcome::Unavailable => {
                    warn!("Skipping holding {}: quote unavailable", code);
                    None
                }
            })
            .collect();
        self.refreshed_at = Some(Local::now());
        info!("Loaded {} of {} holdings", self.holdings.len(), configured.len());
    }

    /// Refetches all holdings upstream, bypassing any quote cache, keeping
    /// shares and cost. A failed refresh keeps the previous quote for that
    /// holding.
    pub async fn refresh(
        &mut self,
        provider: &(dyn QuoteProvider + Send + Sync),
        update_callback: &(dyn Fn() + Sync),
    ) -> RefreshReport {
        provider.invalidate().await;
        let codes: Vec<String> = self.holdings.iter().map(|h| h.quote.code.clone()).collect();
        let outcomes = fetch_many(provider, &codes, update_callback).await;

        let mut report = RefreshReport::default();
        for (holding, (code, outcome)) in self.holdings.iter_mut().zip(outcomes) {
            match outcome {
                QuoteOutcome::Available(quote) => {
                    holding.quote = quote;
                    report.updated += 1;
                }
                QuoteOutcome::Unavailable => {
                    debug!("Keeping previous quote for {}", code);
                    report.stale.push(code);
                }
            }
        }
        self.refreshed_at = Some(Local::now());
        report
    }

    /// Looks up `query` as a fund code and opens its detail view when found.
    pub async fn search(
        &mut self,
        provider: &(dyn QuoteProvider + Send + Sync),
        query: &str,
    ) -> SearchOutcome {
        let query = query.trim();
        if query.chars().count() < MIN_SEARCH_LEN {
            return SearchOutcome::TooShort;
        }
        match provider.fetch_quote(query).await {
            QuoteOutcome::Available(quote) => {
                self.select(quote.clone());
                SearchOutcome::Found(quote)
            }
            QuoteOutcome::Unavailable => SearchOutcome::NotFound,
        }
    }

    /// Records a simulated purchase of `lot` shares at the quote's valuation.
    pub fn buy(&mut self, quote: &FundQuote, lot: f64) {
        if let Some(existing) = self
            .holdings
            .iter_mut()
            .find(|h| h.quote.code == quote.code)
        {
            existing.held_share += lot;
        } else {
            self.holdings.push(Holding {
                quote: quote.clone(),
                held_share: lot,
                cost: CostBasis::Recorded(quote.current_valuation),
            });
        }
        info!("Recorded purchase of {} shares of {}", lot, quote.code);
    }

    /// Returns `false` when the code is already watched.
    pub fn add_to_watchlist(&mut self, code: &str) -> bool {
        if self.watchlist.iter().any(|c| c == code) {
            return false;
        }
        self.watchlist.push(code.to_string());
        true
    }

    pub fn navigate(&mut self, view: View) {
        self.selected = None;
        self.view = view;
    }

    pub fn select(&mut self, quote: FundQuote) {
        self.selected = Some(quote);
    }

    pub fn back(&mut self) {
        self.selected = None;
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn selected(&self) -> Option<&FundQuote> {
        self.selected.as_ref()
    }

    pub fn holdings(&self) -> &[Holding] {
        &self.holdings
    }

    /// Holdings with a positive share count.
    pub fn held(&self) -> impl Iterator<Item = &Holding> {
        self.holdings.iter().filter(|h| h.held_share > 0.0)
    }

    pub fn watchlist(&self) -> &[String] {
        &self.watchlist
    }

    pub fn refreshed_at(&self) -> Option<DateTime<Local>> {
        self.refreshed_at
    }
}
