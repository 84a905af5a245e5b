//! Fund quote abstractions and core types

use async_trait::async_trait;

/// A real-time valuation snapshot for a single fund.
#[derive(Debug, Clone, PartialEq)]
pub struct FundQuote {
    pub code: String,
    pub name: String,
    /// Intraday estimated net asset value.
    pub current_valuation: f64,
    /// Percentage change of the estimate versus the last confirmed value.
    pub change_percent: f64,
    /// Last officially confirmed net asset value.
    pub previous_nav: Option<f64>,
    /// Timestamp of the estimate, as published by the source.
    pub as_of: String,
}

impl FundQuote {
    pub fn is_up(&self) -> bool {
        self.change_percent >= 0.0
    }
}

/// Result of a quote lookup. Every failure collapses into `Unavailable`.
#[must_use]
#[derive(Debug, Clone, PartialEq)]
pub enum QuoteOutcome {
    Available(FundQuote),
    Unavailable,
}

impl QuoteOutcome {
    pub fn is_available(&self) -> bool {
        matches!(self, QuoteOutcome::Available(_))
    }

    pub fn as_quote(&self) -> Option<&FundQuote> {
        match self {
            QuoteOutcome::Available(quote) => Some(quote),
            QuoteOutcome::Unavailable => None,
        }
    }

    pub fn into_quote(self) -> Option<FundQuote> {
        match self {
            QuoteOutcome::Available(quote) => Some(quote),
            QuoteOutcome::Unavailable => None,
        }
    }
}

#[async_trait]
pub trait QuoteProvider: Send + Sync {
    async fn fetch_quote(&self, code: &str) -> QuoteOutcome;

    /// Drops any locally held quotes so the next lookups go upstream.
    async fn invalidate(&self) {}
}
