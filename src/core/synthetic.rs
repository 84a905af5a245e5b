//! Placeholder figures for data the quote source does not publish.
//!
//! Nothing produced here comes from the market. Values are wrapped in
//! [`SyntheticSeries`] or [`CostBasis::Synthetic`] so they can never be
//! mistaken for fetched data.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Relative band of the random walk around the current valuation.
const TREND_BAND: f64 = 0.01;
/// Markup applied to a valuation to fake a cost basis for configured holdings.
const PLACEHOLDER_COST_MARKUP: f64 = 1.02;
/// Fraction of the total asset shown as the day's estimated gain.
const DAILY_ESTIMATE_RATE: f64 = 0.005;

#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticSeries(pub Vec<f64>);

impl SyntheticSeries {
    pub fn points(&self) -> &[f64] {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CostBasis {
    /// Cost entered by the user or recorded by a buy.
    Recorded(f64),
    /// Made-up cost for holdings configured without one.
    Synthetic(f64),
}

impl CostBasis {
    pub fn value(&self) -> f64 {
        match self {
            CostBasis::Recorded(v) | CostBasis::Synthetic(v) => *v,
        }
    }

    pub fn is_synthetic(&self) -> bool {
        matches!(self, CostBasis::Synthetic(_))
    }
}

pub struct SyntheticData {
    rng: StdRng,
}

impl SyntheticData {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Reproducible generator, mostly for tests.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn trend(&mut self, valuation: f64, points: usize) -> SyntheticSeries {
        SyntheticSeries(
            (0..points)
                .map(|_| valuation * (1.0 + self.rng.random_range(-TREND_BAND..TREND_BAND)))
                .collect(),
        )
    }

    pub fn placeholder_cost(&self, valuation: f64) -> CostBasis {
        CostBasis::Synthetic(valuation * PLACEHOLDER_COST_MARKUP)
    }

    pub fn estimated_daily(&self, total_asset: f64) -> f64 {
        total_asset * DAILY_ESTIMATE_RATE
    }
}

impl Default for SyntheticData {
    fn default() -> Self {
        Self::new()
    }
}
