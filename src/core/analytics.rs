//! Portfolio totals over the holdings of a session.
use crate::core::session::Holding;
use crate::core::synthetic::SyntheticData;

#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioSummary {
    /// Sum of valuation × shares.
    pub total_asset: f64,
    /// Sum of (valuation − cost) × shares.
    pub total_profit: f64,
    /// Placeholder for today's gain; not derived from market data.
    pub estimated_daily: f64,
    /// True when any holding's cost is a synthetic placeholder.
    pub uses_synthetic_cost: bool,
}

pub fn summarize<'a>(
    holdings: impl IntoIterator<Item = &'a Holding>,
    synthetic: &SyntheticData,
) -> PortfolioSummary {
    let mut total_asset = 0.0;
    let mut total_profit = 0.0;
    let mut uses_synthetic_cost = false;

    for holding in holdings {
        total_asset += holding.market_value();
        total_profit += holding.profit();
        uses_synthetic_cost |= holding.held_share > 0.0 && holding.cost.is_synthetic();
    }

    PortfolioSummary {
        total_asset,
        total_profit,
        estimated_daily: synthetic.estimated_daily(total_asset),
        uses_synthetic_cost,
    }
}
