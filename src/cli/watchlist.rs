use super::ui;
use crate::core::SyntheticData;
use crate::core::market::fetch_many;
use crate::core::quote::{QuoteOutcome, QuoteProvider};
use anyhow::Result;

/// Renders the watched funds; a code that could not be fetched gets a
/// warning line instead of a row.
pub fn render(outcomes: &[(String, QuoteOutcome)], synthetic: &mut SyntheticData) -> String {
    let mut output = format!("{}\n", ui::style_text("Watchlist", ui::StyleType::Title));

    if outcomes.is_empty() {
        output.push_str("Your watchlist is empty.");
        return output;
    }

    let available: Vec<_> = outcomes.iter().filter_map(|(_, o)| o.as_quote()).collect();
    if !available.is_empty() {
        output.push_str(&ui::fund_table(available, synthetic).to_string());
        output.push('\n');
        output.push_str(&ui::trend_footnote());
    }

    for (code, outcome) in outcomes {
        if !outcome.is_available() {
            output.push('\n');
            output.push_str(&ui::style_text(
                &format!("Unable to fetch data for {code}"),
                ui::StyleType::Warning,
            ));
        }
    }
    output
}

pub async fn fetch(
    provider: &(dyn QuoteProvider + Send + Sync),
    codes: &[String],
) -> Vec<(String, QuoteOutcome)> {
    let pb = ui::new_progress_bar(codes.len() as u64, "Fetching watchlist...");
    let outcomes = fetch_many(provider, codes, &|| pb.inc(1)).await;
    pb.finish_and_clear();
    outcomes
}

pub async fn run(
    codes: &[String],
    provider: &(dyn QuoteProvider + Send + Sync),
    synthetic: &mut SyntheticData,
) -> Result<()> {
    let outcomes = fetch(provider, codes).await;
    println!("{}", render(&outcomes, synthetic));
    Ok(())
}
