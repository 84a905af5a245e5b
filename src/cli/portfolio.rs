use super::ui;
use crate::core::analytics::{PortfolioSummary, summarize};
use crate::core::config::AppConfig;
use crate::core::session::{Holding, Session};
use crate::core::{QuoteProvider, SyntheticData};
use anyhow::Result;
use comfy_table::{Cell, Color};

fn asset_card(summary: &PortfolioSummary) -> String {
    let mut card = format!(
        "{}\n  {}\n\n",
        ui::style_text("Total Asset (CNY)", ui::StyleType::TotalLabel),
        ui::style_text(
            &format!("{:.2}", summary.total_asset),
            ui::StyleType::TotalValue
        ),
    );
    card.push_str(&format!(
        "  Holding profit: {}{}   Today: {} {}\n",
        ui::style_signed(
            summary.total_profit,
            &format!("{:+.2}", summary.total_profit)
        ),
        if summary.uses_synthetic_cost {
            ui::style_text(" (placeholder cost)", ui::StyleType::Subtle)
        } else {
            String::new()
        },
        ui::style_signed(
            summary.estimated_daily,
            &format!("{:+.2}", summary.estimated_daily)
        ),
        ui::style_text("(simulated)", ui::StyleType::Subtle),
    ));
    card
}

fn holdings_table<'a>(
    holdings: impl Iterator<Item = &'a Holding>,
    synthetic: &mut SyntheticData,
) -> comfy_table::Table {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Fund"),
        ui::header_cell("Code"),
        ui::header_cell("Trend*"),
        ui::header_cell("Valuation"),
        ui::header_cell("Change"),
        ui::header_cell("Shares"),
        ui::header_cell("Profit"),
    ]);

    for holding in holdings {
        let quote = &holding.quote;
        table.add_row(vec![
            Cell::new(&quote.name),
            Cell::new(&quote.code).fg(Color::DarkGrey),
            ui::trend_cell(quote, synthetic),
            ui::number_cell(format!("{:.4}", quote.current_valuation)),
            ui::change_cell(quote.change_percent),
            ui::number_cell(format!("{:.2}", holding.held_share)),
            ui::signed_cell(holding.profit()),
        ]);
    }
    table
}

/// Renders the asset card followed by every fund with a positive share count.
pub fn render(session: &Session, synthetic: &mut SyntheticData) -> String {
    let summary = summarize(session.held(), synthetic);
    let mut output = asset_card(&summary);

    output.push_str(&format!(
        "\n{}\n",
        ui::style_text("My Holdings", ui::StyleType::Title)
    ));

    if session.held().next().is_none() {
        output.push_str("No holdings yet. Search for a fund code to add one.");
        return output;
    }

    output.push_str(&holdings_table(session.held(), synthetic).to_string());
    output.push('\n');
    output.push_str(&ui::trend_footnote());
    if let Some(at) = session.refreshed_at() {
        output.push_str(&format!(
            "\n{}",
            ui::style_text(
                &format!("Updated {}", at.format("%Y-%m-%d %H:%M:%S")),
                ui::StyleType::Subtle
            )
        ));
    }
    output
}

/// Loads the configured holdings into `session`, showing fetch progress.
pub async fn load(
    session: &mut Session,
    config: &AppConfig,
    provider: &(dyn QuoteProvider + Send + Sync),
    synthetic: &SyntheticData,
) {
    let pb = ui::new_progress_bar(config.holdings.len() as u64, "Connecting to exchange...");
    session
        .load_holdings(provider, &config.holdings, synthetic, &|| pb.inc(1))
        .await;
    pb.finish_and_clear();
}

pub async fn run(
    config: &AppConfig,
    provider: &(dyn QuoteProvider + Send + Sync),
    synthetic: &mut SyntheticData,
) -> Result<()> {
    let mut session = Session::new(config.watchlist.clone());
    load(&mut session, config, provider, synthetic).await;
    println!("{}", render(&session, synthetic));
    Ok(())
}
