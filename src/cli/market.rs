use super::ui;
use crate::core::SyntheticData;
use crate::core::config::MarketConfig;
use crate::core::market::{IndexSnapshot, fetch_many, market_board};
use crate::core::quote::{QuoteOutcome, QuoteProvider};
use anyhow::Result;
use comfy_table::Cell;

fn board_table(board: &[IndexSnapshot]) -> comfy_table::Table {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Index"),
        ui::header_cell("Value"),
        ui::header_cell("Change"),
    ]);
    for index in board {
        table.add_row(vec![
            Cell::new(&index.name),
            ui::number_cell(format!("{:.4}", index.value)),
            ui::change_cell(index.change_percent),
        ]);
    }
    table
}

/// Renders the index board and the hot funds. Unavailable hot funds are
/// left out silently.
pub fn render(
    board: &[IndexSnapshot],
    hot: &[(String, QuoteOutcome)],
    synthetic: &mut SyntheticData,
) -> String {
    let mut output = format!("{}\n", ui::style_text("Market", ui::StyleType::Title));
    if board.is_empty() {
        output.push_str(&ui::style_text(
            "Index data is currently unavailable.",
            ui::StyleType::Warning,
        ));
    } else {
        output.push_str(&board_table(board).to_string());
    }
    output.push_str(&ui::style_text(
        "\nIndices are tracked through proxy funds.",
        ui::StyleType::Subtle,
    ));

    output.push_str(&format!(
        "\n\n{}\n",
        ui::style_text("Hot Funds (live)", ui::StyleType::Title)
    ));
    let available: Vec<_> = hot.iter().filter_map(|(_, o)| o.as_quote()).collect();
    if available.is_empty() {
        output.push_str("No hot fund data available right now.");
    } else {
        output.push_str(&ui::fund_table(available, synthetic).to_string());
        output.push('\n');
        output.push_str(&ui::trend_footnote());
    }
    output
}

pub async fn fetch(
    provider: &(dyn QuoteProvider + Send + Sync),
    market: &MarketConfig,
) -> (Vec<IndexSnapshot>, Vec<(String, QuoteOutcome)>) {
    let pb = ui::new_progress_bar(
        (market.indices.len() + market.hot.len()) as u64,
        "Fetching market...",
    );
    let on_hot_fetched = || pb.inc(1);
    let (board, hot) = futures::join!(
        async {
            let board = market_board(provider, &market.indices).await;
            pb.inc(market.indices.len() as u64);
            board
        },
        fetch_many(provider, &market.hot, &on_hot_fetched)
    );
    pb.finish_and_clear();
    (board, hot)
}

pub async fn run(
    market: &MarketConfig,
    provider: &(dyn QuoteProvider + Send + Sync),
    synthetic: &mut SyntheticData,
) -> Result<()> {
    let (board, hot) = fetch(provider, market).await;
    println!("{}", render(&board, &hot, synthetic));
    Ok(())
}
