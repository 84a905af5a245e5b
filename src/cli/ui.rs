use crate::core::quote::FundQuote;
use crate::core::synthetic::{SyntheticData, SyntheticSeries};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
/// Points in the mini trend drawn next to each fund.
pub const TREND_POINTS: usize = 10;

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    TotalLabel,
    TotalValue,
    Warning,
    Error,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::TotalLabel => style(text).bold(),
        StyleType::TotalValue => style(text).cyan().bold(),
        StyleType::Warning => style(text).yellow(),
        StyleType::Error => style(text).red(),
        StyleType::Subtle => style(text).dim(),
    };
    styled.to_string()
}

/// Styles a signed amount; gains are red and losses green, as on mainland
/// Chinese quote boards.
pub fn style_signed(value: f64, text: &str) -> String {
    if value >= 0.0 {
        style(text).red().bold().to_string()
    } else {
        style(text).green().bold().to_string()
    }
}

/// Creates a new `comfy_table::Table` with standard styling.
pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Creates a styled header cell for a table.
pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

pub fn number_cell(text: String) -> Cell {
    Cell::new(text).set_alignment(CellAlignment::Right)
}

/// Creates a cell for displaying percentage change with color coding.
pub fn change_cell(change: f64) -> Cell {
    let color = if change >= 0.0 { Color::Red } else { Color::Green };
    Cell::new(format!("{change:+.2}%"))
        .fg(color)
        .set_alignment(CellAlignment::Right)
}

/// Creates a cell for a signed amount with the same color coding as `change_cell`.
pub fn signed_cell(value: f64) -> Cell {
    let color = if value >= 0.0 { Color::Red } else { Color::Green };
    Cell::new(format!("{value:+.2}"))
        .fg(color)
        .set_alignment(CellAlignment::Right)
}

/// Renders a series as a one-line bar chart scaled to its own range.
pub fn sparkline(series: &SyntheticSeries) -> String {
    let points = series.points();
    let (min, max) = points
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(*p), hi.max(*p))
        });
    let range = max - min;
    let top = (SPARK_LEVELS.len() - 1) as f64;

    points
        .iter()
        .map(|p| {
            let level = if range > 0.0 {
                (((p - min) / range) * top).round() as usize
            } else {
                SPARK_LEVELS.len() / 2
            };
            SPARK_LEVELS[level.min(SPARK_LEVELS.len() - 1)]
        })
        .collect()
}

/// Mini trend for `quote`, colored by the direction of its change.
pub fn trend_cell(quote: &FundQuote, synthetic: &mut SyntheticData) -> Cell {
    let color = if quote.is_up() { Color::Red } else { Color::Green };
    Cell::new(sparkline(&synthetic.trend(quote.current_valuation, TREND_POINTS))).fg(color)
}

/// Table of funds with a synthetic mini trend per row.
pub fn fund_table<'a>(
    quotes: impl IntoIterator<Item = &'a FundQuote>,
    synthetic: &mut SyntheticData,
) -> Table {
    let mut table = new_styled_table();
    table.set_header(vec![
        header_cell("Fund"),
        header_cell("Code"),
        header_cell("Trend*"),
        header_cell("Valuation"),
        header_cell("Change"),
    ]);

    for quote in quotes {
        table.add_row(vec![
            Cell::new(&quote.name),
            Cell::new(&quote.code).fg(Color::DarkGrey),
            trend_cell(quote, synthetic),
            number_cell(format!("{:.4}", quote.current_valuation)),
            change_cell(quote.change_percent),
        ]);
    }
    table
}

/// Footnote explaining the trend column.
pub fn trend_footnote() -> String {
    style_text("* trend is simulated, not market data", StyleType::Subtle)
}

/// Creates a new `indicatif::ProgressBar` with standard styling.
pub fn new_progress_bar(len: u64, message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    if let Ok(progress_style) = ProgressStyle::default_bar()
        .template("{spinner:.green} {msg} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len}")
    {
        pb.set_style(progress_style.progress_chars("#>-"));
    }
    pb.set_message(message);
    pb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sparkline_scales_to_range() {
        let series = SyntheticSeries(vec![1.0, 1.5, 2.0]);
        assert_eq!(sparkline(&series), "▁▅█");
    }

    #[test]
    fn test_sparkline_flat_series() {
        let series = SyntheticSeries(vec![1.0, 1.0]);
        assert_eq!(sparkline(&series), "▅▅");
        assert_eq!(sparkline(&SyntheticSeries(vec![])), "");
    }

    #[test]
    fn test_change_cell_sign() {
        assert_eq!(change_cell(0.456).content(), "+0.46%");
        assert_eq!(change_cell(-1.2).content(), "-1.20%");
        assert_eq!(signed_cell(-3.0).content(), "-3.00");
    }
}
