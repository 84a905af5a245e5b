use super::ui;
use crate::core::FundQuote;
use crate::core::quote::QuoteProvider;
use crate::core::session::{MIN_SEARCH_LEN, SearchOutcome, Session};
use anyhow::Result;

pub fn render(quote: &FundQuote) -> String {
    let mut output = format!(
        "{}\n{}\n\n",
        ui::style_text(&quote.name, ui::StyleType::Title),
        ui::style_text(
            &format!("Code: {} | Updated: {}", quote.code, quote.as_of),
            ui::StyleType::Subtle
        ),
    );
    output.push_str(&format!(
        "  Estimated NAV:  {:.4}  {}\n",
        quote.current_valuation,
        ui::style_signed(
            quote.change_percent,
            &format!("{:+.2}%", quote.change_percent)
        ),
    ));
    output.push_str(&format!(
        "  Previous NAV:   {}",
        quote
            .previous_nav
            .map_or_else(|| "N/A".to_string(), |nav| format!("{nav:.4}")),
    ));
    output
}

/// Message for a search that did not open a detail view.
pub fn search_message(outcome: &SearchOutcome) -> Option<String> {
    match outcome {
        SearchOutcome::Found(_) => None,
        SearchOutcome::TooShort => Some(ui::style_text(
            &format!("Enter a fund code of at least {MIN_SEARCH_LEN} characters, e.g. 161725"),
            ui::StyleType::Warning,
        )),
        SearchOutcome::NotFound => Some(ui::style_text(
            "Fund not found, please check the code",
            ui::StyleType::Error,
        )),
    }
}

pub async fn run(code: &str, provider: &(dyn QuoteProvider + Send + Sync)) -> Result<()> {
    let mut session = Session::new(Vec::new());
    let outcome = session.search(provider, code).await;
    match (session.selected(), search_message(&outcome)) {
        (Some(quote), _) => println!("{}", render(quote)),
        (None, Some(message)) => println!("{message}"),
        (None, None) => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::market::tests::quote;

    #[test]
    fn test_render_detail() {
        let fund = quote("161725", 1.2345, -0.45);
        let output = render(&fund);

        assert!(output.contains("Fund 161725"));
        assert!(output.contains("Code: 161725 | Updated: 2024-01-01 15:00"));
        assert!(output.contains("1.2345"));
        assert!(output.contains("-0.45%"));
    }

    #[test]
    fn test_render_without_previous_nav() {
        let mut fund = quote("161725", 1.0, 0.0);
        fund.previous_nav = None;
        assert!(render(&fund).contains("Previous NAV:   N/A"));
    }

    #[test]
    fn test_search_messages() {
        assert!(search_message(&SearchOutcome::Found(quote("161725", 1.0, 0.0))).is_none());
        assert!(
            search_message(&SearchOutcome::NotFound)
                .unwrap()
                .contains("Fund not found")
        );
        assert!(
            search_message(&SearchOutcome::TooShort)
                .unwrap()
                .contains("at least 6 characters")
        );
    }
}
