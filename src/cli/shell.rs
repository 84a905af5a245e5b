//! Interactive session: one [`Session`] lives for the whole loop and the user
//! moves between views with short commands.
use super::{detail, market, portfolio, ui, watchlist};
use crate::core::SyntheticData;
use crate::core::config::AppConfig;
use crate::core::quote::QuoteProvider;
use crate::core::session::{SearchOutcome, Session, View};
use anyhow::{Context, Result, anyhow, bail};
use std::io::Write;
use std::str::FromStr;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

const HELP: &str = "\
Commands:
  portfolio, p        show holdings and total asset
  watchlist, w        show watched funds
  market, m           show index board and hot funds
  refresh, r          refetch valuations of all holdings
  search <code>, s    open the detail view of a fund
  buy [shares]        simulate buying the open fund (no order is placed)
  watch               add the open fund to the watchlist
  back, b             close the detail view
  help, h, ?          show this help
  quit, q, exit       leave";

#[derive(Debug, PartialEq)]
pub enum ShellCommand {
    Show(View),
    Refresh,
    Search(String),
    Buy(Option<f64>),
    Watch,
    Back,
    Help,
    Quit,
}

impl FromStr for ShellCommand {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let command = parts.next().unwrap_or_default().to_lowercase();
        let argument = parts.next();

        let parsed = match (command.as_str(), argument) {
            ("portfolio" | "p", None) => ShellCommand::Show(View::Portfolio),
            ("watchlist" | "w", None) => ShellCommand::Show(View::Watchlist),
            ("market" | "m", None) => ShellCommand::Show(View::Market),
            ("refresh" | "r", None) => ShellCommand::Refresh,
            ("search" | "s", Some(code)) => ShellCommand::Search(code.to_string()),
            ("search" | "s", None) => bail!("Usage: search <code>"),
            ("buy", None) => ShellCommand::Buy(None),
            ("buy", Some(shares)) => {
                let shares: f64 = shares
                    .parse()
                    .ok()
                    .filter(|n: &f64| n.is_finite() && *n > 0.0)
                    .ok_or_else(|| anyhow!("Share count must be a positive number: '{shares}'"))?;
                ShellCommand::Buy(Some(shares))
            }
            ("watch", None) => ShellCommand::Watch,
            ("back" | "b", None) => ShellCommand::Back,
            ("help" | "h" | "?", None) => ShellCommand::Help,
            ("quit" | "q" | "exit", None) => ShellCommand::Quit,
            _ => bail!("Unknown command '{}'. Type 'help' for a list.", s.trim()),
        };

        if parts.next().is_some() {
            bail!("Too many arguments: '{}'", s.trim());
        }
        Ok(parsed)
    }
}

#[derive(Debug, PartialEq)]
pub enum Flow {
    Continue(String),
    Quit,
}

pub struct Shell<'a> {
    config: &'a AppConfig,
    provider: &'a (dyn QuoteProvider + Send + Sync),
    session: Session,
    synthetic: SyntheticData,
}

impl<'a> Shell<'a> {
    /// Starts a session with the configured holdings loaded.
    pub async fn start(
        config: &'a AppConfig,
        provider: &'a (dyn QuoteProvider + Send + Sync),
        synthetic: SyntheticData,
    ) -> Self {
        let mut session = Session::new(config.watchlist.clone());
        portfolio::load(&mut session, config, provider, &synthetic).await;
        Shell {
            config,
            provider,
            session,
            synthetic,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Renders whatever the session currently shows; an open fund takes
    /// precedence over the selected view.
    pub async fn screen(&mut self) -> String {
        if let Some(quote) = self.session.selected() {
            return detail::render(quote);
        }
        match self.session.view() {
            View::Portfolio => portfolio::render(&self.session, &mut self.synthetic),
            View::Watchlist => {
                let outcomes = watchlist::fetch(self.provider, self.session.watchlist()).await;
                watchlist::render(&outcomes, &mut self.synthetic)
            }
            View::Market => {
                let (board, hot) = market::fetch(self.provider, &self.config.market).await;
                market::render(&board, &hot, &mut self.synthetic)
            }
        }
    }

    pub async fn execute(&mut self, command: ShellCommand) -> Flow {
        debug!(?command, "Executing shell command");
        let output = match command {
            ShellCommand::Show(view) => {
                self.session.navigate(view);
                self.screen().await
            }
            ShellCommand::Refresh => {
                let report = self.session.refresh(self.provider, &|| ()).await;
                let mut output = ui::style_text(
                    &format!("Updated {} holdings", report.updated),
                    ui::StyleType::Subtle,
                );
                if !report.stale.is_empty() {
                    output.push('\n');
                    output.push_str(&ui::style_text(
                        &format!("Kept previous values for: {}", report.stale.join(", ")),
                        ui::StyleType::Warning,
                    ));
                }
                self.session.navigate(View::Portfolio);
                format!("{output}\n{}", self.screen().await)
            }
            ShellCommand::Search(query) => {
                let outcome = self.session.search(self.provider, &query).await;
                match (&outcome, detail::search_message(&outcome)) {
                    (SearchOutcome::Found(quote), _) => detail::render(quote),
                    (_, Some(message)) => message,
                    (_, None) => String::new(),
                }
            }
            ShellCommand::Buy(shares) => match self.session.selected().cloned() {
                Some(quote) => {
                    let lot = shares.unwrap_or(self.config.buy_lot);
                    self.session.buy(&quote, lot);
                    format!(
                        "Bought {lot:.2} shares of {} {}",
                        quote.name,
                        ui::style_text("(simulated, no order placed)", ui::StyleType::Subtle)
                    )
                }
                None => no_open_fund(),
            },
            ShellCommand::Watch => match self.session.selected().map(|q| q.code.clone()) {
                Some(code) => {
                    if self.session.add_to_watchlist(&code) {
                        format!("Added {code} to watchlist")
                    } else {
                        format!("{code} is already in the watchlist")
                    }
                }
                None => no_open_fund(),
            },
            ShellCommand::Back => {
                self.session.back();
                self.screen().await
            }
            ShellCommand::Help => HELP.to_string(),
            ShellCommand::Quit => return Flow::Quit,
        };
        Flow::Continue(output)
    }
}

fn no_open_fund() -> String {
    ui::style_text(
        "No fund is open. Use 'search <code>' first.",
        ui::StyleType::Warning,
    )
}

pub async fn run(
    config: &AppConfig,
    provider: &(dyn QuoteProvider + Send + Sync),
    synthetic: SyntheticData,
) -> Result<()> {
    let mut shell = Shell::start(config, provider, synthetic).await;
    println!("{}\n\nType 'help' for commands.", shell.screen().await);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("fundwatch> ");
        std::io::stdout().flush().context("Failed to flush stdout")?;

        let Some(line) = lines.next_line().await.context("Failed to read from stdin")? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        match line.parse::<ShellCommand>() {
            Ok(command) => match shell.execute(command).await {
                Flow::Continue(output) => println!("{output}"),
                Flow::Quit => break,
            },
            Err(e) => println!("{}", ui::style_text(&e.to_string(), ui::StyleType::Error)),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::HoldingConfig;
    use crate::core::market::tests::StaticProvider;
    use crate::providers::CachingQuoteProvider;
    use std::sync::atomic::Ordering;
    use std::time::Duration;

    fn config() -> AppConfig {
        AppConfig {
            holdings: vec![HoldingConfig {
                code: "161725".to_string(),
                shares: 1000.0,
                cost: Some(1.0),
            }],
            watchlist: vec!["003096".to_string()],
            ..AppConfig::default()
        }
    }

    fn output(flow: Flow) -> String {
        match flow {
            Flow::Continue(output) => output,
            Flow::Quit => panic!("unexpected quit"),
        }
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            "p".parse::<ShellCommand>().unwrap(),
            ShellCommand::Show(View::Portfolio)
        );
        assert_eq!(
            " Market ".parse::<ShellCommand>().unwrap(),
            ShellCommand::Show(View::Market)
        );
        assert_eq!(
            "s 161725".parse::<ShellCommand>().unwrap(),
            ShellCommand::Search("161725".to_string())
        );
        assert_eq!("buy".parse::<ShellCommand>().unwrap(), ShellCommand::Buy(None));
        assert_eq!(
            "buy 250".parse::<ShellCommand>().unwrap(),
            ShellCommand::Buy(Some(250.0))
        );
        assert_eq!("exit".parse::<ShellCommand>().unwrap(), ShellCommand::Quit);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!("search".parse::<ShellCommand>().is_err());
        assert!("buy -5".parse::<ShellCommand>().is_err());
        assert!("buy lots".parse::<ShellCommand>().is_err());
        assert!("portfolio now".parse::<ShellCommand>().is_err());
        let err = "sell 10".parse::<ShellCommand>().unwrap_err();
        assert!(err.to_string().contains("Unknown command 'sell 10'"));
    }

    #[tokio::test]
    async fn test_search_buy_watch_flow() {
        let provider = StaticProvider::new(&[
            ("161725", 1.2, 0.5),
            ("003096", 2.0, -1.0),
            ("005827", 3.0, 0.1),
        ]);
        let config = config();
        let mut shell = Shell::start(&config, &provider, SyntheticData::seeded(5)).await;
        assert_eq!(shell.session().holdings().len(), 1);

        let no_fund = output(shell.execute(ShellCommand::Buy(None)).await);
        assert!(no_fund.contains("No fund is open"));

        let detail = output(
            shell
                .execute(ShellCommand::Search("005827".to_string()))
                .await,
        );
        assert!(detail.contains("Code: 005827"));

        let bought = output(shell.execute(ShellCommand::Buy(Some(200.0))).await);
        assert!(bought.contains("Bought 200.00 shares of Fund 005827"));

        let watched = output(shell.execute(ShellCommand::Watch).await);
        assert_eq!(watched, "Added 005827 to watchlist");
        let again = output(shell.execute(ShellCommand::Watch).await);
        assert_eq!(again, "005827 is already in the watchlist");

        let portfolio = output(shell.execute(ShellCommand::Back).await);
        assert!(portfolio.contains("Fund 161725"));
        assert!(portfolio.contains("Fund 005827"));
        assert_eq!(shell.session().watchlist(), ["003096", "005827"]);
    }

    #[tokio::test]
    async fn test_search_not_found_and_too_short() {
        let provider = StaticProvider::new(&[("161725", 1.2, 0.5)]);
        let config = config();
        let mut shell = Shell::start(&config, &provider, SyntheticData::seeded(5)).await;

        let missing = output(
            shell
                .execute(ShellCommand::Search("999999".to_string()))
                .await,
        );
        assert!(missing.contains("Fund not found"));

        let short = output(shell.execute(ShellCommand::Search("16".to_string())).await);
        assert!(short.contains("at least 6 characters"));
        assert!(shell.session().selected().is_none());
    }

    #[tokio::test]
    async fn test_refresh_reports_stale_holdings() {
        let provider = StaticProvider::new(&[("161725", 1.2, 0.5)]);
        let config = config();
        let mut shell = Shell::start(&config, &provider, SyntheticData::seeded(5)).await;

        provider.remove("161725");
        let refreshed = output(shell.execute(ShellCommand::Refresh).await);

        assert!(refreshed.contains("Updated 0 holdings"));
        assert!(refreshed.contains("Kept previous values for: 161725"));
        assert!(refreshed.contains("Fund 161725"));
    }

    #[tokio::test]
    async fn test_refresh_fetches_past_quote_cache() {
        let upstream = StaticProvider::new(&[("161725", 1.2, 0.5)]);
        let provider = CachingQuoteProvider::new(&upstream, Duration::from_secs(60));
        let config = config();
        let mut shell = Shell::start(&config, &provider, SyntheticData::seeded(5)).await;
        assert_eq!(upstream.calls.load(Ordering::SeqCst), 1);

        upstream.set("161725", 2.0, 3.0);
        let refreshed = output(shell.execute(ShellCommand::Refresh).await);

        assert!(refreshed.contains("Updated 1 holdings"));
        assert_eq!(upstream.calls.load(Ordering::SeqCst), 2);
        let quote = &shell.session().holdings()[0].quote;
        assert_eq!(quote.current_valuation, 2.0);
        assert_eq!(quote.change_percent, 3.0);
    }

    #[tokio::test]
    async fn test_watchlist_view_and_quit() {
        let provider = StaticProvider::new(&[("161725", 1.2, 0.5)]);
        let config = config();
        let mut shell = Shell::start(&config, &provider, SyntheticData::seeded(5)).await;

        let watchlist = output(shell.execute(ShellCommand::Show(View::Watchlist)).await);
        assert!(watchlist.contains("Unable to fetch data for 003096"));
        assert_eq!(shell.execute(ShellCommand::Quit).await, Flow::Quit);
    }
}
