pub mod cli;
pub mod core;
pub mod providers;
pub mod store;

use crate::core::SyntheticData;
use crate::core::config::AppConfig;
use crate::providers::{CachingQuoteProvider, FundgzProvider};
use anyhow::Result;
use tracing::{debug, info};

pub enum AppCommand {
    Portfolio,
    Watchlist,
    Market,
    Quote(String),
    Shell,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("fundwatch starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let provider = CachingQuoteProvider::new(
        FundgzProvider::new(&config.providers.fundgz)?,
        config.cache_ttl(),
    );
    let mut synthetic = SyntheticData::new();

    match command {
        AppCommand::Portfolio => cli::portfolio::run(&config, &provider, &mut synthetic).await,
        AppCommand::Watchlist => {
            cli::watchlist::run(&config.watchlist, &provider, &mut synthetic).await
        }
        AppCommand::Market => cli::market::run(&config.market, &provider, &mut synthetic).await,
        AppCommand::Quote(code) => cli::detail::run(&code, &provider).await,
        AppCommand::Shell => cli::shell::run(&config, &provider, synthetic).await,
    }
}
