use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use fundwatch::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Display total asset and held funds
    Portfolio,
    /// Display real-time valuations of watched funds
    Watchlist,
    /// Display index board and hot funds
    Market,
    /// Display the detail view of a single fund
    Quote {
        /// Fund code, e.g. 161725
        code: String,
    },
    /// Start an interactive session
    Shell,
}

impl From<Commands> for fundwatch::AppCommand {
    fn from(cmd: Commands) -> fundwatch::AppCommand {
        match cmd {
            Commands::Portfolio => fundwatch::AppCommand::Portfolio,
            Commands::Watchlist => fundwatch::AppCommand::Watchlist,
            Commands::Market => fundwatch::AppCommand::Market,
            Commands::Quote { code } => fundwatch::AppCommand::Quote(code),
            Commands::Shell => fundwatch::AppCommand::Shell,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => match cli.config_path.as_deref() {
            Some(path) => fundwatch::cli::setup::setup_at_path(path),
            None => fundwatch::cli::setup::setup(),
        },
        Some(cmd) => fundwatch::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
