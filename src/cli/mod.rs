pub mod detail;
pub mod market;
pub mod portfolio;
pub mod setup;
pub mod shell;
pub mod ui;
pub mod watchlist;
