#![forbid(unsafe_code)]

mod cli;
mod commands;
mod config;

use anyhow::Context;
use clap::Parser;
use services::{AppServices, Clock};
use tracing_subscriber::EnvFilter;

use cli::Cli;
use config::AppConfig;

fn init_tracing(verbose: bool) {
    // RUST_LOG wins; otherwise info (or debug with -v) for our crates, warn for deps.
    let level = if verbose { "debug" } else { "info" };
    let default_filter = format!("warn,learnpod={level},services={level},storage={level}");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = AppConfig::from_cli(&cli);
    tracing::debug!(db = %config.db_url, catalog = %config.catalog, "resolved configuration");

    let app = AppServices::new(config.backend(), Clock::default(), config.catalog_source());
    app.open().await.context("failed to open local storage")?;
    let engine = app.engine();
    tracing::debug!(backend = ?engine.backend(), "storage opened");

    commands::run(&app, cli.command).await
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
