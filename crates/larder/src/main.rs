//! larder - shopping list CLI
//!
//! Add grocery items and get a healthier alternative and a picture for each,
//! fetched in the background.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod app;
mod cli;
mod commands;
mod config;
mod render;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing; stdout belongs to command output
    let level = if cli.verbose { "debug" } else { "info" };
    let core_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::from_default_env()
                .add_directive(format!("larder={}", level).parse()?)
                .add_directive(format!("larder_core={}", core_level).parse()?),
        )
        .init();

    // Load configuration
    let config = config::load()?;

    // Execute command
    match cli.command {
        Commands::Enrich(cmd) => commands::enrich::execute(cmd, &config).await,
        Commands::Shell => commands::shell::execute(&config).await,
        Commands::Key(cmd) => commands::key::execute(cmd.action, &config).await,
        Commands::Config { init } => commands::config::execute(init, &config).await,
        Commands::Version => {
            println!("larder {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
