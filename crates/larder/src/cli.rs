//! CLI argument definitions using clap derive macros.

use clap::{Args, Parser, Subcommand};

use larder_core::Service;

/// Larder - a shopping list that suggests healthier alternatives
#[derive(Parser, Debug)]
#[command(name = "larder")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add items, enrich them, and print the result
    Enrich(EnrichCommand),

    /// Interactive list session
    Shell,

    /// API key management
    Key(KeyCommand),

    /// Show resolved configuration and paths
    Config {
        /// Write a config file with default values if none exists
        #[arg(long)]
        init: bool,
    },

    /// Show version
    Version,
}

// ─────────────────────────────────────────────────────────────────────────────
// Enrich
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Args, Debug)]
pub struct EnrichCommand {
    /// Item names
    #[arg(required = true)]
    pub names: Vec<String>,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,

    /// Accept every suggestion and fetch images for the new names
    #[arg(short, long)]
    pub accept: bool,
}

// ─────────────────────────────────────────────────────────────────────────────
// Keys
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Args, Debug)]
pub struct KeyCommand {
    #[command(subcommand)]
    pub action: KeyAction,
}

#[derive(Subcommand, Debug)]
pub enum KeyAction {
    /// Store an API key (prompts when VALUE is omitted)
    Set {
        /// Service: suggestion (openai) or image (pexels)
        #[arg(value_parser = parse_service)]
        service: Service,

        /// Key value
        value: Option<String>,
    },

    /// Show which keys are configured
    Status,
}

fn parse_service(s: &str) -> Result<Service, String> {
    s.parse().map_err(|e: larder_core::Error| e.to_string())
}
