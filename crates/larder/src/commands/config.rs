//! Show resolved configuration.

use anyhow::{Context, Result};
use colored::Colorize;

use larder_core::LarderConfig;

use crate::config::{config_path, save_to};

pub async fn execute(init: bool, config: &LarderConfig) -> Result<()> {
    let path = config_path();

    if init {
        if path.exists() {
            println!("{} Config already exists at {}", "✓".green(), path.display());
        } else {
            save_to(config, &path)?;
            println!("{} Wrote default config to {}", "✓".green(), path.display());
        }
        return Ok(());
    }

    let source = if path.exists() { "" } else { " (not found, using defaults)" };
    println!("Config file: {}{}", path.display().to_string().cyan(), source.dimmed());
    println!("Data dir:    {}", config.paths.data_dir.display().to_string().cyan());
    println!(
        "Credentials: {}",
        config.paths.credentials_file.display().to_string().cyan()
    );
    println!();
    print!(
        "{}",
        toml::to_string_pretty(config).context("Failed to serialize config")?
    );
    Ok(())
}
