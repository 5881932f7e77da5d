//! Configuration loading for larder.
//!
//! Configuration is loaded with precedence:
//! 1. Config file at `$LARDER_CONFIG`
//! 2. Config file at `<data_dir>/config.toml` (`$LARDER_DIR`, else `~/.larder`)
//! 3. Default values
//!
//! API keys are not part of this file; they live in the credential store.

use anyhow::{Context, Result};
use larder_core::config::default_data_dir;
use larder_core::LarderConfig;
use std::path::{Path, PathBuf};

/// Get the config file path.
pub fn config_path() -> PathBuf {
    if let Ok(path) = std::env::var("LARDER_CONFIG") {
        PathBuf::from(path)
    } else {
        default_data_dir().join("config.toml")
    }
}

/// Load configuration from the default location.
pub fn load() -> Result<LarderConfig> {
    load_from(&config_path())
}

/// Load and validate configuration from `path`, using defaults if it does not exist.
pub fn load_from(path: &Path) -> Result<LarderConfig> {
    let config = if path.exists() {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?
    } else {
        LarderConfig::default()
    };

    config
        .validate()
        .with_context(|| format!("Invalid configuration in {}", path.display()))?;
    Ok(config)
}

/// Save configuration to `path`.
pub fn save_to(config: &LarderConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    let content = toml::to_string_pretty(config).context("Failed to serialize config")?;
    std::fs::write(path, content).context("Failed to write config file")?;

    Ok(())
}
