//! API key management commands.

use anyhow::{bail, Context, Result};
use colored::Colorize;
use dialoguer::Password;
use std::sync::Arc;

use larder_core::credentials::mask;
use larder_core::{CredentialGate, CredentialStore, LarderConfig, NullFrontend, Service};

use crate::app::open_credentials;
use crate::cli::KeyAction;

/// Handle key commands
pub async fn execute(action: KeyAction, config: &LarderConfig) -> Result<()> {
    match action {
        KeyAction::Set { service, value } => set(service, value, config).await,
        KeyAction::Status => status(config),
    }
}

async fn set(service: Service, value: Option<String>, config: &LarderConfig) -> Result<()> {
    let credentials = Arc::new(open_credentials(config)?);
    let gate = CredentialGate::new(credentials.clone(), Arc::new(NullFrontend));

    let value = match value {
        Some(value) => value,
        None => prompt_key(service).await?,
    };
    if value.trim().is_empty() {
        bail!("No key entered; nothing saved");
    }

    gate.set(service, &value)
        .with_context(|| format!("Failed to save {} key", service))?;
    println!(
        "{} Saved {} key to {}",
        "✓".green(),
        service,
        credentials.path().display().to_string().cyan()
    );

    if credentials.is_overridden(service.credential_key()) {
        println!(
            "  {} {} is set and takes precedence over the saved key.",
            "!".yellow(),
            service.env_var()
        );
    }
    Ok(())
}

fn status(config: &LarderConfig) -> Result<()> {
    let credentials = open_credentials(config)?;

    println!("Credentials: {}", credentials.path().display().to_string().cyan());
    for service in Service::ALL {
        let key = service.credential_key();
        match credentials.get(key).filter(|value| !value.trim().is_empty()) {
            Some(value) => {
                let source = if credentials.is_overridden(key) {
                    service.env_var()
                } else {
                    "file"
                };
                println!(
                    "  {} {:<10} {} ({})",
                    "✓".green(),
                    service.to_string(),
                    mask(value.trim()),
                    source.dimmed()
                );
            }
            None => println!(
                "  {} {:<10} {}",
                "✗".red(),
                service.to_string(),
                "not set".red()
            ),
        }
    }
    Ok(())
}

/// Ask for a key on the terminal without echoing it.
pub async fn prompt_key(service: Service) -> Result<String> {
    tokio::task::spawn_blocking(move || {
        Password::new()
            .with_prompt(format!("{} API key", service))
            .allow_empty_password(true)
            .interact()
            .context("Failed to read key from terminal")
    })
    .await
    .context("Key prompt task failed")?
}

/// Prompt for a key and store it through the gate. Returns whether a key was stored.
pub async fn prompt_and_store(gate: &CredentialGate, service: Service) -> Result<bool> {
    println!(
        "{} No {} API key configured (or set {}).",
        "!".yellow(),
        service,
        service.env_var()
    );
    let value = prompt_key(service).await?;
    if value.trim().is_empty() {
        println!("  Skipped.");
        return Ok(false);
    }
    gate.set(service, &value)
        .with_context(|| format!("Failed to save {} key", service))?;
    println!("{} Saved {} key.", "✓".green(), service);
    Ok(true)
}
