//! One-shot enrichment of a batch of items.

use anyhow::{bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

use larder_core::{ChannelFrontend, FrontendSignal, LarderConfig, Service};

use super::key::prompt_and_store;
use crate::app::App;
use crate::cli::EnrichCommand;
use crate::render;

pub async fn execute(cmd: EnrichCommand, config: &LarderConfig) -> Result<()> {
    let names: Vec<String> = cmd
        .names
        .iter()
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .collect();
    if names.is_empty() {
        bail!("No item names given");
    }

    let (frontend, mut signals) = ChannelFrontend::new();
    let app = App::build(config, Arc::new(frontend))?;

    if !app.gate().has(Service::Suggestion) && !prompt_and_store(app.gate(), Service::Suggestion).await? {
        bail!(
            "A suggestion API key is required. Run `larder key set suggestion` or set {}.",
            Service::Suggestion.env_var()
        );
    }

    let spinner = spinner(format!("Enriching {} item(s)...", names.len()))?;

    let mut tasks = Vec::with_capacity(names.len());
    for name in names {
        let id = app.store().add(&name).await;
        tasks.push(app.coordinator.spawn_enrich(id, name));
    }
    join_all(tasks).await?;

    if cmd.accept {
        let accepted: Vec<_> = app
            .store()
            .snapshot()
            .await
            .into_iter()
            .filter(|view| view.shown_suggestion().is_some())
            .map(|view| app.coordinator.spawn_accept(view.id))
            .collect();
        if !accepted.is_empty() {
            spinner.set_message(format!("Accepting {} suggestion(s)...", accepted.len()));
            join_all(accepted).await?;
        }
    }

    spinner.finish_and_clear();

    while let Ok(signal) = signals.try_recv() {
        match signal {
            FrontendSignal::Notice(notice) => render::print_notice(&notice),
            FrontendSignal::CredentialRequired(service) => {
                debug!("Ignoring late credential request for {}", service)
            }
        }
    }

    let items = app.store().snapshot().await;
    if cmd.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&items).context("Failed to serialize items")?
        );
    } else {
        render::print_list(&items);
    }

    Ok(())
}

fn spinner(message: String) -> Result<ProgressBar> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner:.green} {msg}")?);
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    Ok(spinner)
}

async fn join_all<T>(tasks: Vec<JoinHandle<T>>) -> Result<Vec<T>> {
    let mut out = Vec::with_capacity(tasks.len());
    for task in tasks {
        out.push(task.await.context("Enrichment task failed")?);
    }
    Ok(out)
}
