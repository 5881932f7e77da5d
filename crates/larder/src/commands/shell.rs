//! Interactive list session.
//!
//! Reads one command per line from stdin. Items are addressed by their
//! 1-based position in `list`. Enrichment runs in the background; notices
//! and credential requests are handled before each prompt.

use anyhow::{Context, Result};
use colored::Colorize;
use dialoguer::Confirm;
use std::io::{IsTerminal, Write};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::UnboundedReceiver;

use larder_core::{ChannelFrontend, FrontendSignal, ItemView, LarderConfig, Service};

use super::key::{prompt_and_store, prompt_key};
use crate::app::App;
use crate::render;

const HELP: &str = "\
Commands:
  add <name>        add an item and fetch its suggestion and image
  rm <n>            remove item n
  edit <n>          start editing item n
  commit <name>     rename the item being edited
  accept <n>        replace item n with its suggestion
  dismiss <n>       hide item n's suggestion
  enrich <n>        fetch item n's suggestion and image again
  list              show all items
  wait              wait for outstanding fetches, then list
  key <service>     set the suggestion or image API key
  help              show this help
  quit              leave";

#[derive(Debug, Clone, PartialEq, Eq)]
enum ShellCommand {
    Add(String),
    Remove(usize),
    Edit(usize),
    Commit(String),
    Accept(usize),
    Dismiss(usize),
    Enrich(usize),
    List,
    Wait,
    Key(Service),
    Help,
    Quit,
}

impl ShellCommand {
    /// Parse one input line. Blank lines parse to `None`.
    fn parse(line: &str) -> Result<Option<Self>, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        let command = match verb.to_lowercase().as_str() {
            "add" | "a" => ShellCommand::Add(text(rest, "add <name>")?),
            "rm" | "remove" | "delete" => ShellCommand::Remove(position(rest, "rm <n>")?),
            "edit" | "e" => ShellCommand::Edit(position(rest, "edit <n>")?),
            "commit" | "c" => ShellCommand::Commit(text(rest, "commit <name>")?),
            "accept" => ShellCommand::Accept(position(rest, "accept <n>")?),
            "dismiss" => ShellCommand::Dismiss(position(rest, "dismiss <n>")?),
            "enrich" | "retry" => ShellCommand::Enrich(position(rest, "enrich <n>")?),
            "list" | "ls" | "l" => ShellCommand::List,
            "wait" | "w" => ShellCommand::Wait,
            "key" => ShellCommand::Key(
                rest.parse()
                    .map_err(|e: larder_core::Error| e.to_string())?,
            ),
            "help" | "h" | "?" => ShellCommand::Help,
            "quit" | "exit" | "q" => ShellCommand::Quit,
            other => return Err(format!("Unknown command '{}'. Type 'help'.", other)),
        };
        Ok(Some(command))
    }
}

fn text(rest: &str, usage: &str) -> Result<String, String> {
    if rest.is_empty() {
        Err(format!("Usage: {}", usage))
    } else {
        Ok(rest.to_string())
    }
}

fn position(rest: &str, usage: &str) -> Result<usize, String> {
    match rest.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(format!("Usage: {}", usage)),
    }
}

pub async fn execute(config: &LarderConfig) -> Result<()> {
    let (frontend, mut signals) = ChannelFrontend::new();
    let app = App::build(config, Arc::new(frontend))?;
    let interactive = std::io::stdin().is_terminal();

    if interactive {
        println!("{} Type 'help' for commands.", "larder".bold());
        for service in Service::ALL {
            if !app.gate().has(service) {
                println!("  {} no {} API key configured", "!".yellow(), service);
            }
        }
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        handle_signals(&app, &mut signals, interactive).await?;

        if interactive {
            print!("{} ", "larder>".green());
            std::io::stdout().flush().context("Failed to flush stdout")?;
        }
        let Some(line) = lines.next_line().await.context("Failed to read input")? else {
            break;
        };

        match ShellCommand::parse(&line) {
            Ok(None) => {}
            Ok(Some(ShellCommand::Quit)) => break,
            Ok(Some(command)) => run(&app, command, interactive).await?,
            Err(message) => eprintln!("{} {}", "✗".red(), message),
        }
    }

    Ok(())
}

async fn handle_signals(
    app: &App,
    signals: &mut UnboundedReceiver<FrontendSignal>,
    interactive: bool,
) -> Result<()> {
    let mut requested: Vec<Service> = Vec::new();
    while let Ok(signal) = signals.try_recv() {
        match signal {
            FrontendSignal::Notice(notice) => render::print_notice(&notice),
            FrontendSignal::CredentialRequired(service) => {
                if !requested.contains(&service) {
                    requested.push(service);
                }
            }
        }
    }

    for service in requested {
        // Another prompt may already have supplied it.
        if app.gate().has(service) {
            continue;
        }
        if !interactive {
            eprintln!(
                "{} No {} API key; set {} or run `larder key set {}`.",
                "✗".red(),
                service,
                service.env_var(),
                service
            );
            continue;
        }
        if prompt_and_store(app.gate(), service).await? {
            println!("  Use {} to fetch for items added without it.", "enrich <n>".cyan());
        }
    }
    Ok(())
}

async fn run(app: &App, command: ShellCommand, interactive: bool) -> Result<()> {
    let store = app.store();

    match command {
        ShellCommand::Add(name) => {
            let id = store.add(&name).await;
            app.coordinator.spawn_enrich(id, name.trim());
            println!("{} {}", "+".green(), name.trim());
        }
        ShellCommand::Remove(n) => {
            let Some(view) = nth(app, n).await else {
                return Ok(());
            };
            if interactive && !confirm(format!("Remove {}?", view.name)).await? {
                return Ok(());
            }
            store.remove(view.id).await;
            println!("{} {}", "-".red(), view.name);
        }
        ShellCommand::Edit(n) => {
            let Some(view) = nth(app, n).await else {
                return Ok(());
            };
            store.begin_edit(view.id).await;
            println!(
                "Editing {}. Use {} to rename it.",
                view.name.bold(),
                "commit <name>".cyan()
            );
        }
        ShellCommand::Commit(name) => match store.editing().await {
            None => eprintln!("{} Nothing is being edited.", "✗".red()),
            Some(id) => {
                if store.commit_edit(id, &name).await {
                    println!("{} Renamed to {}", "✓".green(), name.trim().bold());
                } else {
                    eprintln!("{} Name must not be empty.", "✗".red());
                }
            }
        },
        ShellCommand::Accept(n) => {
            let Some(view) = nth(app, n).await else {
                return Ok(());
            };
            match view.shown_suggestion() {
                Some(suggestion) => {
                    println!(
                        "{} {} → {}",
                        "✓".green(),
                        view.name,
                        suggestion.alternative.bold()
                    );
                    app.coordinator.spawn_accept(view.id);
                }
                None => eprintln!("{} {} has no suggestion shown.", "✗".red(), view.name),
            }
        }
        ShellCommand::Dismiss(n) => {
            let Some(view) = nth(app, n).await else {
                return Ok(());
            };
            store.dismiss_suggestion(view.id).await;
        }
        ShellCommand::Enrich(n) => {
            let Some(view) = nth(app, n).await else {
                return Ok(());
            };
            app.coordinator.spawn_enrich(view.id, view.name.clone());
        }
        ShellCommand::List => render::print_list(&store.snapshot().await),
        ShellCommand::Wait => {
            while store.has_pending().await {
                tokio::time::sleep(Duration::from_millis(50)).await;
            }
            render::print_list(&store.snapshot().await);
        }
        ShellCommand::Key(service) => {
            let value = prompt_key(service).await?;
            if value.trim().is_empty() {
                println!("  Skipped.");
            } else {
                app.gate()
                    .set(service, &value)
                    .with_context(|| format!("Failed to save {} key", service))?;
                println!("{} Saved {} key.", "✓".green(), service);
            }
        }
        ShellCommand::Help => println!("{}", HELP),
        ShellCommand::Quit => {}
    }
    Ok(())
}

async fn nth(app: &App, n: usize) -> Option<ItemView> {
    let view = app.store().snapshot().await.into_iter().nth(n - 1);
    if view.is_none() {
        eprintln!("{} No item {}.", "✗".red(), n);
    }
    view
}

async fn confirm(prompt: String) -> Result<bool> {
    tokio::task::spawn_blocking(move || {
        Confirm::new()
            .with_prompt(prompt)
            .default(true)
            .interact()
            .context("Failed to read confirmation")
    })
    .await
    .context("Confirmation task failed")?
}
