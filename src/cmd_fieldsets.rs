//! Field-set subcommand handlers.

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::info;

use searchwith_protocols::{Entry, SettingsStore};
use searchwith_store::fieldsets;

use crate::cli::Commands;

/// Handle field-set editing subcommands.
pub(crate) async fn handle_fieldset_command(
    command: Commands,
    store: &dyn SettingsStore,
) -> anyhow::Result<()> {
    match command {
        Commands::List { format } => list(store, &format).await,
        Commands::Add { name, url } => {
            edit(store, |entries| {
                fieldsets::add_link(entries, name, url);
                Ok(())
            })
            .await
        }
        Commands::AddSeparator => {
            edit(store, |entries| {
                fieldsets::add_separator(entries);
                Ok(())
            })
            .await
        }
        Commands::Remove { index } => {
            edit(store, |entries| {
                let removed = fieldsets::remove(entries, index)?;
                println!("Removed: {}", describe(&removed));
                Ok(())
            })
            .await
        }
        Commands::Move { from, to } => {
            edit(store, |entries| Ok(fieldsets::move_entry(entries, from, to)?)).await
        }
        Commands::Sort => {
            edit(store, |entries| {
                fieldsets::sort_alphabetically(entries);
                Ok(())
            })
            .await
        }
        Commands::LoadDefaults => {
            let entries = fieldsets::load_defaults(store).await?;
            println!("Restored {} default entries", entries.len());
            Ok(())
        }
        Commands::Export { file } => export(store, file).await,
        Commands::Import { file } => import(store, &file).await,
        _ => anyhow::bail!("not a field-set command"),
    }
}

/// Load, edit, validate and save the list.
async fn edit<F>(store: &dyn SettingsStore, change: F) -> anyhow::Result<()>
where
    F: FnOnce(&mut Vec<Entry>) -> anyhow::Result<()>,
{
    let mut entries = fieldsets::load(store).await?;
    change(&mut entries)?;
    let saved = fieldsets::save(store, entries).await?;
    println!("Saved {} entries", saved.len());
    Ok(())
}

async fn list(store: &dyn SettingsStore, format: &str) -> anyhow::Result<()> {
    let entries = fieldsets::load(store).await?;

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
        _ => {
            if entries.is_empty() {
                println!("No field sets.");
                return Ok(());
            }
            println!("{:<5} {:<28} {}", "#", "NAME", "URL");
            println!("{}", "-".repeat(80));
            for (index, entry) in entries.iter().enumerate() {
                match entry {
                    Entry::Separator => println!("{:<5} {}", index, "-".repeat(20)),
                    Entry::Link { name, .. } => {
                        println!("{:<5} {:<28} {}", index, name, entry.url().unwrap_or("-"))
                    }
                }
            }
        }
    }
    Ok(())
}

async fn export(store: &dyn SettingsStore, file: Option<PathBuf>) -> anyhow::Result<()> {
    let json = fieldsets::export(store).await?;
    match file {
        Some(path) => {
            tokio::fs::write(&path, json)
                .await
                .with_context(|| format!("writing {}", path.display()))?;
            info!("Exported settings to {}", path.display());
            println!("Exported to {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

async fn import(store: &dyn SettingsStore, file: &Path) -> anyhow::Result<()> {
    let json = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("reading {}", file.display()))?;
    let entries = fieldsets::import(&json)?;
    let saved = fieldsets::save(store, entries).await?;
    println!("Imported {} entries", saved.len());
    Ok(())
}

fn describe(entry: &Entry) -> String {
    match entry {
        Entry::Separator => "separator".to_string(),
        Entry::Link { name, .. } => name.clone(),
    }
}
