//! SearchWith - context-menu "search with" shortcuts
//!
//! Main entry point for the SearchWith CLI.

mod cli;
mod cmd_fieldsets;
mod cmd_menu;
mod cmd_run;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use searchwith_config::{Config, ConfigLoader, ConfigValidator};
use searchwith_store::{default_settings, FileSettingsStore};

use cli::{Cli, Commands};

fn searchwith_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".searchwith"))
        .unwrap_or_else(|| PathBuf::from(".searchwith"))
}

/// Initialize tracing with console and file output.
///
/// Log files are written to ~/.searchwith/logs/ with daily rotation. The
/// console layer writes to stderr so command output stays on stdout.
fn init_tracing() -> anyhow::Result<()> {
    let log_dir = searchwith_dir().join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("searchwith")
        .filename_suffix("log")
        .max_log_files(14)
        .build(&log_dir)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // Keeps the file writer flushing until exit.
    static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
        std::sync::OnceLock::new();
    let _ = GUARD.set(guard);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_ansi(true)
                .with_writer(std::io::stderr),
        )
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(())
}

/// Load the configuration, falling back to defaults when the file is absent.
fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let config = match path {
        Some(path) => ConfigLoader::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => {
            let path = searchwith_dir().join("config.toml");
            ConfigLoader::load_or_default(&path)
                .with_context(|| format!("loading config {}", path.display()))?
        }
    };

    let result = ConfigValidator::validate(&config);
    for warning in &result.warnings {
        warn!("Config {}: {}", warning.path, warning.message);
    }
    if !result.is_valid() {
        let errors: Vec<String> = result
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.path, e.message))
            .collect();
        anyhow::bail!("invalid configuration: {}", errors.join("; "));
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    if let Commands::Check = cli.command {
        println!("Configuration OK");
        return Ok(());
    }

    let path = cli
        .settings
        .unwrap_or_else(|| config.storage.resolved_path());
    let store = Arc::new(
        FileSettingsStore::open(&path, default_settings(&config.links))
            .await
            .with_context(|| format!("opening settings {}", path.display()))?,
    );
    info!("Using settings at {}", path.display());

    match cli.command {
        Commands::Menu => cmd_menu::menu(&config, store).await,
        Commands::Click { id, selection, src } => {
            cmd_menu::click(&config, store, id, selection, src).await
        }
        Commands::Run => cmd_run::run(&config, store).await,
        command => cmd_fieldsets::handle_fieldset_command(command, store.as_ref()).await,
    }
}
