//! Menu render and click subcommand handlers.
//!
//! Both run against headless hosts, so they show what a browser would render
//! and open without one.

use std::sync::Arc;

use searchwith_config::Config;
use searchwith_core::{
    HeadlessMenu, HeadlessTabs, MenuSynchronizer, RebuildOutcome, SyncConfig,
};
use searchwith_protocols::{MenuClick, SettingsStore};

/// Rebuild against a headless menu and print the items.
pub(crate) async fn menu(config: &Config, store: Arc<dyn SettingsStore>) -> anyhow::Result<()> {
    let menu = Arc::new(HeadlessMenu::new());
    let sync = MenuSynchronizer::new(
        store,
        menu.clone(),
        Arc::new(HeadlessTabs::new()),
        SyncConfig::from_config(config),
    );

    let report = match sync.rebuild().await? {
        RebuildOutcome::Completed(report) => report,
        RebuildOutcome::Coalesced => anyhow::bail!("rebuild unexpectedly coalesced"),
    };

    let items = menu.items();
    if items.is_empty() {
        println!("Context menu is empty.");
    }
    for item in &items {
        match &item.title {
            _ if item.is_separator() => println!("{:>4}  {}", item.id, "-".repeat(20)),
            Some(title) => println!("{:>4}  {}", item.id, title),
            None => println!("{:>4}  (untitled)", item.id),
        }
    }
    for index in &report.skipped {
        println!("{:>4}  (skipped: no name)", index);
    }
    for index in &report.failed {
        println!("{:>4}  (failed)", index);
    }
    Ok(())
}

/// Resolve one click against a headless tab strip and print the URL.
pub(crate) async fn click(
    config: &Config,
    store: Arc<dyn SettingsStore>,
    id: String,
    selection: Option<String>,
    src: Option<String>,
) -> anyhow::Result<()> {
    let sync = MenuSynchronizer::new(
        store,
        Arc::new(HeadlessMenu::new()),
        Arc::new(HeadlessTabs::new()),
        SyncConfig::from_config(config),
    );

    let mut click = MenuClick::new(id);
    if let Some(text) = selection {
        click = click.with_selection(text);
    }
    if let Some(url) = src {
        click = click.with_src_url(url);
    }

    let outcome = sync.resolve_and_open(&click).await?;
    println!("{}", outcome.url);
    if outcome.rating_dismissed {
        println!("Rating prompts disabled.");
    }
    if let Some(count) = outcome.use_count {
        println!("Use count: {}", count);
    }
    Ok(())
}
