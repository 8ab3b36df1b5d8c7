//! `run` subcommand: drive the background from host events on stdin.
//!
//! Each stdin line is one JSON [`HostEvent`], for example
//! `{"type": "menu_clicked", "menuItemId": "4", "selectionText": "cats"}`.
//! Malformed lines are logged and skipped.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;
use tracing::{info, warn};

use searchwith_config::Config;
use searchwith_core::{
    BackgroundBuilder, BackgroundRuntime, HeadlessMenu, HeadlessTabs, HeadlessWindows, HostEvent,
};
use searchwith_protocols::SettingsStore;

/// Run until stdin closes or Ctrl-C.
pub(crate) async fn run(config: &Config, store: Arc<dyn SettingsStore>) -> anyhow::Result<()> {
    let menu = Arc::new(HeadlessMenu::new());
    let tabs = Arc::new(HeadlessTabs::new());
    let windows = Arc::new(HeadlessWindows::default());

    let background = BackgroundBuilder::new(config, store)
        .menus(menu.clone())
        .tabs(tabs.clone())
        .windows(windows)
        .build()?;
    let runtime = BackgroundRuntime::start(Arc::new(background))?;
    info!("Reading host events from stdin");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    info!("stdin closed");
                    break;
                };
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                match serde_json::from_str::<HostEvent>(line) {
                    Ok(event) => runtime.dispatch(event)?,
                    Err(e) => warn!("Skipping malformed event: {}", e),
                }
            }
            _ = signal::ctrl_c() => {
                info!("Interrupted");
                break;
            }
        }
    }

    runtime.shutdown().await;

    println!("Menu: {} items", menu.items().len());
    for tab in tabs.opened() {
        println!("Opened: {}", tab.url.unwrap_or_default());
    }
    Ok(())
}
