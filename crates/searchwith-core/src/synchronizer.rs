//! Context-menu synchronization.
//!
//! [`MenuSynchronizer`] owns the mapping from the persisted entry list to the
//! host menu. Item ids are positions in the effective list, so every rebuild
//! invalidates the ids handed out before it. Each completed rebuild gets a
//! new generation number; clicks that report a generation are checked
//! against it.
//!
//! Clicks without a generation are resolved against a freshly read entry
//! list, not against what was rendered. A click racing a rebuild can
//! therefore resolve against a different list than the one the user saw.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::json;
use tracing::{debug, error, info, warn};

use searchwith_config::{Config, LinksConfig};
use searchwith_protocols::{
    CreateTab, Entry, HostError, MenuClick, MenuContext, MenuHost, MenuItem, SettingKey,
    SettingsStore, Tab, TabHost,
};

use crate::effective::effective_list;
use crate::error::{SyncError, SyncResult};
use crate::gate::RebuildGate;
use crate::template::resolve_url;

/// Settings the synchronizer needs from the configuration.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub rating_threshold: u64,
    pub contexts: Vec<MenuContext>,
    pub links: LinksConfig,
}

impl SyncConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            rating_threshold: config.menu.rating_threshold,
            contexts: config.menu.contexts.clone(),
            links: config.links.clone(),
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// The menu as last rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderedMenu {
    pub generation: u64,
    /// Length of the effective list the menu was built from.
    pub len: usize,
}

/// Result of one rebuild round.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RebuildReport {
    pub generation: u64,
    pub created: usize,
    /// Positions whose item the host refused.
    pub failed: Vec<usize>,
    /// Positions skipped for having no name.
    pub skipped: Vec<usize>,
}

/// Outcome of a rebuild request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RebuildOutcome {
    /// This caller ran the rebuild (plus any follow-up queued meanwhile).
    Completed(RebuildReport),
    /// Another rebuild was in flight; it will run once more afterwards.
    Coalesced,
}

/// Outcome of a resolved click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickOutcome {
    /// URL the tab was opened with.
    pub url: String,
    pub tab: Tab,
    /// The entry was the web-store or homepage link; rating was switched off.
    pub rating_dismissed: bool,
    /// New use count, when it was incremented.
    pub use_count: Option<u64>,
}

/// Keeps the host context menu consistent with the persisted entries.
pub struct MenuSynchronizer {
    store: Arc<dyn SettingsStore>,
    menus: Arc<dyn MenuHost>,
    tabs: Arc<dyn TabHost>,
    config: SyncConfig,
    gate: RebuildGate,
    generation: AtomicU64,
    rendered: RwLock<Option<RenderedMenu>>,
}

impl MenuSynchronizer {
    pub fn new(
        store: Arc<dyn SettingsStore>,
        menus: Arc<dyn MenuHost>,
        tabs: Arc<dyn TabHost>,
        config: SyncConfig,
    ) -> Self {
        Self {
            store,
            menus,
            tabs,
            config,
            gate: RebuildGate::new(),
            generation: AtomicU64::new(0),
            rendered: RwLock::new(None),
        }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// The menu currently shown, `None` before the first rebuild and while a
    /// rebuild is between removal and re-creation.
    pub fn rendered(&self) -> Option<RenderedMenu> {
        *self.rendered.read()
    }

    /// Latest completed generation (0 before any rebuild).
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Entries the menu is built from right now.
    pub async fn effective_entries(&self) -> SyncResult<Vec<Entry>> {
        let settings = self.store.settings().await?;
        Ok(effective_list(&settings, self.config.rating_threshold))
    }

    /// Rebuild the menu, coalescing with any rebuild already in flight.
    ///
    /// If more requests arrive while this one runs, exactly one follow-up
    /// round runs before returning; the report is from the last round.
    pub async fn rebuild(&self) -> SyncResult<RebuildOutcome> {
        let Some(mut pass) = self.gate.enter() else {
            debug!("Rebuild already in flight, queued a follow-up");
            return Ok(RebuildOutcome::Coalesced);
        };

        loop {
            let result = self.rebuild_once().await;
            if !pass.next_round() {
                return result.map(RebuildOutcome::Completed);
            }
            match result {
                Ok(report) => debug!(
                    "Rebuild generation {} superseded by queued follow-up",
                    report.generation
                ),
                Err(e) => warn!("Rebuild failed, running queued follow-up: {}", e),
            }
        }
    }

    async fn rebuild_once(&self) -> SyncResult<RebuildReport> {
        let entries = self.effective_entries().await?;

        // Removal must be acknowledged before anything is created, or ids
        // could collide with stale items.
        self.menus
            .remove_all()
            .await
            .map_err(|e| SyncError::host("contextMenus.removeAll", e))?;
        *self.rendered.write() = None;

        let mut report = RebuildReport::default();

        if entries.is_empty() {
            info!("No field sets to add to the context menu");
        }

        for (index, entry) in entries.iter().enumerate() {
            let id = index.to_string();
            let item = match entry {
                Entry::Separator => {
                    debug!("Creating separator menu item with ID: {}", id);
                    MenuItem::separator(id, self.config.contexts.clone())
                }
                Entry::Link { name, .. } if name.is_empty() => {
                    debug!("Skipping unnamed entry at {}", index);
                    report.skipped.push(index);
                    continue;
                }
                Entry::Link { name, .. } => {
                    debug!("Creating menu item: \"{}\" with ID: {}", name, id);
                    MenuItem::link(id, name.clone(), self.config.contexts.clone())
                }
            };

            // Best effort: one refused item does not stop the rest.
            match self.menus.create(item).await {
                Ok(()) => report.created += 1,
                Err(e) => {
                    error!("Failed to create menu item {}: {}", index, e);
                    report.failed.push(index);
                }
            }
        }

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        *self.rendered.write() = Some(RenderedMenu {
            generation,
            len: entries.len(),
        });
        report.generation = generation;

        info!(
            "Context menu rebuilt: generation {}, {} items ({} failed)",
            generation,
            report.created,
            report.failed.len()
        );
        Ok(report)
    }

    /// Resolve a menu click to a URL and open it next to the active tab.
    pub async fn resolve_and_open(&self, click: &MenuClick) -> SyncResult<ClickOutcome> {
        let rendered = self.rendered();
        if let Some(generation) = click.generation {
            match rendered {
                Some(menu) if menu.generation == generation => {}
                Some(menu) => {
                    return Err(SyncError::StaleReference(format!(
                        "menu item {} is from generation {}, current is {}",
                        click.menu_item_id, generation, menu.generation
                    )));
                }
                None => {
                    return Err(SyncError::StaleReference(format!(
                        "menu item {} is from generation {}, menu is being rebuilt",
                        click.menu_item_id, generation
                    )));
                }
            }
        }

        let settings = self.store.settings().await?;
        let entries = effective_list(&settings, self.config.rating_threshold);

        if let Some(menu) = rendered {
            if menu.len != entries.len() {
                debug!(
                    "Entry list changed since generation {} ({} -> {} entries)",
                    menu.generation,
                    menu.len,
                    entries.len()
                );
            }
        }

        let entry = click
            .menu_item_id
            .parse::<usize>()
            .ok()
            .and_then(|index| entries.get(index))
            .ok_or_else(|| {
                SyncError::StaleReference(format!(
                    "no entry for menu item {} ({} entries)",
                    click.menu_item_id,
                    entries.len()
                ))
            })?;

        let template = entry.url().ok_or_else(|| {
            SyncError::StaleReference(format!("no URL for menu item {}", click.menu_item_id))
        })?;

        let rating_dismissed = self.config.links.is_own_page(template);
        let url = if rating_dismissed {
            self.store
                .set(SettingKey::IsRating, json!(false))
                .await?;
            info!("Rating link clicked, rating prompts disabled");
            template.to_string()
        } else {
            resolve_url(template, click.content())
        };

        let active = self
            .tabs
            .query_active_tab()
            .await
            .map_err(|e| SyncError::host("tabs.query", e))?
            .ok_or_else(|| {
                SyncError::host(
                    "tabs.query",
                    HostError::NotFound("no active tab to open a new tab next to".to_string()),
                )
            })?;

        let tab = self
            .tabs
            .create_tab(CreateTab::next_to(url.clone(), &active))
            .await
            .map_err(|e| SyncError::host("tabs.create", e))?;
        info!("Opened {} in tab {:?}", url, tab.id);

        // The increment reaches the rebuild trigger through the store's
        // change notification, not a direct call.
        let gate = settings.rating_gate(self.config.rating_threshold);
        let use_count = if !rating_dismissed && gate.counting() {
            let next = settings.has_context + 1;
            self.store.set(SettingKey::HasContext, json!(next)).await?;
            Some(next)
        } else {
            None
        };

        Ok(ClickOutcome {
            url,
            tab,
            rating_dismissed,
            use_count,
        })
    }
}

#[cfg(test)]
#[path = "synchronizer_tests.rs"]
mod tests;
