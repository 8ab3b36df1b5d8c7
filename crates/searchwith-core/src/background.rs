//! Background event handling.
//!
//! [`Background`] is the [`EventHandler`] behind the dispatcher. It routes
//! each host event to the synchronizer, the lifecycle recorder or the
//! settings window, and is the one place errors are logged.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use searchwith_config::{Config, InterfaceConfig};
use searchwith_protocols::{MenuHost, SettingsStore, TabHost, WindowHost};

use crate::dispatcher::{EventHandler, HostEvent};
use crate::error::{SyncError, SyncResult};
use crate::interface::InterfaceWindow;
use crate::lifecycle::LifecycleRecorder;
use crate::synchronizer::{MenuSynchronizer, SyncConfig};
use crate::triggers::needs_rebuild;

/// Routes host events to their handlers.
pub struct Background {
    store: Arc<dyn SettingsStore>,
    synchronizer: MenuSynchronizer,
    lifecycle: LifecycleRecorder,
    interface: Option<InterfaceWindow>,
    version: String,
}

impl Background {
    pub fn synchronizer(&self) -> &MenuSynchronizer {
        &self.synchronizer
    }

    pub fn store(&self) -> &Arc<dyn SettingsStore> {
        &self.store
    }

    pub fn interface(&self) -> Option<&InterfaceWindow> {
        self.interface.as_ref()
    }

    /// Handle one event, returning its error instead of logging it.
    pub async fn process(&self, event: HostEvent) -> SyncResult<()> {
        match event {
            HostEvent::Startup => {
                self.synchronizer.rebuild().await?;
            }
            HostEvent::Installed { reason, version } => {
                let version = version.unwrap_or_else(|| self.version.clone());
                self.lifecycle.on_installed(reason, &version).await?;
                self.synchronizer.rebuild().await?;
            }
            HostEvent::SettingsChanged { changes } => {
                if needs_rebuild(&changes, self.synchronizer.config().rating_threshold) {
                    debug!("Settings change {:?} requires a rebuild", changes.keys());
                    self.synchronizer.rebuild().await?;
                }
            }
            HostEvent::MenuClicked(click) => {
                self.synchronizer.resolve_and_open(&click).await?;
            }
            HostEvent::ActionClicked => {
                let interface = self
                    .interface
                    .as_ref()
                    .ok_or_else(|| SyncError::HostApiUnavailable("windows".to_string()))?;
                interface.on_action_clicked().await?;
            }
            HostEvent::WindowRemoved { window_id } => {
                if let Some(interface) = &self.interface {
                    interface.on_window_removed(window_id).await?;
                }
            }
        }
        Ok(())
    }
}

#[async_trait]
impl EventHandler for Background {
    async fn handle(&self, event: HostEvent) {
        let kind = event.kind();
        match self.process(event).await {
            Ok(()) => {}
            Err(e) if e.is_stale() => warn!("Ignored {} event: {}", kind, e),
            Err(e) => error!("Failed to handle {} event: {}", kind, e),
        }
    }
}

/// Builder for [`Background`].
///
/// Host APIs are optional here so a missing one is reported as
/// [`SyncError::HostApiUnavailable`] rather than a panic.
pub struct BackgroundBuilder {
    store: Arc<dyn SettingsStore>,
    sync_config: SyncConfig,
    interface_config: InterfaceConfig,
    menus: Option<Arc<dyn MenuHost>>,
    tabs: Option<Arc<dyn TabHost>>,
    windows: Option<Arc<dyn WindowHost>>,
    version: String,
}

impl BackgroundBuilder {
    pub fn new(config: &Config, store: Arc<dyn SettingsStore>) -> Self {
        Self {
            store,
            sync_config: SyncConfig::from_config(config),
            interface_config: config.interface.clone(),
            menus: None,
            tabs: None,
            windows: None,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    pub fn menus(mut self, menus: Arc<dyn MenuHost>) -> Self {
        self.menus = Some(menus);
        self
    }

    pub fn tabs(mut self, tabs: Arc<dyn TabHost>) -> Self {
        self.tabs = Some(tabs);
        self
    }

    pub fn windows(mut self, windows: Arc<dyn WindowHost>) -> Self {
        self.windows = Some(windows);
        self
    }

    /// Version recorded by install events that do not carry one.
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// The menu and tab APIs are required; without windows the settings
    /// window is disabled.
    pub fn build(self) -> SyncResult<Background> {
        let menus = self
            .menus
            .ok_or_else(|| SyncError::HostApiUnavailable("contextMenus".to_string()))?;
        let tabs = self
            .tabs
            .ok_or_else(|| SyncError::HostApiUnavailable("tabs".to_string()))?;

        let interface = match self.windows {
            Some(windows) => Some(InterfaceWindow::new(
                self.store.clone(),
                windows,
                self.interface_config,
            )),
            None => {
                error!("Window API unavailable, settings window disabled");
                None
            }
        };

        let lifecycle = LifecycleRecorder::new(
            self.store.clone(),
            tabs.clone(),
            self.sync_config.links.homepage.clone(),
        );
        let synchronizer = MenuSynchronizer::new(self.store.clone(), menus, tabs, self.sync_config);

        info!("Background initialized (version {})", self.version);
        Ok(Background {
            store: self.store,
            synchronizer,
            lifecycle,
            interface,
            version: self.version,
        })
    }
}
