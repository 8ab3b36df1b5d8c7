//! Settings window management.
//!
//! At most one settings window is open. Its id is persisted under
//! `interfaceId` so a later action click focuses it instead of opening a
//! second one.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, info};

use searchwith_config::InterfaceConfig;
use searchwith_protocols::{
    CreateWindow, SettingKey, SettingsStore, Window, WindowHost, WindowId, WindowKind,
};

use crate::error::{SyncError, SyncResult};

/// What an action click did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterfaceOutcome {
    Focused(WindowId),
    Created(WindowId),
}

/// Opens, focuses and forgets the settings window.
pub struct InterfaceWindow {
    store: Arc<dyn SettingsStore>,
    windows: Arc<dyn WindowHost>,
    config: InterfaceConfig,
}

impl InterfaceWindow {
    pub fn new(store: Arc<dyn SettingsStore>, windows: Arc<dyn WindowHost>, config: InterfaceConfig) -> Self {
        Self {
            store,
            windows,
            config,
        }
    }

    /// Focus the open settings window, or open a new one centered over the
    /// current window.
    pub async fn on_action_clicked(&self) -> SyncResult<InterfaceOutcome> {
        let settings = self.store.settings().await?;

        if let Some(id) = settings.interface_id {
            let existing = self
                .windows
                .get_window(id)
                .await
                .map_err(|e| SyncError::host("windows.get", e))?;
            if existing.is_some() {
                self.windows
                    .focus_window(id)
                    .await
                    .map_err(|e| SyncError::host("windows.update", e))?;
                debug!("Focused settings window {}", id);
                return Ok(InterfaceOutcome::Focused(id));
            }
            debug!("Settings window {} is gone, clearing it", id);
            self.store.set(SettingKey::InterfaceId, json!(false)).await?;
        }

        let current = self
            .windows
            .current_window()
            .await
            .map_err(|e| SyncError::host("windows.getCurrent", e))?;

        let (left, top) = centered(&current, self.config.width, self.config.height);
        let window = self
            .windows
            .create_window(CreateWindow {
                url: self.windows.resource_url(&self.config.page),
                kind: WindowKind::Popup,
                width: self.config.width,
                height: self.config.height,
                left,
                top,
            })
            .await
            .map_err(|e| SyncError::host("windows.create", e))?;

        self.store
            .set(SettingKey::InterfaceId, json!(window.id.0))
            .await?;
        info!("Opened settings window {}", window.id);
        Ok(InterfaceOutcome::Created(window.id))
    }

    /// Forget the settings window if `id` is it. Returns whether it was.
    pub async fn on_window_removed(&self, id: WindowId) -> SyncResult<bool> {
        let settings = self.store.settings().await?;
        if settings.interface_id != Some(id) {
            return Ok(false);
        }
        self.store.set(SettingKey::InterfaceId, json!(false)).await?;
        debug!("Settings window {} closed", id);
        Ok(true)
    }
}

/// Top-left corner that centers a `width` x `height` popup over `parent`.
fn centered(parent: &Window, width: u32, height: u32) -> (i32, i32) {
    let left = parent.left as f64 + (parent.width as f64 - width as f64) / 2.0;
    let top = parent.top as f64 + (parent.height as f64 - height as f64) / 2.0;
    (left.round() as i32, top.round() as i32)
}
