//! Install and update bookkeeping.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info, warn};

use searchwith_protocols::{CreateTab, SettingKey, SettingsMap, SettingsStore, TabHost};

use crate::error::SyncResult;

/// Why the host reported an install event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstallReason {
    Install,
    Update,
    #[serde(alias = "chrome_update")]
    BrowserUpdate,
    SharedModuleUpdate,
}

impl InstallReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            InstallReason::Install => "install",
            InstallReason::Update => "update",
            InstallReason::BrowserUpdate => "browser_update",
            InstallReason::SharedModuleUpdate => "shared_module_update",
        }
    }
}

/// Records install and update dates and greets new users.
pub struct LifecycleRecorder {
    store: Arc<dyn SettingsStore>,
    tabs: Arc<dyn TabHost>,
    homepage: String,
}

impl LifecycleRecorder {
    pub fn new(store: Arc<dyn SettingsStore>, tabs: Arc<dyn TabHost>, homepage: impl Into<String>) -> Self {
        Self {
            store,
            tabs,
            homepage: homepage.into(),
        }
    }

    /// Handle an install event. Returns whether anything was recorded.
    ///
    /// A fresh install opens the homepage and stores the install date and
    /// version; an update stores the update date and version. The homepage
    /// tab is best effort.
    pub async fn on_installed(&self, reason: InstallReason, version: &str) -> SyncResult<bool> {
        let now = chrono::Utc::now().timestamp_millis();
        let mut values = SettingsMap::new();

        match reason {
            InstallReason::Install => {
                if !self.homepage.is_empty() {
                    if let Err(e) = self.tabs.create_tab(CreateTab::new(self.homepage.clone())).await {
                        warn!("Failed to open homepage after install: {}", e);
                    }
                }
                values.insert(SettingKey::InstallDate.as_str().to_string(), json!(now));
                values.insert(SettingKey::InstallVersion.as_str().to_string(), json!(version));
            }
            InstallReason::Update => {
                values.insert(SettingKey::UpdateDate.as_str().to_string(), json!(now));
                values.insert(SettingKey::UpdateVersion.as_str().to_string(), json!(version));
            }
            other => {
                debug!("Ignoring install event: {}", other.as_str());
                return Ok(false);
            }
        }

        self.store.write(values).await?;
        info!("Recorded {} of version {}", reason.as_str(), version);
        Ok(true)
    }
}
