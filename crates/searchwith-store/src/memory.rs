//! In-memory settings store.

use async_trait::async_trait;
use tokio::sync::{broadcast, RwLock};
use tracing::debug;

use searchwith_protocols::{SettingKey, SettingsChange, SettingsMap, SettingsStore, StoreError};

use crate::document::{apply_write, merged_read};

const CHANGE_CAPACITY: usize = 64;

/// In-memory settings store for tests and headless runs.
pub struct MemorySettingsStore {
    defaults: SettingsMap,
    values: RwLock<SettingsMap>,
    changes: broadcast::Sender<SettingsChange>,
}

impl MemorySettingsStore {
    /// Create an empty store over `defaults`.
    pub fn new(defaults: SettingsMap) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CAPACITY);
        Self {
            defaults,
            values: RwLock::new(SettingsMap::new()),
            changes,
        }
    }

    /// Create a store with pre-populated values. No change is broadcast.
    pub fn with_values(defaults: SettingsMap, values: SettingsMap) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CAPACITY);
        Self {
            defaults,
            values: RwLock::new(values),
            changes,
        }
    }

    /// Raw stored values, without defaults.
    pub async fn stored(&self) -> SettingsMap {
        self.values.read().await.clone()
    }
}

#[async_trait]
impl SettingsStore for MemorySettingsStore {
    async fn read(&self, keys: &[SettingKey]) -> Result<SettingsMap, StoreError> {
        let values = self.values.read().await;
        Ok(merged_read(&values, &self.defaults, keys))
    }

    async fn write(&self, values: SettingsMap) -> Result<(), StoreError> {
        let change = {
            let mut stored = self.values.write().await;
            apply_write(&mut stored, values)
        };

        if !change.is_empty() {
            debug!("Settings changed: {:?}", change.keys());
            // No subscribers is fine.
            let _ = self.changes.send(change);
        }
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<SettingsChange> {
        self.changes.subscribe()
    }
}
