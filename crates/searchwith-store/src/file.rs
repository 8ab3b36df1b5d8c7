//! JSON-file settings store.
//!
//! The whole document lives in one pretty-printed JSON object:
//! ```text
//! {
//!   "fieldSets": [{"name": "Bing", "url": "https://www.bing.com/search?q=%s"}],
//!   "hasContext": 2,
//!   ...
//! }
//! ```
//! Only explicitly written keys are persisted; defaults are merged on read.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info};

use searchwith_protocols::{SettingKey, SettingsChange, SettingsMap, SettingsStore, StoreError};

use crate::document::{apply_write, merged_read, parse_document};

const CHANGE_CAPACITY: usize = 64;

/// File system based settings store.
pub struct FileSettingsStore {
    path: PathBuf,
    defaults: SettingsMap,
    /// Cached document. Also serializes writers.
    values: Mutex<SettingsMap>,
    changes: broadcast::Sender<SettingsChange>,
}

impl FileSettingsStore {
    /// Open the store at `path`, loading the document if it exists.
    pub async fn open(path: impl Into<PathBuf>, defaults: SettingsMap) -> Result<Self, StoreError> {
        let path = path.into();

        let values = if fs::try_exists(&path).await? {
            let content = fs::read_to_string(&path).await?;
            if content.trim().is_empty() {
                SettingsMap::new()
            } else {
                parse_document(&content)?
            }
        } else {
            SettingsMap::new()
        };

        info!("Settings store opened at {:?} ({} stored keys)", path, values.len());

        let (changes, _) = broadcast::channel(CHANGE_CAPACITY);
        Ok(Self {
            path,
            defaults,
            values: Mutex::new(values),
            changes,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, document: &SettingsMap) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        let content = serde_json::to_string_pretty(document)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, content).await?;
        fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl SettingsStore for FileSettingsStore {
    async fn read(&self, keys: &[SettingKey]) -> Result<SettingsMap, StoreError> {
        let values = self.values.lock().await;
        Ok(merged_read(&values, &self.defaults, keys))
    }

    async fn write(&self, values: SettingsMap) -> Result<(), StoreError> {
        let mut cached = self.values.lock().await;

        let mut next = cached.clone();
        let change = apply_write(&mut next, values);
        if change.is_empty() {
            return Ok(());
        }

        self.persist(&next).await?;
        *cached = next;
        drop(cached);

        debug!("Persisted settings change {:?} to {:?}", change.keys(), self.path);
        let _ = self.changes.send(change);
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<SettingsChange> {
        self.changes.subscribe()
    }
}
