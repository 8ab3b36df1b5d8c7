//! Settings store protocol definitions.
//!
//! Settings are a flat JSON object keyed by [`SettingKey`]. Reads always come
//! back merged over the store's defaults; writes are partial and broadcast a
//! [`SettingsChange`] describing old and new values of every written key.
//! Concurrent writers follow last-write-wins per key.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use tokio::sync::broadcast;
use tracing::warn;

use crate::error::StoreError;
use crate::types::{Entry, RatingGate};
use crate::windows::WindowId;

/// A partial or complete settings document.
pub type SettingsMap = serde_json::Map<String, Value>;

/// Named settings keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SettingKey {
    FieldSets,
    RatedSets,
    IsRating,
    HasContext,
    InterfaceId,
    InstallDate,
    InstallVersion,
    UpdateDate,
    UpdateVersion,
}

impl SettingKey {
    /// Keys that carry defaults and make up [`Settings`].
    pub const CORE: [SettingKey; 5] = [
        SettingKey::FieldSets,
        SettingKey::RatedSets,
        SettingKey::IsRating,
        SettingKey::HasContext,
        SettingKey::InterfaceId,
    ];

    pub const ALL: [SettingKey; 9] = [
        SettingKey::FieldSets,
        SettingKey::RatedSets,
        SettingKey::IsRating,
        SettingKey::HasContext,
        SettingKey::InterfaceId,
        SettingKey::InstallDate,
        SettingKey::InstallVersion,
        SettingKey::UpdateDate,
        SettingKey::UpdateVersion,
    ];

    /// Persisted key name.
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingKey::FieldSets => "fieldSets",
            SettingKey::RatedSets => "ratedSets",
            SettingKey::IsRating => "isRating",
            SettingKey::HasContext => "hasContext",
            SettingKey::InterfaceId => "interfaceId",
            SettingKey::InstallDate => "installDate",
            SettingKey::InstallVersion => "isInstallVersion",
            SettingKey::UpdateDate => "updateDate",
            SettingKey::UpdateVersion => "isUpdateVersion",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.as_str() == name)
    }
}

impl std::fmt::Display for SettingKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Old and new value of one key in a write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueChange {
    #[serde(rename = "oldValue", skip_serializing_if = "Option::is_none")]
    pub old_value: Option<Value>,
    #[serde(rename = "newValue", skip_serializing_if = "Option::is_none")]
    pub new_value: Option<Value>,
}

/// Change notification emitted after a successful write.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SettingsChange {
    #[serde(flatten)]
    pub changes: BTreeMap<String, ValueChange>,
}

impl SettingsChange {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_change(
        mut self,
        key: SettingKey,
        old_value: Option<Value>,
        new_value: Option<Value>,
    ) -> Self {
        self.changes.insert(
            key.as_str().to_string(),
            ValueChange {
                old_value,
                new_value,
            },
        );
        self
    }

    pub fn get(&self, key: SettingKey) -> Option<&ValueChange> {
        self.changes.get(key.as_str())
    }

    pub fn contains(&self, key: SettingKey) -> bool {
        self.changes.contains_key(key.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Names of the changed keys, in key order.
    pub fn keys(&self) -> Vec<&str> {
        self.changes.keys().map(String::as_str).collect()
    }
}

/// Typed view over the settings the menu and window logic consume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(rename = "fieldSets", default)]
    pub field_sets: Vec<Entry>,

    #[serde(rename = "ratedSets", default)]
    pub rated_sets: Vec<Entry>,

    #[serde(rename = "isRating", default)]
    pub is_rating: bool,

    #[serde(rename = "hasContext", default)]
    pub has_context: u64,

    /// Settings window currently open, if any. Persisted as `false` or `""`
    /// when there is none.
    #[serde(
        rename = "interfaceId",
        default,
        serialize_with = "serialize_window_slot",
        deserialize_with = "deserialize_window_slot"
    )]
    pub interface_id: Option<WindowId>,
}

impl Settings {
    /// Decode a merged settings document.
    ///
    /// Decoding is per key. A malformed value is coerced the way a loosely
    /// typed reader would (`"3"` as a count, a numeric entry name as text);
    /// what cannot be coerced falls back to the field's empty value with a
    /// warning, so one bad key never hides the others.
    pub fn from_map(map: &SettingsMap) -> Self {
        if let Ok(settings) = serde_json::from_value(Value::Object(map.clone())) {
            return settings;
        }

        let value = |key: SettingKey| field(map, key);
        Self {
            field_sets: coerce_entries(SettingKey::FieldSets, value(SettingKey::FieldSets)),
            rated_sets: coerce_entries(SettingKey::RatedSets, value(SettingKey::RatedSets)),
            is_rating: coerce_bool(value(SettingKey::IsRating)),
            has_context: coerce_count(SettingKey::HasContext, value(SettingKey::HasContext)),
            interface_id: value(SettingKey::InterfaceId).as_u64().map(WindowId),
        }
    }

    /// Encode into a settings document.
    pub fn to_map(&self) -> Result<SettingsMap, StoreError> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            other => Err(StoreError::Serialization(format!(
                "settings encoded as non-object: {}",
                other
            ))),
        }
    }

    pub fn rating_gate(&self, threshold: u64) -> RatingGate {
        RatingGate::new(self.is_rating, self.has_context, threshold)
    }
}

fn serialize_window_slot<S>(slot: &Option<WindowId>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match slot {
        Some(id) => serializer.serialize_u64(id.0),
        None => serializer.serialize_bool(false),
    }
}

fn deserialize_window_slot<'de, D>(deserializer: D) -> Result<Option<WindowId>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_u64().map(WindowId))
}

static NULL: Value = Value::Null;

fn field(map: &SettingsMap, key: SettingKey) -> &Value {
    map.get(key.as_str()).unwrap_or(&NULL)
}

/// Truthiness of a stored flag.
fn coerce_bool(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn coerce_count(key: SettingKey, value: &Value) -> u64 {
    let count = match value {
        Value::Null => Some(0),
        Value::Bool(b) => Some(u64::from(*b)),
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().map(float_count)),
        Value::String(s) => s.trim().parse::<f64>().ok().map(float_count),
        Value::Array(_) | Value::Object(_) => None,
    };
    count.unwrap_or_else(|| {
        warn!("Ignoring malformed {}: {}", key, value);
        0
    })
}

fn float_count(n: f64) -> u64 {
    if n.is_finite() && n > 0.0 { n as u64 } else { 0 }
}

fn coerce_entries(key: SettingKey, value: &Value) -> Vec<Entry> {
    let items = match value {
        Value::Null => return Vec::new(),
        Value::Array(items) => items,
        other => {
            warn!("Ignoring malformed {}: expected a list, got {}", key, other);
            return Vec::new();
        }
    };

    items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| {
            let entry = match item {
                Value::Object(fields) => {
                    let mut fields = fields.clone();
                    for name in ["name", "url"] {
                        match fields.get(name) {
                            Some(Value::Null) => {
                                fields.remove(name);
                            }
                            Some(Value::Number(n)) => {
                                let text = n.to_string();
                                fields.insert(name.to_string(), Value::String(text));
                            }
                            Some(Value::Bool(b)) => {
                                fields.insert(name.to_string(), Value::String(b.to_string()));
                            }
                            _ => {}
                        }
                    }
                    serde_json::from_value::<Entry>(Value::Object(fields)).ok()
                }
                _ => None,
            };
            if entry.is_none() {
                warn!("Dropping malformed {} entry {}: {}", key, index, item);
            }
            entry
        })
        .collect()
}

/// Persistent key-value settings store.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Read the given keys, merged over the defaults.
    async fn read(&self, keys: &[SettingKey]) -> Result<SettingsMap, StoreError>;

    /// Write a partial document. Unknown keys are stored as-is.
    async fn write(&self, values: SettingsMap) -> Result<(), StoreError>;

    /// Subscribe to change notifications.
    fn subscribe(&self) -> broadcast::Receiver<SettingsChange>;

    /// Read and decode the typed settings view.
    async fn settings(&self) -> Result<Settings, StoreError> {
        let map = self.read(&SettingKey::CORE).await?;
        Ok(Settings::from_map(&map))
    }

    /// Write a single key.
    async fn set(&self, key: SettingKey, value: Value) -> Result<(), StoreError> {
        let mut map = SettingsMap::new();
        map.insert(key.as_str().to_string(), value);
        self.write(map).await
    }
}

#[cfg(test)]
#[path = "settings_tests.rs"]
mod tests;
