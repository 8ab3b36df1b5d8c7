//! Field-set editing.
//!
//! Operations behind the settings window: validating and saving the list,
//! reordering, loading defaults, and JSON import/export. Edits happen on a
//! plain `Vec<Entry>`; only [`save`] and [`load_defaults`] touch the store.

use std::cmp::Ordering;

use serde_json::Value;
use tracing::{info, warn};

use searchwith_protocols::{Entry, SettingKey, SettingsStore, URL_PLACEHOLDER};

use crate::defaults::{default_field_sets, entries_value};
use crate::error::FieldSetError;

/// Check one entry. Separators are always valid.
pub fn validate_entry(entry: &Entry) -> Result<(), String> {
    let Entry::Link { name, url } = entry else {
        return Ok(());
    };

    if name.trim().is_empty() {
        return Err("name cannot be empty".to_string());
    }

    let url = url.as_deref().unwrap_or_default();
    if !url.contains(URL_PLACEHOLDER) {
        return Err(format!("URL must contain '{}'", URL_PLACEHOLDER));
    }
    match url::Url::parse(url) {
        Ok(parsed) if parsed.host_str().is_some_and(|h| !h.is_empty()) => Ok(()),
        Ok(_) => Err(format!("URL has no host: {}", url)),
        Err(e) => Err(format!("URL is not valid ({}): {}", e, url)),
    }
}

/// Validate every entry and trim link names. Stops at the first failure.
pub fn normalize(entries: Vec<Entry>) -> Result<Vec<Entry>, FieldSetError> {
    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            validate_entry(&entry).map_err(|reason| FieldSetError::Invalid { index, reason })?;
            Ok(match entry {
                Entry::Link { name, url } => Entry::Link {
                    name: name.trim().to_string(),
                    url,
                },
                Entry::Separator => Entry::Separator,
            })
        })
        .collect()
}

/// Current field sets (stored or default).
pub async fn load(store: &dyn SettingsStore) -> Result<Vec<Entry>, FieldSetError> {
    Ok(store.settings().await?.field_sets)
}

/// Validate and persist the list. Returns what was written.
pub async fn save(store: &dyn SettingsStore, entries: Vec<Entry>) -> Result<Vec<Entry>, FieldSetError> {
    let entries = normalize(entries)?;
    store
        .set(SettingKey::FieldSets, entries_value(&entries))
        .await?;
    info!("Saved {} field sets", entries.len());
    Ok(entries)
}

/// Replace the stored list with the built-in defaults.
pub async fn load_defaults(store: &dyn SettingsStore) -> Result<Vec<Entry>, FieldSetError> {
    let entries = default_field_sets();
    store
        .set(SettingKey::FieldSets, entries_value(&entries))
        .await?;
    info!("Restored {} default field sets", entries.len());
    Ok(entries)
}

pub fn add_link(entries: &mut Vec<Entry>, name: impl Into<String>, url: impl Into<String>) {
    entries.push(Entry::link(name, url));
}

pub fn add_separator(entries: &mut Vec<Entry>) {
    entries.push(Entry::separator());
}

pub fn remove(entries: &mut Vec<Entry>, index: usize) -> Result<Entry, FieldSetError> {
    if index >= entries.len() {
        return Err(FieldSetError::OutOfRange {
            index,
            len: entries.len(),
        });
    }
    Ok(entries.remove(index))
}

/// Move the entry at `from` so that it ends up at `to`.
pub fn move_entry(entries: &mut Vec<Entry>, from: usize, to: usize) -> Result<(), FieldSetError> {
    let len = entries.len();
    for index in [from, to] {
        if index >= len {
            return Err(FieldSetError::OutOfRange { index, len });
        }
    }
    let entry = entries.remove(from);
    entries.insert(to, entry);
    Ok(())
}

/// Separators first in their original order, then links by
/// case-insensitive trimmed name. Links with a blank name sort as
/// separators.
pub fn sort_alphabetically(entries: &mut [Entry]) {
    fn sort_key(entry: &Entry) -> Option<String> {
        match entry {
            Entry::Link { name, .. } if !name.trim().is_empty() => {
                Some(name.trim().to_lowercase())
            }
            _ => None,
        }
    }

    entries.sort_by(|a, b| match (sort_key(a), sort_key(b)) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => a.cmp(&b),
    });
}

/// Pretty JSON of every setting, merged over defaults.
pub async fn export(store: &dyn SettingsStore) -> Result<String, FieldSetError> {
    let map = store.read(&SettingKey::ALL).await?;
    serde_json::to_string_pretty(&Value::Object(map))
        .map_err(|e| FieldSetError::Import(format!("export encoding failed: {}", e)))
}

/// Extract the field sets from an exported document. Does not save.
pub fn import(json: &str) -> Result<Vec<Entry>, FieldSetError> {
    let document: Value = serde_json::from_str(json)
        .map_err(|e| FieldSetError::Import(format!("not valid JSON: {}", e)))?;

    let Some(field_sets) = document.get(SettingKey::FieldSets.as_str()) else {
        warn!("Imported JSON has no '{}' key", SettingKey::FieldSets);
        return Err(FieldSetError::Import(format!(
            "document has no '{}' key",
            SettingKey::FieldSets
        )));
    };

    serde_json::from_value(field_sets.clone())
        .map_err(|e| FieldSetError::Import(format!("'{}' is malformed: {}", SettingKey::FieldSets, e)))
}

/// Origin used to look up an entry's favicon: the URL's scheme and host with
/// the first label replaced by (or prefixed with) `www`.
pub fn icon_origin(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let host = parsed.host_str()?;

    let labels: Vec<&str> = host.split('.').collect();
    let host = if labels.len() > 2 {
        std::iter::once("www")
            .chain(labels[1..].iter().copied())
            .collect::<Vec<_>>()
            .join(".")
    } else {
        format!("www.{}", host)
    };

    let port = parsed.port().map(|p| format!(":{}", p)).unwrap_or_default();
    Some(format!("{}://{}{}", parsed.scheme(), host, port))
}

#[cfg(test)]
#[path = "fieldsets_tests.rs"]
mod tests;
