//! Settings document operations shared by the store backends.

use serde_json::Value;

use searchwith_protocols::{SettingKey, SettingsChange, SettingsMap, ValueChange};

/// Stored values for `keys`, merged over `defaults`.
pub fn merged_read(stored: &SettingsMap, defaults: &SettingsMap, keys: &[SettingKey]) -> SettingsMap {
    let mut out = SettingsMap::new();
    for key in keys {
        let name = key.as_str();
        if let Some(value) = stored.get(name).or_else(|| defaults.get(name)) {
            out.insert(name.to_string(), value.clone());
        }
    }
    out
}

/// Apply a partial write to `stored`, returning what actually changed.
///
/// Keys whose new value equals the stored one are not reported.
pub fn apply_write(stored: &mut SettingsMap, values: SettingsMap) -> SettingsChange {
    let mut change = SettingsChange::new();
    for (name, new_value) in values {
        let old_value = stored.get(&name).cloned();
        if old_value.as_ref() == Some(&new_value) {
            continue;
        }
        stored.insert(name.clone(), new_value.clone());
        change.changes.insert(
            name,
            ValueChange {
                old_value,
                new_value: Some(new_value),
            },
        );
    }
    change
}

/// Parse a persisted document; anything but a JSON object is rejected.
pub fn parse_document(content: &str) -> Result<SettingsMap, searchwith_protocols::StoreError> {
    match serde_json::from_str::<Value>(content)? {
        Value::Object(map) => Ok(map),
        other => Err(searchwith_protocols::StoreError::InvalidValue {
            key: "document".to_string(),
            message: format!("expected JSON object, found {}", type_name(&other)),
        }),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
