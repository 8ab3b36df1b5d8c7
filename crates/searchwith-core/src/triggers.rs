//! Which settings changes require a menu rebuild.

use serde_json::Value;

use searchwith_protocols::{SettingKey, SettingsChange};

/// A rebuild is needed when the entry lists or the rating flag change, or
/// when the use count crosses the rating threshold in either direction.
pub fn needs_rebuild(change: &SettingsChange, threshold: u64) -> bool {
    if change.contains(SettingKey::FieldSets)
        || change.contains(SettingKey::RatedSets)
        || change.contains(SettingKey::IsRating)
    {
        return true;
    }

    let Some(count) = change.get(SettingKey::HasContext) else {
        return false;
    };
    // Absent means the default, 0.
    let old = count.old_value.as_ref().and_then(Value::as_u64).unwrap_or(0);
    let new = count.new_value.as_ref().and_then(Value::as_u64).unwrap_or(0);
    (old > threshold) != (new > threshold)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_sets_change_triggers() {
        let change = SettingsChange::new().with_change(SettingKey::FieldSets, None, Some(json!([])));
        assert!(needs_rebuild(&change, 1));
    }

    #[test]
    fn test_rating_flag_triggers() {
        let change =
            SettingsChange::new().with_change(SettingKey::IsRating, Some(json!(true)), Some(json!(false)));
        assert!(needs_rebuild(&change, 1));
    }

    #[test]
    fn test_count_below_threshold_does_not_trigger() {
        let change = SettingsChange::new().with_change(SettingKey::HasContext, None, Some(json!(1)));
        assert!(!needs_rebuild(&change, 1));
    }

    #[test]
    fn test_count_crossing_threshold_triggers() {
        let change =
            SettingsChange::new().with_change(SettingKey::HasContext, Some(json!(1)), Some(json!(2)));
        assert!(needs_rebuild(&change, 1));
    }

    #[test]
    fn test_count_reset_triggers() {
        let change =
            SettingsChange::new().with_change(SettingKey::HasContext, Some(json!(5)), Some(json!(0)));
        assert!(needs_rebuild(&change, 1));
    }

    #[test]
    fn test_count_already_past_threshold_does_not_trigger() {
        let change =
            SettingsChange::new().with_change(SettingKey::HasContext, Some(json!(5)), Some(json!(6)));
        assert!(!needs_rebuild(&change, 1));
    }

    #[test]
    fn test_unrelated_keys_do_not_trigger() {
        let change = SettingsChange::new()
            .with_change(SettingKey::InterfaceId, Some(json!(false)), Some(json!(3)))
            .with_change(SettingKey::InstallDate, None, Some(json!(1700000000000u64)));
        assert!(!needs_rebuild(&change, 1));
    }
}
