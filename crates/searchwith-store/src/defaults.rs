//! Default settings.

use serde_json::{json, Value};

use searchwith_config::LinksConfig;
use searchwith_protocols::{Entry, SettingKey, SettingsMap};

/// Search shortcuts installed on first run.
pub fn default_field_sets() -> Vec<Entry> {
    vec![
        Entry::link("Google - Exact match", "https://www.google.com/search?q=\"%s\""),
        Entry::link("Google - Images", "https://www.google.com/search?q=%s&tbm=isch"),
        Entry::link("DuckDuckGo", "https://duckduckgo.com/?q=%s"),
        Entry::link("Yahoo", "https://search.yahoo.com/search?p=%s"),
        Entry::link("Bing", "https://www.bing.com/search?q=%s"),
        Entry::separator(),
        Entry::link("Daum (다음)", "https://search.daum.net/search?&q=%s"),
        Entry::link("Naver (네이버)", "https://search.naver.com/search.naver?query=%s"),
        Entry::link("Baidu (百度)", "https://www.baidu.com/s?wd=%s"),
        Entry::link("Yandex (яндекс)", "https://yandex.com/search/?text=%s"),
        Entry::separator(),
        Entry::link("Facebook", "https://www.facebook.com/search?q=%s"),
        Entry::link("YouTube", "https://www.youtube.com/results?search_query=%s"),
        Entry::link("TikTok", "https://www.tiktok.com/search?q=%s"),
        Entry::link("Wikipedia", "https://www.wikipedia.org/w/index.php?search=%s"),
        Entry::separator(),
        Entry::link("Google Maps", "https://www.google.com/maps/search/%s"),
        Entry::link("Yandex Maps", "https://yandex.com/maps?text=%s"),
    ]
}

/// Rating and feedback links appended once the rating gate opens.
pub fn default_rated_sets(links: &LinksConfig) -> Vec<Entry> {
    vec![
        Entry::separator(),
        Entry::link("❤ Rate US", links.webstore_url()),
        Entry::link("💨 Feedback", links.feedback_url()),
    ]
}

/// Full defaults document.
pub fn default_settings(links: &LinksConfig) -> SettingsMap {
    let mut map = SettingsMap::new();
    map.insert(
        SettingKey::FieldSets.as_str().to_string(),
        entries_value(&default_field_sets()),
    );
    map.insert(
        SettingKey::RatedSets.as_str().to_string(),
        entries_value(&default_rated_sets(links)),
    );
    map.insert(SettingKey::IsRating.as_str().to_string(), json!(true));
    map.insert(SettingKey::HasContext.as_str().to_string(), json!(0));
    map.insert(SettingKey::InterfaceId.as_str().to_string(), json!(false));
    map
}

/// Encode entries as a JSON array.
pub fn entries_value(entries: &[Entry]) -> Value {
    Value::Array(
        entries
            .iter()
            .map(|e| serde_json::to_value(e).unwrap_or(Value::Null))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use searchwith_protocols::Settings;

    #[test]
    fn test_default_field_sets_shape() {
        let sets = default_field_sets();
        assert_eq!(sets.len(), 18);
        assert_eq!(sets.iter().filter(|e| e.is_separator()).count(), 3);
        assert!(sets
            .iter()
            .filter(|e| !e.is_separator())
            .all(|e| e.url().is_some_and(|u| u.contains("%s"))));
    }

    #[test]
    fn test_default_rated_sets_lead_with_separator() {
        let links = LinksConfig::default();
        let rated = default_rated_sets(&links);
        assert!(rated[0].is_separator());
        assert_eq!(rated[1].url(), Some(links.webstore_url().as_str()));
        assert_eq!(rated[2].url(), Some(links.feedback_url().as_str()));
    }

    #[test]
    fn test_default_settings_decode() {
        let map = default_settings(&LinksConfig::default());
        let settings = Settings::from_map(&map);
        assert_eq!(settings.field_sets, default_field_sets());
        assert!(settings.is_rating);
        assert_eq!(settings.has_context, 0);
        assert_eq!(settings.interface_id, None);
    }
}
