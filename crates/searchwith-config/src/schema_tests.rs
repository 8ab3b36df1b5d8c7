use super::*;

#[test]
fn test_default_config() {
    let config = Config::default();
    assert_eq!(config.menu.rating_threshold, 1);
    assert_eq!(
        config.menu.contexts,
        vec![MenuContext::Selection, MenuContext::Image]
    );
    assert_eq!(config.interface.width, 800);
    assert_eq!(config.interface.height, 800);
    assert_eq!(config.interface.page, "data/options/options.html");
}

#[test]
fn test_webstore_url_substitutes_extension_id() {
    let links = LinksConfig {
        extension_id: "abc123".to_string(),
        ..Default::default()
    };
    assert_eq!(
        links.webstore_url(),
        "https://chromewebstore.google.com/detail/abc123"
    );
}

#[test]
fn test_feedback_url() {
    let links = LinksConfig::default();
    assert!(links.feedback_url().ends_with("#Feedback"));
    assert!(links.feedback_url().starts_with(&links.homepage));
}

#[test]
fn test_is_own_page() {
    let links = LinksConfig::default();
    assert!(links.is_own_page(&links.webstore_url()));
    assert!(links.is_own_page(&links.feedback_url()));
    assert!(!links.is_own_page("https://www.bing.com/search?q=%s"));
}

#[test]
fn test_is_own_page_ignores_empty_links() {
    let links = LinksConfig {
        extension_id: String::new(),
        webstore: String::new(),
        homepage: String::new(),
    };
    assert!(!links.is_own_page("https://anything.example"));
}

#[test]
fn test_storage_path_expands_tilde() {
    let storage = StorageConfig::default();
    let path = storage.resolved_path();
    assert!(!path.to_string_lossy().starts_with('~'));
    assert!(path.ends_with("settings.json"));
}

#[test]
fn test_config_serialization_round_trip() {
    let config = Config::default();
    let text = toml::to_string(&config).unwrap();
    let parsed: Config = toml::from_str(&text).unwrap();
    assert_eq!(parsed.menu.rating_threshold, config.menu.rating_threshold);
    assert_eq!(parsed.links.homepage, config.links.homepage);
}
