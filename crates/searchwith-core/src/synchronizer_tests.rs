use super::*;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::{Notify, Semaphore};

use searchwith_protocols::{MenuItemKind, SettingsMap};
use searchwith_store::defaults::entries_value;
use searchwith_store::{default_settings, MemorySettingsStore};

use crate::headless::{HeadlessMenu, HeadlessTabs};

struct Fixture {
    store: Arc<MemorySettingsStore>,
    menu: Arc<HeadlessMenu>,
    tabs: Arc<HeadlessTabs>,
    sync: MenuSynchronizer,
}

fn fixture_with(values: SettingsMap) -> Fixture {
    let config = SyncConfig::default();
    let store = Arc::new(MemorySettingsStore::with_values(
        default_settings(&config.links),
        values,
    ));
    let menu = Arc::new(HeadlessMenu::new());
    let tabs = Arc::new(HeadlessTabs::new());
    let sync = MenuSynchronizer::new(store.clone(), menu.clone(), tabs.clone(), config);
    Fixture {
        store,
        menu,
        tabs,
        sync,
    }
}

fn fixture() -> Fixture {
    fixture_with(SettingsMap::new())
}

fn values(entries: &[Entry], has_context: u64) -> SettingsMap {
    let mut map = SettingsMap::new();
    map.insert("fieldSets".to_string(), entries_value(entries));
    map.insert("hasContext".to_string(), json!(has_context));
    map
}

fn bing_only() -> Vec<Entry> {
    vec![Entry::link("Bing", "https://www.bing.com/search?q=%s")]
}

fn completed(outcome: RebuildOutcome) -> RebuildReport {
    match outcome {
        RebuildOutcome::Completed(report) => report,
        RebuildOutcome::Coalesced => panic!("expected a completed rebuild"),
    }
}

#[tokio::test]
async fn test_rebuild_creates_one_item_per_entry() {
    let f = fixture();
    let report = completed(f.sync.rebuild().await.unwrap());

    let items = f.menu.items();
    assert_eq!(items.len(), 18);
    assert_eq!(report.created, 18);
    assert_eq!(report.generation, 1);

    let ids: Vec<&str> = items.iter().map(|i| i.id.as_str()).collect();
    let expected: Vec<String> = (0..18).map(|i| i.to_string()).collect();
    assert_eq!(ids, expected);

    let separators: Vec<usize> = items
        .iter()
        .enumerate()
        .filter(|(_, item)| item.kind == MenuItemKind::Separator)
        .map(|(i, _)| i)
        .collect();
    assert_eq!(separators, vec![5, 10, 15]);

    assert_eq!(items[0].title.as_deref(), Some("Google - Exact match"));
    assert_eq!(
        items[0].contexts,
        vec![MenuContext::Selection, MenuContext::Image]
    );
}

#[tokio::test]
async fn test_rebuild_is_idempotent() {
    let f = fixture();
    f.sync.rebuild().await.unwrap();
    let first = f.menu.items();

    let report = completed(f.sync.rebuild().await.unwrap());
    assert_eq!(f.menu.items(), first);
    assert_eq!(f.menu.removals(), 2);
    assert_eq!(report.generation, 2);
    assert_eq!(
        f.sync.rendered(),
        Some(RenderedMenu {
            generation: 2,
            len: 18
        })
    );
}

#[tokio::test]
async fn test_rated_set_appended_only_past_threshold() {
    let f = fixture_with(values(&bing_only(), 1));
    f.sync.rebuild().await.unwrap();
    assert_eq!(f.menu.items().len(), 1);

    f.store.set(SettingKey::HasContext, json!(2)).await.unwrap();
    f.sync.rebuild().await.unwrap();

    let items = f.menu.items();
    assert_eq!(items.len(), 4);
    assert!(items[1].is_separator());
    assert_eq!(items[2].title.as_deref(), Some("❤ Rate US"));
    assert_eq!(items[3].title.as_deref(), Some("💨 Feedback"));
}

#[tokio::test]
async fn test_rating_disabled_hides_rated_set() {
    let mut map = values(&bing_only(), 10);
    map.insert("isRating".to_string(), json!(false));
    let f = fixture_with(map);
    f.sync.rebuild().await.unwrap();
    assert_eq!(f.menu.items().len(), 1);
}

#[tokio::test]
async fn test_empty_list_leaves_empty_menu() {
    let f = fixture_with(values(&[], 0));
    let report = completed(f.sync.rebuild().await.unwrap());
    assert!(f.menu.items().is_empty());
    assert_eq!(report.created, 0);
    assert_eq!(f.sync.rendered().map(|r| r.len), Some(0));
}

#[tokio::test]
async fn test_unnamed_entry_skipped_but_keeps_position() {
    let entries = vec![
        Entry::link("A", "https://a.com/?q=%s"),
        Entry::link("", "https://b.com/?q=%s"),
        Entry::link("C", "https://c.com/?q=%s"),
    ];
    let f = fixture_with(values(&entries, 0));
    let report = completed(f.sync.rebuild().await.unwrap());

    assert_eq!(report.skipped, vec![1]);
    let ids: Vec<String> = f.menu.items().into_iter().map(|i| i.id).collect();
    assert_eq!(ids, vec!["0", "2"]);

    let outcome = f
        .sync
        .resolve_and_open(&MenuClick::new("2").with_selection("x"))
        .await
        .unwrap();
    assert_eq!(outcome.url, "https://c.com/?q=x");
}

#[tokio::test]
async fn test_removal_failure_keeps_old_menu() {
    let f = fixture();
    f.sync.rebuild().await.unwrap();
    let before = f.menu.items();

    f.menu.fail_removals(true);
    let err = f.sync.rebuild().await.unwrap_err();
    assert!(matches!(
        err,
        SyncError::HostCallFailed {
            operation: "contextMenus.removeAll",
            ..
        }
    ));
    assert_eq!(f.menu.items(), before);
    assert_eq!(f.sync.generation(), 1);

    // A later trigger recovers.
    f.menu.fail_removals(false);
    assert!(f.sync.rebuild().await.is_ok());
}

#[tokio::test]
async fn test_item_failure_does_not_stop_rebuild() {
    let f = fixture();
    f.menu.fail_create("3");
    let report = completed(f.sync.rebuild().await.unwrap());
    assert_eq!(report.failed, vec![3]);
    assert_eq!(report.created, 17);
    assert!(f.menu.items().iter().all(|i| i.id != "3"));
}

#[tokio::test]
async fn test_click_opens_resolved_url_next_to_active_tab() {
    let f = fixture_with(values(&bing_only(), 0));
    f.sync.rebuild().await.unwrap();

    let outcome = f
        .sync
        .resolve_and_open(&MenuClick::new("0").with_selection("cats"))
        .await
        .unwrap();

    assert_eq!(outcome.url, "https://www.bing.com/search?q=cats");
    assert_eq!(outcome.tab.index, 1);
    assert_eq!(outcome.use_count, Some(1));
    assert!(!outcome.rating_dismissed);

    let opened = f.tabs.opened();
    assert_eq!(opened.len(), 1);
    assert_eq!(opened[0].url.as_deref(), Some("https://www.bing.com/search?q=cats"));
    assert_eq!(f.store.settings().await.unwrap().has_context, 1);
}

#[tokio::test]
async fn test_click_prefers_image_source() {
    let entries = vec![Entry::link(
        "Bing",
        "https://www.bing.com/images/search?q=imgurl:%s&view=detailv2&iss=sbi",
    )];
    let f = fixture_with(values(&entries, 0));
    f.sync.rebuild().await.unwrap();

    let click = MenuClick::new("0")
        .with_selection("ignored")
        .with_src_url("http://x.com/a b.png");
    let outcome = f.sync.resolve_and_open(&click).await.unwrap();
    assert_eq!(
        outcome.url,
        "https://www.bing.com/images/search?q=imgurl:http%3A%2F%2Fx.com%2Fa%20b.png&view=detailv2&iss=sbi"
    );
}

#[tokio::test]
async fn test_click_without_content_clears_placeholder() {
    let f = fixture_with(values(&bing_only(), 0));
    f.sync.rebuild().await.unwrap();
    let outcome = f.sync.resolve_and_open(&MenuClick::new("0")).await.unwrap();
    assert_eq!(outcome.url, "https://www.bing.com/search?q=");
}

#[tokio::test]
async fn test_count_stops_past_threshold() {
    let f = fixture_with(values(&bing_only(), 1));
    f.sync.rebuild().await.unwrap();

    let first = f
        .sync
        .resolve_and_open(&MenuClick::new("0").with_selection("a"))
        .await
        .unwrap();
    assert_eq!(first.use_count, Some(2));

    let second = f
        .sync
        .resolve_and_open(&MenuClick::new("0").with_selection("b"))
        .await
        .unwrap();
    assert_eq!(second.use_count, None);
    assert_eq!(f.store.settings().await.unwrap().has_context, 2);
}

#[tokio::test]
async fn test_out_of_range_click_is_stale() {
    let f = fixture();
    f.sync.rebuild().await.unwrap();
    let before = f.store.stored().await;

    let err = f
        .sync
        .resolve_and_open(&MenuClick::new("99").with_selection("x"))
        .await
        .unwrap_err();
    assert!(err.is_stale());
    assert!(f.tabs.opened().is_empty());
    assert_eq!(f.store.stored().await, before);
}

#[tokio::test]
async fn test_non_numeric_id_is_stale() {
    let f = fixture();
    f.sync.rebuild().await.unwrap();
    let err = f
        .sync
        .resolve_and_open(&MenuClick::new("bing"))
        .await
        .unwrap_err();
    assert!(err.is_stale());
}

#[tokio::test]
async fn test_separator_click_is_stale() {
    let f = fixture();
    f.sync.rebuild().await.unwrap();
    let err = f
        .sync
        .resolve_and_open(&MenuClick::new("5"))
        .await
        .unwrap_err();
    assert!(err.is_stale());
    assert!(f.tabs.opened().is_empty());
}

#[tokio::test]
async fn test_generation_mismatch_is_stale() {
    let f = fixture();
    f.sync.rebuild().await.unwrap();
    f.sync.rebuild().await.unwrap();

    let err = f
        .sync
        .resolve_and_open(&MenuClick::new("0").with_selection("x").with_generation(1))
        .await
        .unwrap_err();
    assert!(err.is_stale());

    let ok = f
        .sync
        .resolve_and_open(&MenuClick::new("0").with_selection("x").with_generation(2))
        .await;
    assert!(ok.is_ok());
}

#[tokio::test]
async fn test_rating_link_dismisses_prompt() {
    let f = fixture_with(values(&bing_only(), 2));
    f.sync.rebuild().await.unwrap();
    assert_eq!(f.menu.items().len(), 4);

    let outcome = f
        .sync
        .resolve_and_open(&MenuClick::new("2").with_selection("cats"))
        .await
        .unwrap();

    assert!(outcome.rating_dismissed);
    assert_eq!(outcome.url, f.sync.config().links.webstore_url());
    assert_eq!(outcome.use_count, None);

    let settings = f.store.settings().await.unwrap();
    assert!(!settings.is_rating);
    assert_eq!(settings.has_context, 2);
    assert_eq!(f.tabs.opened().len(), 1);
}

#[tokio::test]
async fn test_homepage_links_do_not_count_as_use() {
    let links = SyncConfig::default().links;
    let entries = vec![
        Entry::link("Home", links.homepage.clone()),
        Entry::link("Feedback", links.feedback_url()),
    ];
    let f = fixture_with(values(&entries, 0));
    f.sync.rebuild().await.unwrap();
    assert_eq!(f.menu.items().len(), 2);

    for id in ["0", "1"] {
        let outcome = f
            .sync
            .resolve_and_open(&MenuClick::new(id).with_selection("cats"))
            .await
            .unwrap();
        assert!(outcome.rating_dismissed);
        assert_eq!(outcome.use_count, None);
    }

    let opened: Vec<Option<String>> = f.tabs.opened().into_iter().map(|t| t.url).collect();
    assert_eq!(opened, vec![Some(links.homepage.clone()), Some(links.feedback_url())]);

    let settings = f.store.settings().await.unwrap();
    assert_eq!(settings.has_context, 0);
    assert!(!settings.is_rating);
}

#[tokio::test]
async fn test_missing_active_tab_fails_click() {
    let config = SyncConfig::default();
    let store = Arc::new(MemorySettingsStore::new(default_settings(&config.links)));
    let sync = MenuSynchronizer::new(
        store.clone(),
        Arc::new(HeadlessMenu::new()),
        Arc::new(HeadlessTabs::without_active()),
        config,
    );
    sync.rebuild().await.unwrap();

    let err = sync
        .resolve_and_open(&MenuClick::new("0").with_selection("x"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        SyncError::HostCallFailed {
            operation: "tabs.query",
            ..
        }
    ));
    assert_eq!(store.settings().await.unwrap().has_context, 0);
}

#[tokio::test]
async fn test_tab_creation_failure_does_not_count() {
    let f = fixture_with(values(&bing_only(), 0));
    f.sync.rebuild().await.unwrap();
    f.tabs.fail_creates(true);

    let err = f
        .sync
        .resolve_and_open(&MenuClick::new("0").with_selection("x"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        SyncError::HostCallFailed {
            operation: "tabs.create",
            ..
        }
    ));
    assert_eq!(f.store.settings().await.unwrap().has_context, 0);
}

/// Menu whose removals block until released.
struct BlockingMenu {
    inner: HeadlessMenu,
    entered: Notify,
    release: Semaphore,
}

#[async_trait]
impl MenuHost for BlockingMenu {
    async fn remove_all(&self) -> Result<(), HostError> {
        self.entered.notify_one();
        let permit = self
            .release
            .acquire()
            .await
            .map_err(|e| HostError::Unavailable(e.to_string()))?;
        permit.forget();
        self.inner.remove_all().await
    }

    async fn create(&self, item: MenuItem) -> Result<(), HostError> {
        self.inner.create(item).await
    }
}

#[tokio::test]
async fn test_overlapping_rebuilds_coalesce() {
    let config = SyncConfig::default();
    let store = Arc::new(MemorySettingsStore::new(default_settings(&config.links)));
    let menu = Arc::new(BlockingMenu {
        inner: HeadlessMenu::new(),
        entered: Notify::new(),
        release: Semaphore::new(0),
    });
    let sync = Arc::new(MenuSynchronizer::new(
        store,
        menu.clone(),
        Arc::new(HeadlessTabs::new()),
        config,
    ));

    let running = tokio::spawn({
        let sync = sync.clone();
        async move { sync.rebuild().await }
    });
    menu.entered.notified().await;

    assert_eq!(sync.rebuild().await.unwrap(), RebuildOutcome::Coalesced);
    assert_eq!(sync.rebuild().await.unwrap(), RebuildOutcome::Coalesced);

    menu.release.add_permits(2);
    let report = completed(running.await.unwrap().unwrap());

    // Three requests, two rounds: the running one plus one follow-up.
    assert_eq!(menu.inner.removals(), 2);
    assert_eq!(report.generation, 2);
    assert_eq!(menu.inner.items().len(), 18);
}

#[tokio::test]
async fn test_rendered_kept_until_removal_acknowledged() {
    let config = SyncConfig::default();
    let store = Arc::new(MemorySettingsStore::new(default_settings(&config.links)));
    let menu = Arc::new(BlockingMenu {
        inner: HeadlessMenu::new(),
        entered: Notify::new(),
        release: Semaphore::new(1),
    });
    let sync = Arc::new(MenuSynchronizer::new(
        store,
        menu.clone(),
        Arc::new(HeadlessTabs::new()),
        config,
    ));
    sync.rebuild().await.unwrap();
    assert!(sync.rendered().is_some());
    // Consume the notification left by the first rebuild.
    menu.entered.notified().await;

    let running = tokio::spawn({
        let sync = sync.clone();
        async move { sync.rebuild().await }
    });
    menu.entered.notified().await;
    // Removal not yet acknowledged: the old menu still stands.
    assert_eq!(sync.rendered().map(|r| r.generation), Some(1));

    menu.release.add_permits(1);
    running.await.unwrap().unwrap();
    assert_eq!(sync.rendered().map(|r| r.generation), Some(2));
}

#[tokio::test]
async fn test_effective_entries_follow_store() {
    let f = fixture();
    assert_eq!(f.sync.effective_entries().await.unwrap().len(), 18);
    f.store
        .set(SettingKey::FieldSets, Value::Array(vec![]))
        .await
        .unwrap();
    assert!(f.sync.effective_entries().await.unwrap().is_empty());
}
