//! In-process host implementations.
//!
//! Used by the CLI and by tests. They keep their state in memory and can be
//! told to fail specific calls.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use searchwith_protocols::{
    CreateTab, CreateWindow, HostError, MenuHost, MenuItem, Tab, TabHost, TabId, Window,
    WindowHost, WindowId,
};

/// Context menu kept as a list of items.
#[derive(Debug, Default)]
pub struct HeadlessMenu {
    items: Mutex<Vec<MenuItem>>,
    removals: AtomicUsize,
    fail_removals: AtomicBool,
    fail_creates: Mutex<HashSet<String>>,
}

impl HeadlessMenu {
    pub fn new() -> Self {
        Self::default()
    }

    /// Items currently in the menu, in creation order.
    pub fn items(&self) -> Vec<MenuItem> {
        self.items.lock().clone()
    }

    /// Number of acknowledged `remove_all` calls.
    pub fn removals(&self) -> usize {
        self.removals.load(Ordering::SeqCst)
    }

    /// Make every following `remove_all` fail.
    pub fn fail_removals(&self, fail: bool) {
        self.fail_removals.store(fail, Ordering::SeqCst);
    }

    /// Make creating the item with `id` fail.
    pub fn fail_create(&self, id: impl Into<String>) {
        self.fail_creates.lock().insert(id.into());
    }
}

#[async_trait]
impl MenuHost for HeadlessMenu {
    async fn remove_all(&self) -> Result<(), HostError> {
        if self.fail_removals.load(Ordering::SeqCst) {
            return Err(HostError::call_failed(
                "contextMenus.removeAll",
                "removal rejected",
            ));
        }
        self.items.lock().clear();
        self.removals.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn create(&self, item: MenuItem) -> Result<(), HostError> {
        if self.fail_creates.lock().contains(&item.id) {
            return Err(HostError::call_failed(
                "contextMenus.create",
                format!("item {} rejected", item.id),
            ));
        }

        let mut items = self.items.lock();
        if items.iter().any(|existing| existing.id == item.id) {
            return Err(HostError::call_failed(
                "contextMenus.create",
                format!("duplicate id {}", item.id),
            ));
        }
        items.push(item);
        Ok(())
    }
}

#[derive(Debug)]
struct TabState {
    tabs: Vec<Tab>,
    active: Option<TabId>,
}

/// A single window's tab strip.
#[derive(Debug)]
pub struct HeadlessTabs {
    state: Mutex<TabState>,
    opened: Mutex<Vec<Tab>>,
    next_id: AtomicU64,
    fail_creates: AtomicBool,
}

impl HeadlessTabs {
    /// One blank active tab at index 0.
    pub fn new() -> Self {
        let first = Tab {
            id: TabId(1),
            index: 0,
            url: None,
        };
        Self {
            state: Mutex::new(TabState {
                tabs: vec![first],
                active: Some(TabId(1)),
            }),
            opened: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(2),
            fail_creates: AtomicBool::new(false),
        }
    }

    /// No tabs and nothing active.
    pub fn without_active() -> Self {
        let tabs = Self::new();
        {
            let mut state = tabs.state.lock();
            state.tabs.clear();
            state.active = None;
        }
        tabs
    }

    /// Tabs opened through [`TabHost::create_tab`], oldest first.
    pub fn opened(&self) -> Vec<Tab> {
        self.opened.lock().clone()
    }

    pub fn tabs(&self) -> Vec<Tab> {
        self.state.lock().tabs.clone()
    }

    pub fn fail_creates(&self, fail: bool) {
        self.fail_creates.store(fail, Ordering::SeqCst);
    }
}

impl Default for HeadlessTabs {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TabHost for HeadlessTabs {
    async fn query_active_tab(&self) -> Result<Option<Tab>, HostError> {
        let state = self.state.lock();
        Ok(state
            .active
            .and_then(|id| state.tabs.iter().find(|tab| tab.id == id).cloned()))
    }

    async fn create_tab(&self, props: CreateTab) -> Result<Tab, HostError> {
        if self.fail_creates.load(Ordering::SeqCst) {
            return Err(HostError::call_failed("tabs.create", "tab creation rejected"));
        }

        let mut state = self.state.lock();
        let len = state.tabs.len() as u32;
        let index = props.index.map_or(len, |i| i.min(len));

        for tab in state.tabs.iter_mut().filter(|t| t.index >= index) {
            tab.index += 1;
        }

        let tab = Tab {
            id: TabId(self.next_id.fetch_add(1, Ordering::SeqCst)),
            index,
            url: Some(props.url),
        };
        state.tabs.push(tab.clone());
        state.tabs.sort_by_key(|t| t.index);
        state.active = Some(tab.id);

        self.opened.lock().push(tab.clone());
        Ok(tab)
    }
}

#[derive(Debug)]
struct WindowState {
    windows: Vec<Window>,
    current: WindowId,
    focused: Option<WindowId>,
}

/// Windows tracked by id; the first one is the current window.
#[derive(Debug)]
pub struct HeadlessWindows {
    state: Mutex<WindowState>,
    created: Mutex<Vec<CreateWindow>>,
    next_id: AtomicU64,
}

impl HeadlessWindows {
    /// A current window with the given bounds.
    pub fn new(left: i32, top: i32, width: u32, height: u32) -> Self {
        let current = Window {
            id: WindowId(1),
            left,
            top,
            width,
            height,
        };
        Self {
            state: Mutex::new(WindowState {
                windows: vec![current],
                current: WindowId(1),
                focused: Some(WindowId(1)),
            }),
            created: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(2),
        }
    }

    /// Creation requests received, oldest first.
    pub fn created(&self) -> Vec<CreateWindow> {
        self.created.lock().clone()
    }

    pub fn focused(&self) -> Option<WindowId> {
        self.state.lock().focused
    }

    pub fn exists(&self, id: WindowId) -> bool {
        self.state.lock().windows.iter().any(|w| w.id == id)
    }

    /// Close a window the way a user would. Returns whether it existed.
    pub fn close(&self, id: WindowId) -> bool {
        let mut state = self.state.lock();
        let before = state.windows.len();
        state.windows.retain(|w| w.id != id);
        if state.focused == Some(id) {
            state.focused = None;
        }
        state.windows.len() != before
    }
}

impl Default for HeadlessWindows {
    fn default() -> Self {
        Self::new(0, 0, 1280, 800)
    }
}

#[async_trait]
impl WindowHost for HeadlessWindows {
    async fn current_window(&self) -> Result<Window, HostError> {
        let state = self.state.lock();
        state
            .windows
            .iter()
            .find(|w| w.id == state.current)
            .cloned()
            .ok_or_else(|| HostError::NotFound(format!("window {}", state.current)))
    }

    async fn get_window(&self, id: WindowId) -> Result<Option<Window>, HostError> {
        Ok(self.state.lock().windows.iter().find(|w| w.id == id).cloned())
    }

    async fn focus_window(&self, id: WindowId) -> Result<(), HostError> {
        let mut state = self.state.lock();
        if !state.windows.iter().any(|w| w.id == id) {
            return Err(HostError::NotFound(format!("window {}", id)));
        }
        state.focused = Some(id);
        Ok(())
    }

    async fn create_window(&self, props: CreateWindow) -> Result<Window, HostError> {
        let window = Window {
            id: WindowId(self.next_id.fetch_add(1, Ordering::SeqCst)),
            left: props.left,
            top: props.top,
            width: props.width,
            height: props.height,
        };
        {
            let mut state = self.state.lock();
            state.windows.push(window.clone());
            state.focused = Some(window.id);
        }
        self.created.lock().push(props);
        Ok(window)
    }

    fn resource_url(&self, path: &str) -> String {
        format!("headless://searchwith/{}", path.trim_start_matches('/'))
    }
}
