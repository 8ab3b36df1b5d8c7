//! Host context-menu protocol definitions.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::HostError;

/// Page contexts a menu item is shown in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MenuContext {
    Selection,
    Image,
    Link,
    Page,
}

impl MenuContext {
    pub fn as_str(&self) -> &'static str {
        match self {
            MenuContext::Selection => "selection",
            MenuContext::Image => "image",
            MenuContext::Link => "link",
            MenuContext::Page => "page",
        }
    }
}

/// Kind of a rendered menu item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MenuItemKind {
    Normal,
    Separator,
}

/// A menu item as handed to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    /// Position of the entry in the effective list, as a string.
    pub id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(rename = "type")]
    pub kind: MenuItemKind,

    pub contexts: Vec<MenuContext>,
}

impl MenuItem {
    pub fn link(id: impl Into<String>, title: impl Into<String>, contexts: Vec<MenuContext>) -> Self {
        Self {
            id: id.into(),
            title: Some(title.into()),
            kind: MenuItemKind::Normal,
            contexts,
        }
    }

    pub fn separator(id: impl Into<String>, contexts: Vec<MenuContext>) -> Self {
        Self {
            id: id.into(),
            title: None,
            kind: MenuItemKind::Separator,
            contexts,
        }
    }

    pub fn is_separator(&self) -> bool {
        self.kind == MenuItemKind::Separator
    }
}

/// A click on a rendered menu item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuClick {
    #[serde(rename = "menuItemId")]
    pub menu_item_id: String,

    #[serde(rename = "selectionText", default, skip_serializing_if = "Option::is_none")]
    pub selection_text: Option<String>,

    #[serde(rename = "srcUrl", default, skip_serializing_if = "Option::is_none")]
    pub src_url: Option<String>,

    /// Menu generation the clicked item was rendered in, when the host
    /// reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation: Option<u64>,
}

impl MenuClick {
    pub fn new(menu_item_id: impl Into<String>) -> Self {
        Self {
            menu_item_id: menu_item_id.into(),
            ..Default::default()
        }
    }

    pub fn with_selection(mut self, text: impl Into<String>) -> Self {
        self.selection_text = Some(text.into());
        self
    }

    pub fn with_src_url(mut self, url: impl Into<String>) -> Self {
        self.src_url = Some(url.into());
        self
    }

    pub fn with_generation(mut self, generation: u64) -> Self {
        self.generation = Some(generation);
        self
    }

    /// Content to inject into the template. The media source wins over the
    /// selection; empty strings count as absent.
    pub fn content(&self) -> Option<&str> {
        self.src_url
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.selection_text.as_deref().filter(|s| !s.is_empty()))
    }
}

/// Host context-menu API.
#[async_trait]
pub trait MenuHost: Send + Sync {
    /// Remove every item this extension created. Resolves once the host
    /// has acknowledged the removal.
    async fn remove_all(&self) -> Result<(), HostError>;

    /// Create one item.
    async fn create(&self, item: MenuItem) -> Result<(), HostError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_menu_item_wire_shape() {
        let item = MenuItem::link("0", "Bing", vec![MenuContext::Selection, MenuContext::Image]);
        assert_eq!(
            serde_json::to_value(&item).unwrap(),
            json!({"id": "0", "title": "Bing", "type": "normal", "contexts": ["selection", "image"]})
        );

        let sep = MenuItem::separator("1", vec![MenuContext::Selection]);
        assert!(sep.is_separator());
        assert_eq!(
            serde_json::to_value(&sep).unwrap(),
            json!({"id": "1", "type": "separator", "contexts": ["selection"]})
        );
    }

    #[test]
    fn test_click_content_prefers_src_url() {
        let click = MenuClick::new("0")
            .with_selection("cats")
            .with_src_url("http://example.com/img.png");
        assert_eq!(click.content(), Some("http://example.com/img.png"));

        let click = MenuClick::new("0").with_selection("cats");
        assert_eq!(click.content(), Some("cats"));

        let click = MenuClick::new("0").with_src_url("").with_selection("dogs");
        assert_eq!(click.content(), Some("dogs"));

        assert_eq!(MenuClick::new("0").content(), None);
    }

    #[test]
    fn test_click_from_host_json() {
        let click: MenuClick =
            serde_json::from_value(json!({"menuItemId": "3", "selectionText": "rust"})).unwrap();
        assert_eq!(click.menu_item_id, "3");
        assert_eq!(click.selection_text.as_deref(), Some("rust"));
        assert_eq!(click.generation, None);
    }
}
