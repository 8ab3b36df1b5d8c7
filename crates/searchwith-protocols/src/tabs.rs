//! Host tab protocol definitions.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::HostError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(pub u64);

/// A browser tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tab {
    pub id: TabId,
    /// Zero-based position within its window.
    pub index: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Properties for a new tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTab {
    pub url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,

    #[serde(rename = "openerTabId", default, skip_serializing_if = "Option::is_none")]
    pub opener_tab_id: Option<TabId>,
}

impl CreateTab {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            index: None,
            opener_tab_id: None,
        }
    }

    /// Place the new tab right after `opener` and record it as the opener.
    pub fn next_to(url: impl Into<String>, opener: &Tab) -> Self {
        Self {
            url: url.into(),
            index: Some(opener.index + 1),
            opener_tab_id: Some(opener.id),
        }
    }
}

/// Host tab API.
#[async_trait]
pub trait TabHost: Send + Sync {
    /// The active tab of the current window, if any.
    async fn query_active_tab(&self) -> Result<Option<Tab>, HostError>;

    async fn create_tab(&self, props: CreateTab) -> Result<Tab, HostError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_to_places_after_opener() {
        let opener = Tab {
            id: TabId(9),
            index: 4,
            url: None,
        };
        let props = CreateTab::next_to("https://x.com", &opener);
        assert_eq!(props.index, Some(5));
        assert_eq!(props.opener_tab_id, Some(TabId(9)));
    }

    #[test]
    fn test_create_tab_wire_shape() {
        let props = CreateTab::new("https://x.com");
        let value = serde_json::to_value(&props).unwrap();
        assert_eq!(value, serde_json::json!({"url": "https://x.com"}));
    }
}
