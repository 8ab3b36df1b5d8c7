//! Configuration schema definitions.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use searchwith_protocols::MenuContext;

use crate::loader::ConfigLoader;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub menu: MenuConfig,

    #[serde(default)]
    pub links: LinksConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub interface: InterfaceConfig,
}

/// Context-menu configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuConfig {
    /// Uses after which the rated set is appended (strictly greater than).
    #[serde(default = "default_rating_threshold")]
    pub rating_threshold: u64,

    /// Page contexts the items are shown in.
    #[serde(default = "default_contexts")]
    pub contexts: Vec<MenuContext>,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            rating_threshold: default_rating_threshold(),
            contexts: default_contexts(),
        }
    }
}

fn default_rating_threshold() -> u64 {
    1
}

fn default_contexts() -> Vec<MenuContext> {
    vec![MenuContext::Selection, MenuContext::Image]
}

/// Extension's own web pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinksConfig {
    #[serde(default = "default_extension_id")]
    pub extension_id: String,

    /// Web-store listing; `{extension_id}` is replaced with [`Self::extension_id`].
    #[serde(default = "default_webstore")]
    pub webstore: String,

    #[serde(default = "default_homepage")]
    pub homepage: String,
}

impl LinksConfig {
    pub fn webstore_url(&self) -> String {
        self.webstore.replace("{extension_id}", &self.extension_id)
    }

    pub fn feedback_url(&self) -> String {
        format!("{}#Feedback", self.homepage)
    }

    /// Whether `url` points at the web-store listing or the homepage.
    pub fn is_own_page(&self, url: &str) -> bool {
        let webstore = self.webstore_url();
        (!webstore.is_empty() && url.contains(&webstore))
            || (!self.homepage.is_empty() && url.contains(&self.homepage))
    }
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            extension_id: default_extension_id(),
            webstore: default_webstore(),
            homepage: default_homepage(),
        }
    }
}

fn default_extension_id() -> String {
    "searchwith".to_string()
}

fn default_webstore() -> String {
    "https://chromewebstore.google.com/detail/{extension_id}".to_string()
}

fn default_homepage() -> String {
    "https://www.codehemu.com/p/adblock-for-youtube.html".to_string()
}

/// Settings persistence configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// JSON settings document. `~` is expanded.
    #[serde(default = "default_storage_path")]
    pub path: String,
}

impl StorageConfig {
    pub fn resolved_path(&self) -> PathBuf {
        ConfigLoader::expand_path(&self.path)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
        }
    }
}

fn default_storage_path() -> String {
    "~/.searchwith/settings.json".to_string()
}

/// Settings window configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterfaceConfig {
    #[serde(default = "default_interface_width")]
    pub width: u32,

    #[serde(default = "default_interface_height")]
    pub height: u32,

    /// Extension-relative page shown in the settings window.
    #[serde(default = "default_interface_page")]
    pub page: String,
}

impl Default for InterfaceConfig {
    fn default() -> Self {
        Self {
            width: default_interface_width(),
            height: default_interface_height(),
            page: default_interface_page(),
        }
    }
}

fn default_interface_width() -> u32 {
    800
}

fn default_interface_height() -> u32 {
    800
}

fn default_interface_page() -> String {
    "data/options/options.html".to_string()
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
