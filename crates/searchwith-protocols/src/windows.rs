//! Host window protocol definitions.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::HostError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowId(pub u64);

impl std::fmt::Display for WindowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowKind {
    Normal,
    Popup,
}

/// A browser window and its bounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    pub id: WindowId,
    pub left: i32,
    pub top: i32,
    pub width: u32,
    pub height: u32,
}

/// Properties for a new window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateWindow {
    pub url: String,
    #[serde(rename = "type")]
    pub kind: WindowKind,
    pub width: u32,
    pub height: u32,
    pub left: i32,
    pub top: i32,
}

/// Host window API.
#[async_trait]
pub trait WindowHost: Send + Sync {
    /// The window the user is currently in.
    async fn current_window(&self) -> Result<Window, HostError>;

    /// Look up a window. `Ok(None)` when it no longer exists.
    async fn get_window(&self, id: WindowId) -> Result<Option<Window>, HostError>;

    async fn focus_window(&self, id: WindowId) -> Result<(), HostError>;

    async fn create_window(&self, props: CreateWindow) -> Result<Window, HostError>;

    /// Absolute URL of a page bundled with the extension.
    fn resource_url(&self, path: &str) -> String;
}
