//! # SearchWith Protocols
//!
//! Interface definitions shared by every SearchWith crate.
//! Contains only traits and data types - no implementations.
//!
//! ## Core Traits
//!
//! - [`SettingsStore`] - Persistent key-value settings with change notifications
//! - [`MenuHost`] - Host context-menu API
//! - [`TabHost`] - Host tab API
//! - [`WindowHost`] - Host window API (settings window)

pub mod error;
pub mod menu;
pub mod settings;
pub mod tabs;
pub mod types;
pub mod windows;

pub use error::{HostError, StoreError};
pub use menu::{MenuClick, MenuContext, MenuHost, MenuItem, MenuItemKind};
pub use settings::{
    SettingKey, Settings, SettingsChange, SettingsMap, SettingsStore, ValueChange,
};
pub use tabs::{CreateTab, Tab, TabHost, TabId};
pub use types::*;
pub use windows::{CreateWindow, Window, WindowHost, WindowId, WindowKind};
