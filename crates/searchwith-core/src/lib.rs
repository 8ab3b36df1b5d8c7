//! # SearchWith Core
//!
//! Keeps the host context menu in step with the persisted field sets and
//! turns menu clicks into opened tabs.
//!
//! ## Components
//!
//! - [`MenuSynchronizer`] - Rebuilds the menu and resolves clicks
//! - [`RebuildGate`] - Coalesces overlapping rebuild requests
//! - [`Dispatcher`] - Named event kinds, one sequential queue each
//! - [`Background`] - Event handler wiring synchronizer, lifecycle and
//!   settings window together
//! - [`BackgroundRuntime`] - Dispatcher plus the store change bridge
//! - Headless host implementations for tests and the CLI
//!
//! ## Flow
//!
//! ```text
//! SettingsStore.write ─► SettingsChange ─► StoreBridge ─► Dispatcher ─► Background
//!                                                                        │
//! host menu click ───────────────────────► Dispatcher ──────────────────┤
//!                                                                        ▼
//!                                                   MenuSynchronizer.rebuild / resolve_and_open
//! ```

pub mod background;
pub mod dispatcher;
pub mod effective;
pub mod error;
pub mod gate;
pub mod headless;
pub mod interface;
pub mod lifecycle;
pub mod runtime;
pub mod synchronizer;
pub mod template;
pub mod triggers;

pub use background::{Background, BackgroundBuilder};
pub use dispatcher::{DispatchHandle, Dispatcher, EventHandler, EventKind, HostEvent};
pub use effective::effective_list;
pub use error::{SyncError, SyncResult};
pub use gate::{GatePass, RebuildGate};
pub use headless::{HeadlessMenu, HeadlessTabs, HeadlessWindows};
pub use interface::{InterfaceOutcome, InterfaceWindow};
pub use lifecycle::{InstallReason, LifecycleRecorder};
pub use runtime::BackgroundRuntime;
pub use synchronizer::{
    ClickOutcome, MenuSynchronizer, RebuildOutcome, RebuildReport, RenderedMenu, SyncConfig,
};
pub use template::resolve_url;
pub use triggers::needs_rebuild;
