//! Host event dispatch.
//!
//! Every [`EventKind`] gets its own unbounded queue and a single consumer
//! task, so events of one kind are handled strictly in arrival order while
//! different kinds proceed independently.
//!
//! ```text
//! DispatchHandle.dispatch(event)
//!        │
//!        ├─► [startup]          ─► worker ─► EventHandler.handle
//!        ├─► [settings_changed] ─► worker ─► EventHandler.handle
//!        └─► [menu_clicked]     ─► worker ─► EventHandler.handle
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use searchwith_protocols::{MenuClick, SettingsChange, WindowId};

use crate::error::{SyncError, SyncResult};
use crate::lifecycle::InstallReason;

/// An event delivered by the host.
///
/// Serialized with a `type` tag, e.g.
/// `{"type": "menu_clicked", "menuItemId": "4", "selectionText": "cats"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostEvent {
    /// The browser started with the extension loaded.
    Startup,
    /// The extension was installed or updated.
    Installed {
        reason: InstallReason,
        #[serde(default)]
        version: Option<String>,
    },
    /// The settings store reported a write.
    SettingsChanged { changes: SettingsChange },
    MenuClicked(MenuClick),
    /// The toolbar action was clicked.
    ActionClicked,
    WindowRemoved { window_id: WindowId },
}

impl HostEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            HostEvent::Startup => EventKind::Startup,
            HostEvent::Installed { .. } => EventKind::Installed,
            HostEvent::SettingsChanged { .. } => EventKind::SettingsChanged,
            HostEvent::MenuClicked(_) => EventKind::MenuClicked,
            HostEvent::ActionClicked => EventKind::ActionClicked,
            HostEvent::WindowRemoved { .. } => EventKind::WindowRemoved,
        }
    }
}

/// Queue an event is handled on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Startup,
    Installed,
    SettingsChanged,
    MenuClicked,
    ActionClicked,
    WindowRemoved,
}

impl EventKind {
    pub const ALL: [EventKind; 6] = [
        EventKind::Startup,
        EventKind::Installed,
        EventKind::SettingsChanged,
        EventKind::MenuClicked,
        EventKind::ActionClicked,
        EventKind::WindowRemoved,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Startup => "startup",
            EventKind::Installed => "installed",
            EventKind::SettingsChanged => "settings_changed",
            EventKind::MenuClicked => "menu_clicked",
            EventKind::ActionClicked => "action_clicked",
            EventKind::WindowRemoved => "window_removed",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Consumer of dispatched events.
///
/// Errors are the handler's to report; nothing propagates back to the
/// dispatcher.
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle(&self, event: HostEvent);
}

type Queues = HashMap<EventKind, mpsc::UnboundedSender<HostEvent>>;

/// Cloneable sending side of a [`Dispatcher`].
#[derive(Clone)]
pub struct DispatchHandle {
    queues: Arc<RwLock<Option<Queues>>>,
}

impl DispatchHandle {
    /// Enqueue an event on its kind's queue.
    pub fn dispatch(&self, event: HostEvent) -> SyncResult<()> {
        let kind = event.kind();
        let queues = self.queues.read();
        let sender = queues
            .as_ref()
            .and_then(|q| q.get(&kind))
            .ok_or_else(|| SyncError::QueueClosed(kind.to_string()))?;

        debug!("Dispatching {} event", kind);
        sender
            .send(event)
            .map_err(|_| SyncError::QueueClosed(kind.to_string()))
    }

    pub fn is_closed(&self) -> bool {
        self.queues.read().is_none()
    }
}

/// Owns the per-kind consumer tasks.
pub struct Dispatcher {
    handle: DispatchHandle,
    workers: Vec<(EventKind, JoinHandle<()>)>,
}

impl Dispatcher {
    /// Spawn one consumer per event kind.
    pub fn start(handler: Arc<dyn EventHandler>) -> Self {
        let mut queues = Queues::new();
        let mut workers = Vec::with_capacity(EventKind::ALL.len());

        for kind in EventKind::ALL {
            let (tx, mut rx) = mpsc::unbounded_channel::<HostEvent>();
            queues.insert(kind, tx);

            let handler = handler.clone();
            let worker = tokio::spawn(async move {
                debug!("Event worker started for: {}", kind);
                while let Some(event) = rx.recv().await {
                    handler.handle(event).await;
                }
                debug!("Event worker for {} stopped", kind);
            });
            workers.push((kind, worker));
        }

        info!("Dispatcher started with {} event queues", workers.len());
        Self {
            handle: DispatchHandle {
                queues: Arc::new(RwLock::new(Some(queues))),
            },
            workers,
        }
    }

    pub fn handle(&self) -> DispatchHandle {
        self.handle.clone()
    }

    pub fn dispatch(&self, event: HostEvent) -> SyncResult<()> {
        self.handle.dispatch(event)
    }

    /// Close the queues of `kinds` and wait until their queued events are
    /// handled. Other kinds keep accepting events.
    pub async fn close(&mut self, kinds: &[EventKind]) {
        if let Some(queues) = self.handle.queues.write().as_mut() {
            for kind in kinds {
                queues.remove(kind);
            }
        }

        let (closing, running): (Vec<_>, Vec<_>) = std::mem::take(&mut self.workers)
            .into_iter()
            .partition(|(kind, _)| kinds.contains(kind));
        self.workers = running;
        join_workers(closing).await;
    }

    /// Close every queue, then wait for already queued events to be handled.
    pub async fn shutdown(self) {
        // Dropping the senders ends each worker once its queue is drained.
        self.handle.queues.write().take();
        join_workers(self.workers).await;
        info!("Dispatcher stopped");
    }
}

async fn join_workers(workers: Vec<(EventKind, JoinHandle<()>)>) {
    for (kind, worker) in workers {
        if let Err(e) = worker.await {
            warn!("Event worker for {} ended abnormally: {}", kind, e);
        }
    }
}
