//! Background runtime: dispatcher plus the store change bridge.
//!
//! ```text
//! SettingsStore ─(broadcast)─► store bridge ─► [settings_changed] ─► Background
//! ```

use std::sync::Arc;

use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use searchwith_protocols::{SettingKey, SettingsChange, SettingsStore};

use crate::background::Background;
use crate::dispatcher::{DispatchHandle, Dispatcher, EventKind, HostEvent};
use crate::error::SyncResult;

/// A running background: event queues, their consumers and the bridge
/// forwarding store changes into them.
pub struct BackgroundRuntime {
    background: Arc<Background>,
    dispatcher: Dispatcher,
    bridge: StoreBridge,
}

impl BackgroundRuntime {
    /// Start dispatching and queue the startup rebuild.
    pub fn start(background: Arc<Background>) -> SyncResult<Self> {
        let dispatcher = Dispatcher::start(background.clone());
        let bridge = StoreBridge::spawn(background.store().as_ref(), dispatcher.handle());

        let runtime = Self {
            background,
            dispatcher,
            bridge,
        };
        runtime.dispatch(HostEvent::Startup)?;
        info!("Background runtime started");
        Ok(runtime)
    }

    pub fn background(&self) -> &Arc<Background> {
        &self.background
    }

    pub fn handle(&self) -> DispatchHandle {
        self.dispatcher.handle()
    }

    pub fn dispatch(&self, event: HostEvent) -> SyncResult<()> {
        self.dispatcher.dispatch(event)
    }

    /// Drain the queues and stop.
    ///
    /// Events that write settings are handled first. The changes they make
    /// are forwarded before the settings queue closes, so a rebuild they
    /// trigger still runs.
    pub async fn shutdown(mut self) {
        let writers: Vec<EventKind> = EventKind::ALL
            .into_iter()
            .filter(|kind| *kind != EventKind::SettingsChanged)
            .collect();
        self.dispatcher.close(&writers).await;
        self.bridge.drain().await;
        self.dispatcher.shutdown().await;
        info!("Background runtime stopped");
    }
}

/// Forwards every store change to the settings queue.
struct StoreBridge {
    stop: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl StoreBridge {
    fn spawn(store: &dyn SettingsStore, handle: DispatchHandle) -> Self {
        let mut changes = store.subscribe();
        let (stop, mut stopped) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            debug!("Store bridge started");
            loop {
                let event = tokio::select! {
                    received = changes.recv() => match received {
                        Ok(changes) => HostEvent::SettingsChanged { changes },
                        Err(RecvError::Lagged(n)) => lagged(n),
                        Err(RecvError::Closed) => {
                            debug!("Settings store closed, stopping bridge");
                            return;
                        }
                    },
                    _ = &mut stopped => break,
                };
                if handle.dispatch(event).is_err() {
                    debug!("Dispatcher closed, stopping store bridge");
                    return;
                }
            }

            // Forward what was written before the stop request.
            loop {
                let event = match changes.try_recv() {
                    Ok(changes) => HostEvent::SettingsChanged { changes },
                    Err(TryRecvError::Lagged(n)) => lagged(n),
                    Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
                };
                if handle.dispatch(event).is_err() {
                    break;
                }
            }
            debug!("Store bridge stopped");
        });

        Self { stop, task }
    }

    /// Forward the changes already broadcast, then stop.
    async fn drain(self) {
        let _ = self.stop.send(());
        if let Err(e) = self.task.await {
            warn!("Store bridge ended abnormally: {}", e);
        }
    }
}

/// The missed changes are unknown; a list change forces a rebuild from
/// current state.
fn lagged(missed: u64) -> HostEvent {
    warn!("Store bridge lagged, missed {} changes", missed);
    HostEvent::SettingsChanged {
        changes: SettingsChange::new().with_change(SettingKey::FieldSets, None, None),
    }
}
