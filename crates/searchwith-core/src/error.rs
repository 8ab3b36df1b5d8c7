//! Error types for menu synchronization and event handling.

use thiserror::Error;

use searchwith_protocols::{HostError, StoreError};

/// Errors scoped to a single event.
#[derive(Debug, Error)]
pub enum SyncError {
    /// A required host capability is missing.
    #[error("Host API unavailable: {0}")]
    HostApiUnavailable(String),

    /// One host call was rejected.
    #[error("Host call {operation} failed: {source}")]
    HostCallFailed {
        operation: &'static str,
        #[source]
        source: HostError,
    },

    /// A menu item or window id no longer refers to anything.
    #[error("Stale reference: {0}")]
    StaleReference(String),

    /// Settings read or write failed.
    #[error("Settings store error: {0}")]
    Store(#[from] StoreError),

    /// The event queue for a kind is gone.
    #[error("Event queue closed: {0}")]
    QueueClosed(String),
}

impl SyncError {
    pub fn host(operation: &'static str, source: HostError) -> Self {
        Self::HostCallFailed { operation, source }
    }

    /// Stale references are expected after rebuilds and only warrant a warning.
    pub fn is_stale(&self) -> bool {
        matches!(self, Self::StaleReference(_))
    }
}

/// Result type for synchronizer operations.
pub type SyncResult<T> = Result<T, SyncError>;
