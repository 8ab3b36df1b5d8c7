//! Error types for host and store interfaces.

mod host;
mod store;

pub use host::HostError;
pub use store::StoreError;
