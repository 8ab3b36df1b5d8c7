//! # SearchWith Store
//!
//! Settings persistence for SearchWith.
//!
//! ## Features
//!
//! - Defaults merged under every read
//! - Change broadcast after every effective write
//! - In-memory and JSON-file backends
//! - Field-set editing: validation, sorting, import and export

pub mod defaults;
pub mod document;
pub mod error;
pub mod fieldsets;
pub mod file;
pub mod memory;

pub use defaults::{default_field_sets, default_rated_sets, default_settings};
pub use error::FieldSetError;
pub use file::FileSettingsStore;
pub use memory::MemorySettingsStore;
