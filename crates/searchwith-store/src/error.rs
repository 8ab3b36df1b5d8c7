//! Field-set editing errors.

use thiserror::Error;

use searchwith_protocols::StoreError;

#[derive(Debug, Error)]
pub enum FieldSetError {
    #[error("Entry {index} is invalid: {reason}")]
    Invalid { index: usize, reason: String },

    #[error("Index {index} out of range (len {len})")]
    OutOfRange { index: usize, len: usize },

    #[error("Import failed: {0}")]
    Import(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}
