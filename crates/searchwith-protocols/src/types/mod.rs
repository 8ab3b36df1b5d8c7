//! Shared data types.

mod entry;
mod rating;

pub use entry::{Entry, SEPARATOR_NAME, URL_PLACEHOLDER};
pub use rating::RatingGate;
