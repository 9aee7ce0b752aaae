//! Repository layer: entity-scoped database operations.
//!
//! All public functions are re-exported here so callers can use
//! `crate::db::insert_medication` etc. without caring about the split.

mod medication;
mod note;
mod patient;
mod reaction;

pub use medication::*;
pub use note::*;
pub use patient::*;
pub use reaction::*;

/// Storage format for datetime columns (ISO-8601, second precision).
pub(crate) const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
