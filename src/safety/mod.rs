//! Drug-safety check engine.
//!
//! Three pieces, evaluated in a fixed order when a prescription is entered:
//! the interaction catalog (static reference data), the pure checkers
//! (interaction + allergy), and the prescription guard that turns their
//! results into a block/override/commit decision. Everything here operates
//! on in-memory lists; persistence belongs to the caller.

pub mod allergy;
pub mod catalog;
pub mod guard;
pub mod interaction;

pub use allergy::check_allergy;
pub use catalog::{InteractionCatalog, InteractionEntry, WarningDetail};
pub use guard::{GuardError, GuardState, PrescriptionGuard};
pub use interaction::{check_interactions, InteractionWarning};

/// Normalize a drug name for comparison: trim surrounding whitespace and
/// lowercase. All catalog keys and membership tests go through this.
pub fn normalize_drug_name(name: &str) -> String {
    name.trim().to_lowercase()
}
