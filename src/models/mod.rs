pub mod enums;
pub mod medication;
pub mod patient;
pub mod reaction;

pub use medication::{Medication, MedicationDraft};
pub use patient::{ClinicalNote, PatientProfile};
pub use reaction::AllergyReaction;
