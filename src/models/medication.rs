use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A committed prescription on the patient record.
///
/// Immutable once created; `override_reason` is set only at creation time,
/// when the prescriber overrode an allergy block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Medication {
    pub id: Uuid,
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    pub prescribing_doctor: String,
    pub date_added: NaiveDateTime,
    pub override_reason: Option<String>,
}

/// A candidate prescription as entered in the form, before any safety check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicationDraft {
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    pub prescribing_doctor: String,
}
