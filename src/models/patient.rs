use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The single patient profile this record belongs to.
///
/// `conditions` and `allergies` are free-text lists (stored as JSON arrays);
/// the allergy names here are the coarse emergency-card list, distinct from
/// the structured `AllergyReaction` records the safety check runs against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientProfile {
    pub name: String,
    pub age: u32,
    pub blood_group: String,
    pub conditions: Vec<String>,
    pub allergies: Vec<String>,
}

/// A clinician note attached to the record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClinicalNote {
    pub id: Uuid,
    pub content: String,
    pub doctor: String,
    pub date: NaiveDateTime,
}
