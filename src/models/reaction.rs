use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::ReactionSeverity;

/// A documented adverse reaction, reported explicitly by the patient or a
/// clinician. Never derived automatically; the list is append-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllergyReaction {
    pub id: Uuid,
    pub drug_name: String,
    pub reaction_type: String,
    pub severity: ReactionSeverity,
    pub date_occurred: NaiveDate,
    pub description: Option<String>,
}
