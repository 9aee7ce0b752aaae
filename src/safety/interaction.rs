use serde::{Deserialize, Serialize};

use super::catalog::InteractionCatalog;
use super::normalize_drug_name;
use crate::models::enums::InteractionSeverity;
use crate::models::Medication;

/// One applicable warning from an interaction check. Not persisted.
///
/// `drug1` is always the candidate being added, in its display casing as
/// typed; `drug2` is the pre-existing medication it conflicts with, in the
/// casing the record holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionWarning {
    pub drug1: String,
    pub drug2: String,
    pub severity: InteractionSeverity,
    pub message: String,
    pub recommendation: String,
}

/// Cross-reference a candidate drug against the patient's current
/// medications and return every applicable warning.
///
/// Closed world: a candidate with no catalog entry never warns, even if it
/// appears in some other drug's conflict set. Warnings come back in
/// medication-list order, one per matching entry; a drug listed twice
/// produces two warnings. Pure; neither input is mutated.
pub fn check_interactions(
    catalog: &InteractionCatalog,
    candidate_name: &str,
    current_medications: &[Medication],
) -> Vec<InteractionWarning> {
    let Some(entry) = catalog.lookup(candidate_name) else {
        return Vec::new();
    };

    let mut warnings = Vec::new();
    for medication in current_medications {
        if let Some(detail) = entry.conflict_with(&normalize_drug_name(&medication.name)) {
            warnings.push(InteractionWarning {
                drug1: candidate_name.to_string(),
                drug2: medication.name.clone(),
                severity: detail.severity.clone(),
                message: detail.message.clone(),
                recommendation: detail.recommendation.clone(),
            });
        }
    }
    warnings
}
