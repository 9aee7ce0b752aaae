use chrono::Timelike;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::allergy::check_allergy;
use super::catalog::InteractionCatalog;
use super::interaction::{check_interactions, InteractionWarning};
use crate::models::{AllergyReaction, Medication, MedicationDraft};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GuardError {
    /// Candidate rejected before any check runs; no attempt is created.
    #[error("required field missing: {0}")]
    MissingField(&'static str),

    /// Allergy override attempted without justification text. The attempt
    /// stays blocked.
    #[error("override justification must not be empty")]
    JustificationRequired,

    #[error("no allergy block is pending")]
    NotBlockedByAllergy,

    #[error("no interaction block is pending")]
    NotBlockedByInteraction,
}

/// Where a single add-medication attempt stands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum GuardState {
    /// Validated candidate, checks not yet run.
    Draft,
    /// The candidate matches a documented adverse reaction. The only way
    /// forward is an explicit override carrying a justification.
    BlockedAllergy { reaction: AllergyReaction },
    /// The candidate conflicts with current medications. The only way
    /// forward is an explicit force-add; no justification is recorded.
    BlockedInteraction { warnings: Vec<InteractionWarning> },
    /// Terminal: the medication value ready to append to the record.
    Committed { medication: Medication },
}

/// One add-medication attempt: validates the candidate, runs both safety
/// checks in strict precedence order (allergy first, preempting the
/// interaction check), and tracks the explicit operator actions that may
/// resolve a block.
#[derive(Debug, Clone)]
pub struct PrescriptionGuard {
    draft: MedicationDraft,
    state: GuardState,
}

impl PrescriptionGuard {
    /// Validate the candidate and run the checks against the current record
    /// lists. Returns the guard in a blocked or committed state; validation
    /// failure means no attempt was created at all.
    pub fn evaluate(
        catalog: &InteractionCatalog,
        draft: MedicationDraft,
        current_medications: &[Medication],
        reactions: &[AllergyReaction],
    ) -> Result<Self, GuardError> {
        validate_draft(&draft)?;
        let mut guard = Self {
            draft,
            state: GuardState::Draft,
        };

        // Allergy check always precedes and can preempt the interaction check.
        if let Some(reaction) = check_allergy(&guard.draft.name, reactions) {
            tracing::warn!(
                drug = %guard.draft.name,
                severity = reaction.severity.as_str(),
                "prescription blocked: documented adverse reaction"
            );
            guard.state = GuardState::BlockedAllergy {
                reaction: reaction.clone(),
            };
            return Ok(guard);
        }

        let warnings = check_interactions(catalog, &guard.draft.name, current_medications);
        if !warnings.is_empty() {
            tracing::warn!(
                drug = %guard.draft.name,
                count = warnings.len(),
                "prescription blocked: known drug interactions"
            );
            guard.state = GuardState::BlockedInteraction { warnings };
            return Ok(guard);
        }

        guard.commit(None);
        Ok(guard)
    }

    /// Resolve an allergy block with an explicit justification.
    ///
    /// The justification must be non-empty; an empty one is rejected and the
    /// attempt stays blocked. On success the attempt commits directly; the
    /// interaction check is NOT run on this path.
    pub fn override_allergy(&mut self, justification: &str) -> Result<Medication, GuardError> {
        if !matches!(self.state, GuardState::BlockedAllergy { .. }) {
            return Err(GuardError::NotBlockedByAllergy);
        }
        if justification.trim().is_empty() {
            return Err(GuardError::JustificationRequired);
        }
        tracing::warn!(drug = %self.draft.name, "allergy block overridden");
        Ok(self.commit(Some(justification.to_string())))
    }

    /// Resolve an interaction block. No justification required and none is
    /// recorded, unlike the allergy override.
    pub fn force_add(&mut self) -> Result<Medication, GuardError> {
        if !matches!(self.state, GuardState::BlockedInteraction { .. }) {
            return Err(GuardError::NotBlockedByInteraction);
        }
        tracing::warn!(drug = %self.draft.name, "interaction block force-added");
        Ok(self.commit(None))
    }

    pub fn state(&self) -> &GuardState {
        &self.state
    }

    pub fn draft(&self) -> &MedicationDraft {
        &self.draft
    }

    /// The committed medication, once the attempt reached Committed.
    pub fn committed(&self) -> Option<&Medication> {
        match &self.state {
            GuardState::Committed { medication } => Some(medication),
            _ => None,
        }
    }

    pub fn into_committed(self) -> Option<Medication> {
        match self.state {
            GuardState::Committed { medication } => Some(medication),
            _ => None,
        }
    }

    fn commit(&mut self, override_reason: Option<String>) -> Medication {
        // Second precision, matching the record store's datetime format, so
        // the returned value equals what a later read yields.
        let now = chrono::Local::now().naive_local();
        let medication = Medication {
            id: Uuid::new_v4(),
            name: self.draft.name.clone(),
            dosage: self.draft.dosage.clone(),
            frequency: self.draft.frequency.clone(),
            prescribing_doctor: self.draft.prescribing_doctor.clone(),
            date_added: now.with_nanosecond(0).unwrap_or(now),
            override_reason,
        };
        self.state = GuardState::Committed {
            medication: medication.clone(),
        };
        medication
    }
}

fn validate_draft(draft: &MedicationDraft) -> Result<(), GuardError> {
    if draft.name.trim().is_empty() {
        return Err(GuardError::MissingField("name"));
    }
    if draft.dosage.trim().is_empty() {
        return Err(GuardError::MissingField("dosage"));
    }
    if draft.frequency.trim().is_empty() {
        return Err(GuardError::MissingField("frequency"));
    }
    Ok(())
}
