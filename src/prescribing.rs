//! Prescription entry flow: wires the safety-check engine to the record
//! store for a single operator session.
//!
//! The session holds at most one pending (blocked) attempt at a time. The
//! presentation layer renders the blocked outcome as a modal and feeds the
//! operator's decision back in: `override_allergy`, `force_add`, or
//! `cancel`. Writes to the record happen only on commit; the caller is
//! responsible for serializing concurrent access to the same record.

use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db::{get_all_medications, get_all_reactions, insert_medication, DatabaseError};
use crate::models::{AllergyReaction, Medication, MedicationDraft};
use crate::safety::{
    GuardError, GuardState, InteractionCatalog, InteractionWarning, PrescriptionGuard,
};

#[derive(Error, Debug)]
pub enum PrescribeError {
    #[error(transparent)]
    Guard(#[from] GuardError),

    #[error("record read failed: {0}")]
    Read(DatabaseError),

    /// The commit write failed. The medication was NOT added; the pending
    /// attempt is discarded rather than left half-committed.
    #[error("commit failed: {0}")]
    Commit(DatabaseError),

    #[error("no prescription attempt is pending")]
    NoPendingAttempt,

    #[error("prescription flow internal error: {0}")]
    Internal(&'static str),
}

/// What a submit produced, for the presentation layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SubmitOutcome {
    Committed { medication: Medication },
    BlockedAllergy { reaction: AllergyReaction },
    BlockedInteraction { warnings: Vec<InteractionWarning> },
}

/// Single-operator prescription entry session.
pub struct PrescriptionSession<'a> {
    catalog: &'a InteractionCatalog,
    pending: Option<PrescriptionGuard>,
}

impl<'a> PrescriptionSession<'a> {
    pub fn new(catalog: &'a InteractionCatalog) -> Self {
        Self {
            catalog,
            pending: None,
        }
    }

    /// Submit a candidate prescription. Reads the authoritative medication
    /// and reaction lists, evaluates the guard, and commits immediately when
    /// nothing matches. A blocked attempt is retained as pending until the
    /// operator resolves or cancels it; submitting again discards it.
    pub fn submit(
        &mut self,
        conn: &Connection,
        draft: MedicationDraft,
    ) -> Result<SubmitOutcome, PrescribeError> {
        self.pending = None;

        let current = get_all_medications(conn).map_err(PrescribeError::Read)?;
        let reactions = get_all_reactions(conn).map_err(PrescribeError::Read)?;

        let guard = PrescriptionGuard::evaluate(self.catalog, draft, &current, &reactions)?;

        if let Some(medication) = guard.committed().cloned() {
            insert_medication(conn, &medication).map_err(PrescribeError::Commit)?;
            tracing::info!(drug = %medication.name, "medication committed");
            return Ok(SubmitOutcome::Committed { medication });
        }

        let outcome = match guard.state() {
            GuardState::BlockedAllergy { reaction } => SubmitOutcome::BlockedAllergy {
                reaction: reaction.clone(),
            },
            GuardState::BlockedInteraction { warnings } => SubmitOutcome::BlockedInteraction {
                warnings: warnings.clone(),
            },
            GuardState::Draft | GuardState::Committed { .. } => {
                return Err(PrescribeError::Internal("attempt left in draft state"))
            }
        };
        self.pending = Some(guard);
        Ok(outcome)
    }

    /// Resolve a pending allergy block with a justification and commit.
    ///
    /// An empty justification is rejected and the attempt stays pending, so
    /// the operator can correct it. The interaction check is not run on this
    /// path.
    pub fn override_allergy(
        &mut self,
        conn: &Connection,
        justification: &str,
    ) -> Result<Medication, PrescribeError> {
        let guard = self
            .pending
            .as_mut()
            .ok_or(PrescribeError::NoPendingAttempt)?;

        let medication = guard.override_allergy(justification)?;
        self.commit_pending(conn, medication)
    }

    /// Resolve a pending interaction block and commit. No justification is
    /// required or recorded.
    pub fn force_add(&mut self, conn: &Connection) -> Result<Medication, PrescribeError> {
        let guard = self
            .pending
            .as_mut()
            .ok_or(PrescribeError::NoPendingAttempt)?;

        let medication = guard.force_add()?;
        self.commit_pending(conn, medication)
    }

    /// Discard the pending attempt, if any. Nothing is written.
    pub fn cancel(&mut self) {
        if self.pending.take().is_some() {
            tracing::info!("pending prescription attempt cancelled");
        }
    }

    /// The pending blocked attempt, for re-rendering after e.g. a rejected
    /// override.
    pub fn pending(&self) -> Option<&GuardState> {
        self.pending.as_ref().map(|guard| guard.state())
    }

    fn commit_pending(
        &mut self,
        conn: &Connection,
        medication: Medication,
    ) -> Result<Medication, PrescribeError> {
        // Whatever happens to the write, the attempt is finished: a failed
        // write is surfaced as a commit failure and must not leave a
        // half-resolved block behind.
        self.pending = None;
        insert_medication(conn, &medication).map_err(PrescribeError::Commit)?;
        tracing::info!(drug = %medication.name, "medication committed");
        Ok(medication)
    }
}
