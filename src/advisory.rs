//! Offline clinical review suggestions.
//!
//! Advice is strictly additive to the safety checks: a failing advisor must
//! never block prescription entry. Callers go through [`suggest_or_empty`],
//! which logs the failure and returns nothing. `RuleBasedAdvisor` is the
//! built-in provider; pure data inspection, no network or model calls.

use chrono::Local;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db::{get_all_medications, get_all_notes, get_all_reactions, get_profile, DatabaseError};
use crate::models::enums::{SuggestionCategory, SuggestionPriority};
use crate::models::{AllergyReaction, ClinicalNote, Medication, PatientProfile};

/// Notes older than this no longer count as recent lab coverage.
const HBA1C_WINDOW_DAYS: i64 = 90;

/// Medication count at which a review is suggested.
const POLYPHARMACY_THRESHOLD: usize = 4;

#[derive(Error, Debug)]
pub enum AdvisoryError {
    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error("advisory provider failed: {0}")]
    Provider(String),
}

/// One actionable review suggestion, ready for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suggestion {
    pub category: SuggestionCategory,
    pub title: String,
    pub reasoning: String,
    pub action: String,
    pub priority: SuggestionPriority,
}

/// Everything an advisor may inspect, read once up front so providers
/// stay independent of the storage layer.
#[derive(Debug, Clone, Default)]
pub struct PatientSnapshot {
    pub profile: Option<PatientProfile>,
    pub medications: Vec<Medication>,
    pub reactions: Vec<AllergyReaction>,
    pub notes: Vec<ClinicalNote>,
}

impl PatientSnapshot {
    pub fn load(conn: &Connection) -> Result<Self, DatabaseError> {
        Ok(Self {
            profile: get_profile(conn)?,
            medications: get_all_medications(conn)?,
            reactions: get_all_reactions(conn)?,
            notes: get_all_notes(conn)?,
        })
    }

    fn conditions(&self) -> &[String] {
        self.profile
            .as_ref()
            .map(|p| p.conditions.as_slice())
            .unwrap_or_default()
    }

    fn allergies(&self) -> &[String] {
        self.profile
            .as_ref()
            .map(|p| p.allergies.as_slice())
            .unwrap_or_default()
    }

    fn age(&self) -> Option<u32> {
        self.profile.as_ref().map(|p| p.age)
    }

    fn has_condition(&self, fragment: &str) -> bool {
        self.conditions()
            .iter()
            .any(|c| c.to_lowercase().contains(fragment))
    }
}

/// A source of review suggestions. Implementations must not perform
/// writes; the snapshot is their whole world.
pub trait ClinicalAdvisor {
    fn suggest(&self, snapshot: &PatientSnapshot) -> Result<Vec<Suggestion>, AdvisoryError>;
}

/// Fail-open wrapper around [`ClinicalAdvisor::suggest`]. Any provider
/// error is logged at warn level and swallowed; the prescription flow
/// never sees it.
pub fn suggest_or_empty(advisor: &dyn ClinicalAdvisor, snapshot: &PatientSnapshot) -> Vec<Suggestion> {
    match advisor.suggest(snapshot) {
        Ok(suggestions) => suggestions,
        Err(e) => {
            tracing::warn!("clinical advisor failed: {e}");
            Vec::new()
        }
    }
}

/// Built-in heuristics over the patient record. Each rule is independent;
/// the output order follows the rule order below.
pub struct RuleBasedAdvisor;

impl ClinicalAdvisor for RuleBasedAdvisor {
    fn suggest(&self, snapshot: &PatientSnapshot) -> Result<Vec<Suggestion>, AdvisoryError> {
        let mut suggestions = Vec::new();

        // Diabetes without a recent HbA1c note
        if snapshot.has_condition("diabetes") && !has_recent_hba1c(&snapshot.notes) {
            suggestions.push(Suggestion {
                category: SuggestionCategory::LabTest,
                title: "HbA1c test overdue for diabetic patient".into(),
                reasoning: "Diabetic patients need HbA1c every 3 months".into(),
                action: "Order HbA1c, fasting glucose, lipid profile".into(),
                priority: SuggestionPriority::High,
            });
        }

        // Polypharmacy
        if snapshot.medications.len() >= POLYPHARMACY_THRESHOLD {
            suggestions.push(Suggestion {
                category: SuggestionCategory::MedicationReview,
                title: "Polypharmacy detected - review needed".into(),
                reasoning: format!(
                    "Patient on {} medications - interaction risk",
                    snapshot.medications.len()
                ),
                action: "Conduct medication review, consider deprescribing".into(),
                priority: SuggestionPriority::High,
            });
        }

        // Hypertension monitoring
        if snapshot.has_condition("hypertension") {
            suggestions.push(Suggestion {
                category: SuggestionCategory::FollowUp,
                title: "Blood pressure monitoring required".into(),
                reasoning: "Regular BP monitoring needed for hypertensives".into(),
                action: "Schedule BP check, review antihypertensive meds".into(),
                priority: SuggestionPriority::Medium,
            });
        }

        // Elderly screening
        if snapshot.age().is_some_and(|age| age >= 65) {
            suggestions.push(Suggestion {
                category: SuggestionCategory::PreventiveCare,
                title: "Age-appropriate preventive screening".into(),
                reasoning: "Patients 65+ need regular health screenings".into(),
                action: "Order: Bone density, metabolic panel, cancer screening".into(),
                priority: SuggestionPriority::Medium,
            });
        }

        // Statin liver monitoring
        if snapshot.medications.iter().any(is_statin) {
            suggestions.push(Suggestion {
                category: SuggestionCategory::LabTest,
                title: "Liver monitoring for statin therapy".into(),
                reasoning: "Statins require periodic liver function monitoring".into(),
                action: "Order LFT (SGPT, SGOT) if not done in 6 months".into(),
                priority: SuggestionPriority::Medium,
            });
        }

        // Documented allergies
        let allergies = snapshot.allergies();
        if !allergies.is_empty() {
            suggestions.push(Suggestion {
                category: SuggestionCategory::RiskAlert,
                title: format!("Patient has {} documented allergies", allergies.len()),
                reasoning: format!("Allergies: {}", allergies.join(", ")),
                action: "Cross-check all prescriptions against allergy list".into(),
                priority: SuggestionPriority::High,
            });
        }

        // Diabetes + hypertension
        if snapshot.has_condition("diabetes") && snapshot.has_condition("hypertension") {
            suggestions.push(Suggestion {
                category: SuggestionCategory::RiskAlert,
                title: "High cardiovascular risk profile".into(),
                reasoning: "Diabetes + Hypertension = elevated cardiac risk".into(),
                action: "Consider ECG, echo, lipid profile, cardiac assessment".into(),
                priority: SuggestionPriority::High,
            });
        }

        Ok(suggestions)
    }
}

fn has_recent_hba1c(notes: &[ClinicalNote]) -> bool {
    let now = Local::now().naive_local();
    notes.iter().any(|note| {
        note.content.to_lowercase().contains("hba1c")
            && (now - note.date).num_days() < HBA1C_WINDOW_DAYS
    })
}

fn is_statin(medication: &Medication) -> bool {
    let name = medication.name.to_lowercase();
    name.contains("atorvastatin") || name.contains("statin")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDateTime};
    use uuid::Uuid;

    fn profile(age: u32, conditions: &[&str], allergies: &[&str]) -> PatientProfile {
        PatientProfile {
            name: "Rajesh Kumar".into(),
            age,
            blood_group: "B+".into(),
            conditions: conditions.iter().map(|s| s.to_string()).collect(),
            allergies: allergies.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn medication(name: &str) -> Medication {
        Medication {
            id: Uuid::new_v4(),
            name: name.into(),
            dosage: "10mg".into(),
            frequency: "Once daily".into(),
            prescribing_doctor: "Dr. Sharma".into(),
            date_added: Local::now().naive_local(),
            override_reason: None,
        }
    }

    fn note(content: &str, date: NaiveDateTime) -> ClinicalNote {
        ClinicalNote {
            id: Uuid::new_v4(),
            content: content.into(),
            doctor: "Dr. Mehta".into(),
            date,
        }
    }

    fn categories(suggestions: &[Suggestion]) -> Vec<SuggestionCategory> {
        suggestions.iter().map(|s| s.category.clone()).collect()
    }

    #[test]
    fn empty_snapshot_yields_no_suggestions() {
        let suggestions = RuleBasedAdvisor.suggest(&PatientSnapshot::default()).unwrap();
        assert!(suggestions.is_empty());
    }

    #[test]
    fn diabetic_without_recent_hba1c_gets_lab_test() {
        let snapshot = PatientSnapshot {
            profile: Some(profile(45, &["Type 2 Diabetes"], &[])),
            ..Default::default()
        };

        let suggestions = RuleBasedAdvisor.suggest(&snapshot).unwrap();
        assert_eq!(categories(&suggestions), vec![SuggestionCategory::LabTest]);
        assert_eq!(suggestions[0].priority, SuggestionPriority::High);
    }

    #[test]
    fn recent_hba1c_note_suppresses_the_lab_test() {
        let snapshot = PatientSnapshot {
            profile: Some(profile(45, &["Type 2 Diabetes"], &[])),
            notes: vec![note(
                "HbA1c 6.8%, continue current regimen",
                Local::now().naive_local() - Duration::days(30),
            )],
            ..Default::default()
        };

        let suggestions = RuleBasedAdvisor.suggest(&snapshot).unwrap();
        assert!(suggestions.is_empty());
    }

    #[test]
    fn stale_hba1c_note_does_not_count() {
        let snapshot = PatientSnapshot {
            profile: Some(profile(45, &["Type 2 Diabetes"], &[])),
            notes: vec![note(
                "HbA1c 7.2%",
                Local::now().naive_local() - Duration::days(120),
            )],
            ..Default::default()
        };

        let suggestions = RuleBasedAdvisor.suggest(&snapshot).unwrap();
        assert_eq!(categories(&suggestions), vec![SuggestionCategory::LabTest]);
    }

    #[test]
    fn four_medications_trigger_polypharmacy_review() {
        let snapshot = PatientSnapshot {
            medications: vec![
                medication("Metformin"),
                medication("Amlodipine"),
                medication("Atorvastatin"),
                medication("Aspirin"),
            ],
            ..Default::default()
        };

        let suggestions = RuleBasedAdvisor.suggest(&snapshot).unwrap();
        let review = suggestions
            .iter()
            .find(|s| s.category == SuggestionCategory::MedicationReview)
            .unwrap();
        assert!(review.reasoning.contains("4 medications"));
    }

    #[test]
    fn three_medications_do_not() {
        let snapshot = PatientSnapshot {
            medications: vec![
                medication("Metformin"),
                medication("Amlodipine"),
                medication("Aspirin"),
            ],
            ..Default::default()
        };

        let suggestions = RuleBasedAdvisor.suggest(&snapshot).unwrap();
        assert!(!categories(&suggestions).contains(&SuggestionCategory::MedicationReview));
    }

    #[test]
    fn statin_by_name_fragment_triggers_liver_monitoring() {
        let snapshot = PatientSnapshot {
            medications: vec![medication("Rosuvastatin")],
            ..Default::default()
        };

        let suggestions = RuleBasedAdvisor.suggest(&snapshot).unwrap();
        assert_eq!(categories(&suggestions), vec![SuggestionCategory::LabTest]);
    }

    #[test]
    fn allergy_alert_lists_every_allergen() {
        let snapshot = PatientSnapshot {
            profile: Some(profile(45, &[], &["Penicillin", "Sulfa drugs"])),
            ..Default::default()
        };

        let suggestions = RuleBasedAdvisor.suggest(&snapshot).unwrap();
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].title, "Patient has 2 documented allergies");
        assert_eq!(suggestions[0].reasoning, "Allergies: Penicillin, Sulfa drugs");
    }

    #[test]
    fn diabetes_and_hypertension_add_cardiovascular_alert() {
        let snapshot = PatientSnapshot {
            profile: Some(profile(58, &["Type 2 Diabetes", "Hypertension"], &[])),
            ..Default::default()
        };

        let suggestions = RuleBasedAdvisor.suggest(&snapshot).unwrap();
        assert_eq!(
            categories(&suggestions),
            vec![
                SuggestionCategory::LabTest,
                SuggestionCategory::FollowUp,
                SuggestionCategory::RiskAlert,
            ]
        );
        assert_eq!(suggestions[2].title, "High cardiovascular risk profile");
    }

    #[test]
    fn elderly_patient_gets_preventive_screening() {
        let snapshot = PatientSnapshot {
            profile: Some(profile(65, &[], &[])),
            ..Default::default()
        };

        let suggestions = RuleBasedAdvisor.suggest(&snapshot).unwrap();
        assert_eq!(
            categories(&suggestions),
            vec![SuggestionCategory::PreventiveCare]
        );
    }

    #[test]
    fn snapshot_loads_from_the_record_store() {
        let conn = crate::db::open_memory_database().unwrap();
        crate::db::insert_medication(&conn, &medication("Metformin")).unwrap();

        let snapshot = PatientSnapshot::load(&conn).unwrap();
        assert!(snapshot.profile.is_none());
        assert_eq!(snapshot.medications.len(), 1);
        assert!(snapshot.reactions.is_empty());
        assert!(snapshot.notes.is_empty());
    }

    struct FailingAdvisor;

    impl ClinicalAdvisor for FailingAdvisor {
        fn suggest(&self, _: &PatientSnapshot) -> Result<Vec<Suggestion>, AdvisoryError> {
            Err(AdvisoryError::Provider("model unavailable".into()))
        }
    }

    #[test]
    fn wrapper_fails_open_on_provider_error() {
        let suggestions = suggest_or_empty(&FailingAdvisor, &PatientSnapshot::default());
        assert!(suggestions.is_empty());
    }
}
