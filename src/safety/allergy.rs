use super::normalize_drug_name;
use crate::models::AllergyReaction;

/// Check a candidate drug against the patient's documented reactions.
///
/// Returns the first reaction in list order whose drug name matches after
/// normalization. First-match semantics: if the same drug was reported
/// twice with different severities, only the earliest report surfaces.
/// Pure; no input is mutated.
pub fn check_allergy<'a>(
    candidate_name: &str,
    reactions: &'a [AllergyReaction],
) -> Option<&'a AllergyReaction> {
    let target = normalize_drug_name(candidate_name);
    reactions
        .iter()
        .find(|reaction| normalize_drug_name(&reaction.drug_name) == target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::enums::ReactionSeverity;
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn reaction(drug_name: &str, severity: ReactionSeverity) -> AllergyReaction {
        AllergyReaction {
            id: Uuid::new_v4(),
            drug_name: drug_name.into(),
            reaction_type: "Hives".into(),
            severity,
            date_occurred: NaiveDate::from_ymd_opt(2024, 11, 3).unwrap(),
            description: None,
        }
    }

    #[test]
    fn matches_documented_reaction() {
        let reactions = vec![reaction("Penicillin", ReactionSeverity::Severe)];
        let found = check_allergy("Penicillin", &reactions).unwrap();
        assert_eq!(found.drug_name, "Penicillin");
    }

    #[test]
    fn match_ignores_case_and_whitespace() {
        let reactions = vec![reaction("Penicillin", ReactionSeverity::Severe)];
        assert!(check_allergy("  penicillin ", &reactions).is_some());
        assert!(check_allergy("PENICILLIN", &reactions).is_some());
    }

    #[test]
    fn first_match_wins_over_later_duplicates() {
        let reactions = vec![
            reaction("Penicillin", ReactionSeverity::Severe),
            reaction("Penicillin", ReactionSeverity::Mild),
        ];
        let found = check_allergy("penicillin", &reactions).unwrap();
        assert_eq!(found.severity, ReactionSeverity::Severe);
    }

    #[test]
    fn no_match_returns_none() {
        let reactions = vec![reaction("Penicillin", ReactionSeverity::Severe)];
        assert!(check_allergy("Aspirin", &reactions).is_none());
        assert!(check_allergy("Aspirin", &[]).is_none());
    }

    #[test]
    fn repeated_checks_are_deterministic() {
        let reactions = vec![
            reaction("Sulfa", ReactionSeverity::Moderate),
            reaction("Penicillin", ReactionSeverity::Severe),
        ];
        let first = check_allergy("sulfa", &reactions).map(|r| r.id);
        let second = check_allergy("sulfa", &reactions).map(|r| r.id);
        assert_eq!(first, second);
        assert_eq!(reactions.len(), 2);
    }
}
