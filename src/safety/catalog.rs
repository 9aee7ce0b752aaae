use std::collections::HashMap;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use super::normalize_drug_name;
use crate::models::enums::InteractionSeverity;

/// What to tell the prescriber about one dangerous combination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarningDetail {
    pub severity: InteractionSeverity,
    /// Mechanism description, e.g. "Both drugs affect blood clotting."
    pub message: String,
    /// Clinical guidance, e.g. "Requires frequent INR monitoring."
    pub recommendation: String,
}

/// The known conflicts for one primary drug.
///
/// Details are keyed by normalized conflicting drug name; the key set IS the
/// conflict set, so a conflict without a warning detail cannot exist.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InteractionEntry {
    pub conflicts: HashMap<String, WarningDetail>,
}

impl InteractionEntry {
    /// Look up the warning detail for an already-normalized drug name.
    pub fn conflict_with(&self, normalized_name: &str) -> Option<&WarningDetail> {
        self.conflicts.get(normalized_name)
    }
}

/// Static table of known dangerous drug combinations.
///
/// Lookups are one-directional: registering aspirin→warfarin does not imply
/// warfarin→aspirin unless warfarin's entry separately lists it. The bundled
/// table is deliberately incomplete in that direction; absence of an entry
/// means "nothing registered", not "safe". Loaded once per process, never
/// mutated afterwards.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InteractionCatalog {
    entries: HashMap<String, InteractionEntry>,
}

static BUNDLED: LazyLock<InteractionCatalog> = LazyLock::new(|| {
    serde_json::from_str(include_str!("../../resources/drug_interactions.json"))
        .expect("bundled drug_interactions.json is valid")
});

impl InteractionCatalog {
    /// The table shipped with the application.
    pub fn bundled() -> &'static InteractionCatalog {
        &BUNDLED
    }

    /// Build a catalog from explicit entries (tests, alternative tables).
    /// Entry keys and conflict keys are normalized on the way in.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, InteractionEntry)>,
    {
        let entries = entries
            .into_iter()
            .map(|(name, entry)| {
                let conflicts = entry
                    .conflicts
                    .into_iter()
                    .map(|(conflict, detail)| (normalize_drug_name(&conflict), detail))
                    .collect();
                (normalize_drug_name(&name), InteractionEntry { conflicts })
            })
            .collect();
        Self { entries }
    }

    /// Look up the entry for a drug. `None` means nothing is registered for
    /// this drug as a primary key. That is a closed-world "don't know", not a
    /// guarantee of safety.
    pub fn lookup(&self, drug_name: &str) -> Option<&InteractionEntry> {
        self.entries.get(&normalize_drug_name(drug_name))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
