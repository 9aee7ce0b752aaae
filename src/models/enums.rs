use crate::db::DatabaseError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = DatabaseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(DatabaseError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(InteractionSeverity {
    Medium => "medium",
    High => "high",
    Critical => "critical",
});

str_enum!(ReactionSeverity {
    Mild => "mild",
    Moderate => "moderate",
    Severe => "severe",
});

str_enum!(SuggestionCategory {
    LabTest => "lab_test",
    MedicationReview => "medication_review",
    PreventiveCare => "preventive_care",
    FollowUp => "follow_up",
    RiskAlert => "risk_alert",
});

str_enum!(SuggestionPriority {
    Low => "low",
    Medium => "medium",
    High => "high",
});
