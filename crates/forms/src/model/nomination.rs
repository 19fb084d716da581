//! Board member nomination application.

use serde::{Deserialize, Serialize};

use super::fields::{YearsAtProperty, blank_as_none, vocabulary};

/// Whether the nominee owns or rents their unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OwnershipType {
    #[default]
    Owner,
    Renter,
}

vocabulary!(OwnershipType {
    Owner => ("owner", "Owner"),
    Renter => ("renter", "Renter (if allowed by bylaws)"),
});

/// Can the nominee attend monthly board meetings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeCommitment {
    #[default]
    Yes,
    No,
    Mostly,
}

vocabulary!(TimeCommitment {
    Yes => ("yes", "Yes"),
    No => ("no", "No"),
    Mostly => ("mostly", "Mostly"),
});

/// A board nomination application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardNomination {
    pub nominee_name: String,
    pub nominee_email: String,
    pub nominee_phone: String,
    pub nominee_unit_address: String,
    /// Required; optional here only so an untouched form can be represented.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub years_at_property: Option<YearsAtProperty>,
    #[serde(default)]
    pub ownership_type: OwnershipType,
    #[serde(default)]
    pub current_employment: String,
    #[serde(default)]
    pub previous_board_experience: String,
    pub relevant_skills: String,
    pub motivation: String,
    #[serde(default)]
    pub time_commitment: TimeCommitment,
    #[serde(default)]
    pub references: String,
    pub signature: String,
    #[serde(default)]
    pub acknowledged_terms: bool,
    #[serde(default)]
    pub acknowledged_commitment: bool,
    #[serde(default)]
    pub acknowledged_attendance: bool,
}

impl Default for BoardNomination {
    fn default() -> Self {
        Self {
            nominee_name: String::new(),
            nominee_email: String::new(),
            nominee_phone: String::new(),
            nominee_unit_address: String::new(),
            years_at_property: None,
            ownership_type: OwnershipType::Owner,
            current_employment: String::new(),
            previous_board_experience: String::new(),
            relevant_skills: String::new(),
            motivation: String::new(),
            time_commitment: TimeCommitment::Yes,
            references: String::new(),
            signature: String::new(),
            acknowledged_terms: false,
            acknowledged_commitment: false,
            acknowledged_attendance: false,
        }
    }
}
