//! General contact form.

use serde::{Deserialize, Serialize};

use super::fields::{YearsAtProperty, blank_as_none, lenient_count, vocabulary};

/// What the visitor is asking about.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InquiryType {
    #[default]
    General,
    PropertyManagement,
    Quote,
    Maintenance,
    BoardNomination,
}

vocabulary!(InquiryType {
    General => ("general", "General Inquiry"),
    PropertyManagement => ("property_management", "Property Management Services"),
    Quote => ("quote", "Request a Quote"),
    Maintenance => ("maintenance", "Maintenance Request"),
    BoardNomination => ("board_nomination", "Board Nomination Application"),
});

/// Board seat a contact-form nominee is interested in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoardPosition {
    President,
    VicePresident,
    Treasurer,
    Secretary,
    BoardMember,
}

vocabulary!(BoardPosition {
    President => ("president", "President"),
    VicePresident => ("vice_president", "Vice President"),
    Treasurer => ("treasurer", "Treasurer"),
    Secretary => ("secretary", "Secretary"),
    BoardMember => ("board_member", "Board Member at Large"),
});

/// Prior board experience.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExperienceLevel {
    #[serde(rename = "none")]
    NoExperience,
    #[serde(rename = "some")]
    SomeExperience,
    #[serde(rename = "extensive")]
    Extensive,
}

vocabulary!(ExperienceLevel {
    NoExperience => ("none", "No Previous Experience"),
    SomeExperience => ("some", "Some Experience"),
    Extensive => ("extensive", "Extensive Experience"),
});

/// A general contact form submission.
///
/// Property and board fields are optional unless `inquiry_type` is
/// [`InquiryType::BoardNomination`], in which case the address, position
/// and years at property become required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub company: Option<String>,
    #[serde(default)]
    pub inquiry_type: InquiryType,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub property_address: Option<String>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub number_of_units: Option<u32>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub board_position: Option<BoardPosition>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub years_at_property: Option<YearsAtProperty>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub previous_experience: Option<ExperienceLevel>,
    pub message: String,
}

impl ContactSubmission {
    /// Whether the board-nomination follow-up fields apply.
    pub fn is_board_nomination(&self) -> bool {
        self.inquiry_type == InquiryType::BoardNomination
    }
}

impl Default for ContactSubmission {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            phone: None,
            company: None,
            inquiry_type: InquiryType::General,
            property_address: None,
            number_of_units: None,
            board_position: None,
            years_at_property: None,
            previous_experience: None,
            message: String::new(),
        }
    }
}
