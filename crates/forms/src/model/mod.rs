//! Submission records and the `{formType, data}` envelope.
//!
//! The client and the forwarder share these types; every other coupling
//! between them goes through the JSON payload shape.

mod contact;
pub(crate) mod fields;
mod nomination;
mod summary;
mod violation;

use serde::{Deserialize, Serialize};

pub use contact::{BoardPosition, ContactSubmission, ExperienceLevel, InquiryType};
pub use fields::{UnknownValue, YearsAtProperty, YearsError};
pub use nomination::{BoardNomination, OwnershipType, TimeCommitment};
pub use summary::{NOT_AVAILABLE, SummaryField};
pub use violation::{RequestedAction, ViolationReport, ViolationType, ViolationTypes, YesNo};

/// Which form a submission came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormType {
    Contact,
    Violation,
    BoardNomination,
}

impl FormType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormType::Contact => "contact",
            FormType::Violation => "violation",
            FormType::BoardNomination => "board_nomination",
        }
    }
}

impl std::fmt::Display for FormType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A normalized submission, serialized as `{"formType": ..., "data": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "formType", content = "data", rename_all = "snake_case")]
pub enum Submission {
    Contact(ContactSubmission),
    Violation(ViolationReport),
    BoardNomination(BoardNomination),
}

impl Submission {
    pub fn form_type(&self) -> FormType {
        match self {
            Submission::Contact(_) => FormType::Contact,
            Submission::Violation(_) => FormType::Violation,
            Submission::BoardNomination(_) => FormType::BoardNomination,
        }
    }
}

impl From<ContactSubmission> for Submission {
    fn from(contact: ContactSubmission) -> Self {
        Submission::Contact(contact)
    }
}

impl From<ViolationReport> for Submission {
    fn from(report: ViolationReport) -> Self {
        Submission::Violation(report)
    }
}

impl From<BoardNomination> for Submission {
    fn from(nomination: BoardNomination) -> Self {
        Submission::BoardNomination(nomination)
    }
}
