//! Notification rendering: subject lines and labelled field summaries.

use serde_json::{Map, Value};

use super::{BoardNomination, ContactSubmission, Submission, ViolationReport};

/// Placeholder for optional fields left blank.
pub const NOT_AVAILABLE: &str = "N/A";

/// One line of a notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryField {
    /// Wire name (`reporter_name`).
    pub key: &'static str,
    /// Human label (`Reporter Name`).
    pub label: &'static str,
    pub value: String,
}

impl SummaryField {
    fn new(key: &'static str, label: &'static str, value: impl Into<String>) -> Self {
        Self {
            key,
            label,
            value: value.into(),
        }
    }

    fn optional(key: &'static str, label: &'static str, value: Option<impl ToString>) -> Self {
        let value = value
            .map(|v| v.to_string())
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());
        Self::new(key, label, value)
    }

    fn text_or_na(key: &'static str, label: &'static str, value: &str) -> Self {
        Self::optional(key, label, Some(value))
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "Yes" } else { "No" }
}

impl Submission {
    /// Subject line for the notification email.
    pub fn subject(&self) -> String {
        match self {
            Submission::Contact(c) => format!("New Contact Form Submission from {}", c.name),
            Submission::Violation(v) => format!(
                "New Violation Report - {}",
                v.violator_name.as_deref().unwrap_or("Unknown")
            ),
            Submission::BoardNomination(n) => {
                format!("Board Nomination Application - {}", n.nominee_name)
            }
        }
    }

    /// Labelled fields in display order, with `N/A` for blank optionals.
    pub fn summary(&self) -> Vec<SummaryField> {
        match self {
            Submission::Contact(c) => contact_summary(c),
            Submission::Violation(v) => violation_summary(v),
            Submission::BoardNomination(n) => nomination_summary(n),
        }
    }

    /// JSON object of `subject` plus every summary field, keyed by wire name.
    pub fn notification_json(&self) -> Value {
        let mut map = Map::new();
        map.insert("subject".to_string(), Value::String(self.subject()));
        for field in self.summary() {
            map.insert(field.key.to_string(), Value::String(field.value));
        }
        Value::Object(map)
    }

    /// Plain-text notification body.
    pub fn text_body(&self) -> String {
        let mut body = String::new();
        for field in self.summary() {
            if field.value.contains('\n') {
                body.push_str(&format!("{}:\n{}\n\n", field.label, field.value));
            } else {
                body.push_str(&format!("{}: {}\n", field.label, field.value));
            }
        }
        body
    }
}

fn contact_summary(c: &ContactSubmission) -> Vec<SummaryField> {
    let mut fields = vec![
        SummaryField::new("name", "Name", &c.name),
        SummaryField::new("email", "Email", &c.email),
        SummaryField::optional("phone", "Phone", c.phone.as_ref()),
        SummaryField::optional("company", "Company", c.company.as_ref()),
        SummaryField::new("inquiry_type", "Inquiry Type", c.inquiry_type.as_str()),
        SummaryField::new("message", "Message", &c.message),
    ];

    if c.is_board_nomination() {
        fields.extend([
            SummaryField::optional(
                "property_address",
                "Property Address",
                c.property_address.as_ref(),
            ),
            SummaryField::optional("number_of_units", "Number of Units", c.number_of_units),
            SummaryField::optional(
                "board_position",
                "Board Position",
                c.board_position.map(|p| p.as_str()),
            ),
            SummaryField::optional(
                "years_at_property",
                "Years at Property",
                c.years_at_property,
            ),
            SummaryField::optional(
                "previous_experience",
                "Previous Experience",
                c.previous_experience.map(|e| e.as_str()),
            ),
        ]);
    }

    fields
}

fn violation_summary(v: &ViolationReport) -> Vec<SummaryField> {
    vec![
        SummaryField::new("reporter_name", "Reporter Name", &v.reporter_name),
        SummaryField::new(
            "reporter_unit_address",
            "Reporter Unit/Address",
            &v.reporter_unit_address,
        ),
        SummaryField::new("reporter_contact", "Reporter Contact", &v.reporter_contact),
        SummaryField::new("report_date", "Report Date", v.report_date.to_string()),
        SummaryField::optional("violator_name", "Violator Name", v.violator_name.as_ref()),
        SummaryField::optional("violator_unit", "Violator Unit", v.violator_unit.as_ref()),
        SummaryField::new(
            "violation_types",
            "Violation Types",
            v.violation_types.joined(),
        ),
        SummaryField::new(
            "violation_details",
            "Violation Details",
            &v.violation_details,
        ),
        SummaryField::new(
            "reported_before",
            "Reported Before",
            v.reported_before.as_str(),
        ),
        SummaryField::new(
            "requested_action",
            "Requested Action",
            v.requested_action.as_str(),
        ),
        SummaryField::new("signature", "Signature", &v.signature),
    ]
}

fn nomination_summary(n: &BoardNomination) -> Vec<SummaryField> {
    vec![
        SummaryField::new("nominee_name", "Nominee Name", &n.nominee_name),
        SummaryField::new("nominee_email", "Email", &n.nominee_email),
        SummaryField::new("nominee_phone", "Phone", &n.nominee_phone),
        SummaryField::new(
            "nominee_unit_address",
            "Unit Address",
            &n.nominee_unit_address,
        ),
        SummaryField::optional(
            "years_at_property",
            "Years at Property",
            n.years_at_property,
        ),
        SummaryField::new(
            "ownership_type",
            "Ownership Status",
            n.ownership_type.as_str(),
        ),
        SummaryField::text_or_na(
            "current_employment",
            "Current Employment",
            &n.current_employment,
        ),
        SummaryField::text_or_na(
            "previous_board_experience",
            "Previous Board Experience",
            &n.previous_board_experience,
        ),
        SummaryField::new("relevant_skills", "Relevant Skills", &n.relevant_skills),
        SummaryField::new("motivation", "Motivation", &n.motivation),
        SummaryField::new(
            "time_commitment",
            "Time Commitment",
            n.time_commitment.as_str(),
        ),
        SummaryField::text_or_na("references", "References", &n.references),
        SummaryField::new("signature", "Signature", &n.signature),
        SummaryField::new(
            "acknowledged_terms",
            "Acknowledged Fiduciary Duties",
            yes_no(n.acknowledged_terms),
        ),
        SummaryField::new(
            "acknowledged_commitment",
            "Acknowledged Time Commitment",
            yes_no(n.acknowledged_commitment),
        ),
        SummaryField::new(
            "acknowledged_attendance",
            "Certified Accurate",
            yes_no(n.acknowledged_attendance),
        ),
    ]
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::model::{InquiryType, ViolationType, ViolationTypes};

    fn violation() -> ViolationReport {
        ViolationReport {
            reporter_name: "Jane Doe".into(),
            reporter_unit_address: "Unit 3, 10 Oak St".into(),
            reporter_contact: "jane@x.com".into(),
            violation_types: ViolationTypes::new([ViolationType::Noise, ViolationType::Pet]),
            violation_details: "Loud music nightly".into(),
            signature: "Jane Doe".into(),
            ..ViolationReport::default()
        }
    }

    #[test]
    fn unknown_violator_in_subject() {
        let submission = Submission::from(violation());
        assert_eq!(submission.subject(), "New Violation Report - Unknown");

        let mut named = violation();
        named.violator_name = Some("Unit 4B".into());
        assert_eq!(
            Submission::from(named).subject(),
            "New Violation Report - Unit 4B"
        );
    }

    #[test]
    fn violation_notification_flattens_types() {
        let json = Submission::from(violation()).notification_json();
        assert_eq!(json["violation_types"], "noise, pet");
        assert_eq!(json["violator_name"], NOT_AVAILABLE);
        assert_eq!(json["subject"], "New Violation Report - Unknown");
    }

    #[test]
    fn contact_board_fields_only_for_board_inquiries() {
        let mut contact = ContactSubmission {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            message: "Hi".into(),
            ..ContactSubmission::default()
        };

        let json = Submission::from(contact.clone()).notification_json();
        assert!(json.get("board_position").is_none());
        assert_eq!(json["phone"], NOT_AVAILABLE);

        contact.inquiry_type = InquiryType::BoardNomination;
        let json = Submission::from(contact).notification_json();
        assert_eq!(json["board_position"], NOT_AVAILABLE);
        assert_eq!(json["property_address"], NOT_AVAILABLE);
        assert_eq!(json["years_at_property"], NOT_AVAILABLE);
    }

    #[test]
    fn text_body_puts_multiline_values_on_their_own_lines() {
        let mut report = violation();
        report.violation_details = "Line one\nLine two".into();
        let body = Submission::from(report).text_body();
        assert!(body.contains("Reporter Name: Jane Doe\n"));
        assert!(body.contains("Violation Details:\nLine one\nLine two\n\n"));
    }
}
