//! Intake test utilities.
//!
//! Helpers for integration testing: submission fixtures, a recording mock
//! HTTP endpoint that stands in for third-party providers, and assertion
//! utilities.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use serde_json::{Value as JsonValue, json};

pub mod mock;

pub use mock::{MockEndpoint, RecordedRequest};

/// A form payload fixture for building envelopes.
#[derive(Debug, Clone)]
pub struct TestSubmission {
    pub form_type: String,
    pub data: JsonValue,
}

impl TestSubmission {
    /// Set or replace a single field.
    pub fn with_field(mut self, name: &str, value: JsonValue) -> Self {
        if let Some(obj) = self.data.as_object_mut() {
            obj.insert(name.to_string(), value);
        }
        self
    }

    /// Remove a field entirely.
    pub fn without_field(mut self, name: &str) -> Self {
        if let Some(obj) = self.data.as_object_mut() {
            obj.remove(name);
        }
        self
    }

    /// The `{formType, data}` envelope.
    pub fn envelope(&self) -> JsonValue {
        json!({
            "formType": self.form_type,
            "data": self.data,
        })
    }

    /// The envelope as a request body.
    pub fn body(&self) -> String {
        self.envelope().to_string()
    }
}

/// A contact form as the browser sends it: every field present, blanks empty.
pub fn contact_submission() -> TestSubmission {
    TestSubmission {
        form_type: "contact".to_string(),
        data: json!({
            "name": "Ada Byron",
            "email": "ada@example.com",
            "phone": "",
            "company": "",
            "inquiry_type": "general",
            "property_address": "",
            "number_of_units": "",
            "board_position": "",
            "years_at_property": "",
            "previous_experience": "",
            "message": "Do you manage buildings in Lakeview?"
        }),
    }
}

/// The violation report used in end-to-end examples (no violator named).
pub fn violation_submission() -> TestSubmission {
    TestSubmission {
        form_type: "violation".to_string(),
        data: json!({
            "reporter_name": "Jane Doe",
            "reporter_unit_address": "Unit 3, 10 Oak St",
            "reporter_contact": "jane@x.com",
            "report_date": "2024-05-01",
            "violator_name": "",
            "violator_unit": "",
            "violation_types": ["noise", "pet"],
            "violation_details": "Loud music nightly",
            "reported_before": "no",
            "requested_action": "warning",
            "signature": "Jane Doe",
            "acknowledged_sharing": true,
            "certified_accurate": true,
            "acknowledged_contact": true
        }),
    }
}

/// A complete board nomination.
pub fn nomination_submission() -> TestSubmission {
    TestSubmission {
        form_type: "board_nomination".to_string(),
        data: json!({
            "nominee_name": "Grace Hopper",
            "nominee_email": "grace@example.com",
            "nominee_phone": "555-0100",
            "nominee_unit_address": "Unit 9, 10 Oak St",
            "years_at_property": "3.5",
            "ownership_type": "owner",
            "current_employment": "Engineer",
            "previous_board_experience": "",
            "relevant_skills": "Budgeting and vendor contracts",
            "motivation": "Keep assessments predictable",
            "time_commitment": "yes",
            "references": "",
            "signature": "Grace Hopper",
            "acknowledged_terms": true,
            "acknowledged_commitment": true,
            "acknowledged_attendance": true
        }),
    }
}

/// Assertion helpers for JSON content.
pub mod assert {
    use serde_json::Value;

    /// Assert that a JSON value has a specific key.
    pub fn has_key(value: &Value, key: &str) {
        assert!(
            value.get(key).is_some(),
            "Expected JSON to have key '{key}', got: {value}"
        );
    }

    /// Assert that a string contains a substring.
    pub fn contains(haystack: &str, needle: &str) {
        assert!(
            haystack.contains(needle),
            "Expected string to contain '{needle}'\nActual: {haystack}"
        );
    }

    /// Assert a forwarder failure body: `{"success": false, "error": ...}`.
    pub fn failure(body: &Value) -> &str {
        assert_eq!(body["success"], false, "expected failure body, got {body}");
        body["error"]
            .as_str()
            .unwrap_or_else(|| panic!("failure body has no error text: {body}"))
    }
}
