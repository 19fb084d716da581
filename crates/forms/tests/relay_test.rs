#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Relay tests against a recording local endpoint.
//!
//! Each test starts its own [`MockEndpoint`] so nothing is shared.

use intake_forms::form::{FieldInput, FormRecord, FormState, SubmitError, SubmitStatus};
use intake_forms::model::{BoardNomination, ContactSubmission, ViolationReport};
use intake_forms::relay::{
    NOTIFY_FUNCTION_PATH, RelayError, RelayTarget, STORE_FUNCTION_PATH, SubmissionRelay,
};
use intake_test_utils::MockEndpoint;

fn filled_contact() -> FormState<ContactSubmission> {
    let mut form = FormState::<ContactSubmission>::new();
    form.set_field("name", FieldInput::text("Ada Byron")).unwrap();
    form.set_field("email", FieldInput::text("ada@example.com"))
        .unwrap();
    form.set_field("message", FieldInput::text("Quote for 12 units"))
        .unwrap();
    form
}

fn filled_violation() -> FormState<ViolationReport> {
    let mut form = FormState::<ViolationReport>::new();
    for (name, value) in [
        ("reporter_name", "Jane Doe"),
        ("reporter_unit_address", "Unit 3, 10 Oak St"),
        ("reporter_contact", "jane@x.com"),
        ("report_date", "2024-05-01"),
        ("violation_details", "Loud music nightly"),
        ("signature", "Jane Doe"),
    ] {
        form.set_field(name, FieldInput::text(value)).unwrap();
    }
    form.set_field("violation_types", FieldInput::toggle("noise", true))
        .unwrap();
    form.set_field("violation_types", FieldInput::toggle("pet", true))
        .unwrap();
    for name in [
        "acknowledged_sharing",
        "certified_accurate",
        "acknowledged_contact",
    ] {
        form.set_field(name, FieldInput::Checked(true)).unwrap();
    }
    form
}

fn filled_nomination() -> FormState<BoardNomination> {
    let mut form = FormState::<BoardNomination>::new();
    for (name, value) in [
        ("nominee_name", "Grace Hopper"),
        ("nominee_email", "grace@example.com"),
        ("nominee_phone", "555-0100"),
        ("nominee_unit_address", "Unit 9, 10 Oak St"),
        ("years_at_property", "3.5"),
        ("relevant_skills", "Budgeting"),
        ("motivation", "Keep assessments predictable"),
        ("signature", "Grace Hopper"),
    ] {
        form.set_field(name, FieldInput::text(value)).unwrap();
    }
    for name in [
        "acknowledged_terms",
        "acknowledged_commitment",
        "acknowledged_attendance",
    ] {
        form.set_field(name, FieldInput::Checked(true)).unwrap();
    }
    form
}

#[tokio::test]
async fn form_backend_receives_flat_payload_and_form_resets() {
    let endpoint = MockEndpoint::start().await;
    let relay = SubmissionRelay::new(RelayTarget::form_backend(endpoint.url("/f/abc")))
        .unwrap();

    let mut form = filled_violation();
    let outcome = relay.submit(&mut form).await.unwrap();

    assert_eq!(outcome.notified, None);
    assert_eq!(form.status(), SubmitStatus::Success);
    assert_eq!(form.record(), &ViolationReport::defaults());

    let requests = endpoint.requests_to("/f/abc");
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "POST");
    assert_eq!(requests[0].header("accept"), Some("application/json"));

    let body = requests[0].json();
    assert_eq!(body["violation_types"], "noise, pet");
    assert_eq!(body["_subject"], "Violation Report: noise, pet - Jane Doe");
    assert_eq!(body["reporter_contact"], "jane@x.com");
}

#[tokio::test]
async fn form_backend_rejection_keeps_record() {
    let endpoint = MockEndpoint::responding(422, r#"{"error":"spam"}"#).await;
    let relay = SubmissionRelay::new(RelayTarget::form_backend(endpoint.url("/f/abc")))
        .unwrap();

    let mut form = filled_contact();
    let before = form.record().clone();

    let err = relay.submit(&mut form).await.unwrap_err();
    assert!(matches!(err, RelayError::Rejected { status: 422, .. }));
    assert_eq!(form.status(), SubmitStatus::Error);
    assert_eq!(form.record(), &before);
}

#[tokio::test]
async fn forwarder_stores_then_notifies_with_bearer_key() {
    let endpoint = MockEndpoint::start().await;
    let relay = SubmissionRelay::new(RelayTarget::forwarder(
        &endpoint.base_url(),
        Some("anon-key".into()),
    ))
    .unwrap();

    let mut form = filled_contact();
    let outcome = relay.submit(&mut form).await.unwrap();
    assert_eq!(outcome.notified, Some(true));

    let requests = endpoint.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].path, STORE_FUNCTION_PATH);
    assert_eq!(requests[1].path, NOTIFY_FUNCTION_PATH);

    for request in &requests {
        assert_eq!(request.header("authorization"), Some("Bearer anon-key"));
        let envelope = request.json();
        assert_eq!(envelope["formType"], "contact");
        assert_eq!(envelope["data"]["name"], "Ada Byron");
        assert_eq!(envelope["data"]["inquiry_type"], "general");
    }
}

#[tokio::test]
async fn forwarder_notify_failure_still_counts_as_submitted() {
    let endpoint = MockEndpoint::start().await;
    endpoint.reply_on(
        NOTIFY_FUNCTION_PATH,
        500,
        r#"{"success":false,"error":"Email sending failed: bad gateway"}"#,
    );
    let relay = SubmissionRelay::new(RelayTarget::forwarder(&endpoint.base_url(), None))
        .unwrap();

    let mut form = filled_nomination();
    let submitted = form.record().clone();
    let outcome = relay.submit(&mut form).await.unwrap();

    assert_eq!(outcome.notified, Some(false));
    assert_eq!(form.status(), SubmitStatus::Success);
    assert_eq!(form.receipt(), Some(&submitted));
    assert!(endpoint.requests()[0].header("authorization").is_none());

    let stored = endpoint.requests_to(STORE_FUNCTION_PATH);
    assert_eq!(stored[0].json()["formType"], "board_nomination");
    assert_eq!(stored[0].json()["data"]["years_at_property"], "3.5");
}

#[tokio::test]
async fn forwarder_store_failure_skips_notify() {
    let endpoint = MockEndpoint::start().await;
    endpoint.reply_on(
        STORE_FUNCTION_PATH,
        500,
        r#"{"success":false,"error":"relation does not exist"}"#,
    );
    let relay = SubmissionRelay::new(RelayTarget::forwarder(&endpoint.base_url(), None))
        .unwrap();

    let mut form = filled_contact();
    let err = relay.submit(&mut form).await.unwrap_err();

    match err {
        RelayError::Rejected { status, body } => {
            assert_eq!(status, 500);
            assert!(body.contains("relation does not exist"));
        }
        other => panic!("expected rejection, got {other:?}"),
    }
    assert!(endpoint.requests_to(NOTIFY_FUNCTION_PATH).is_empty());
    assert_eq!(form.record().name, "Ada Byron");
}

#[tokio::test]
async fn incomplete_form_never_reaches_the_network() {
    let endpoint = MockEndpoint::start().await;
    let relay = SubmissionRelay::new(RelayTarget::form_backend(endpoint.url("/f/abc")))
        .unwrap();

    let mut form = FormState::<ContactSubmission>::new();
    let err = relay.submit(&mut form).await.unwrap_err();

    assert!(matches!(err, RelayError::Submit(SubmitError::Invalid(_))));
    assert_eq!(form.status(), SubmitStatus::Idle);
    assert!(endpoint.requests().is_empty());
}

#[tokio::test]
async fn unreachable_backend_is_a_transport_error() {
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();

    let relay = SubmissionRelay::new(RelayTarget::form_backend(format!("http://{addr}/f/abc")))
        .unwrap();
    let mut form = filled_contact();
    let err = relay.submit(&mut form).await.unwrap_err();

    assert!(matches!(err, RelayError::Transport(_)));
    assert_eq!(form.status(), SubmitStatus::Error);
}
