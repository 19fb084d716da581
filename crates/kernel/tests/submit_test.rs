#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Forwarder route tests.
//!
//! The real router runs in-process; providers are local doubles, so no
//! network or database is needed.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use serde_json::json;

use intake_forms::model::{Submission, YearsAtProperty};
use intake_forms::relay::{NOTIFY_FUNCTION_PATH, STORE_FUNCTION_PATH};
use intake_test_utils::{
    assert, contact_submission, nomination_submission, violation_submission,
};

mod common;
use common::{RecordingProvider, TestApp, body_bytes, body_json};

// =============================================================================
// Notify route
// =============================================================================

#[tokio::test]
async fn violation_report_is_emailed_through_form_backend() {
    let (app, backend) = TestApp::with_form_backend().await;

    let (status, body) = app
        .post_json(NOTIFY_FUNCTION_PATH, &violation_submission().body())
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "message": "Email sent successfully"}));

    let sent = backend.requests();
    assert_eq!(sent.len(), 1);
    let payload = sent[0].json();
    assert_eq!(payload["subject"], "New Violation Report - Unknown");
    assert_eq!(payload["reporter_name"], "Jane Doe");
    assert_eq!(payload["violator_name"], "N/A");
    assert_eq!(payload["violation_types"], "noise, pet");
    assert_eq!(payload["report_date"], "2024-05-01");
}

#[tokio::test]
async fn contact_notification_omits_board_fields_for_general_inquiries() {
    let (app, backend) = TestApp::with_form_backend().await;

    let (status, _) = app
        .post_json(NOTIFY_FUNCTION_PATH, &contact_submission().body())
        .await;
    assert_eq!(status, StatusCode::OK);

    let payload = backend.requests()[0].json();
    assert_eq!(payload["subject"], "New Contact Form Submission from Ada Byron");
    assert_eq!(payload["phone"], "N/A");
    assert!(payload.get("board_position").is_none());
    assert!(payload.get("property_address").is_none());
}

#[tokio::test]
async fn contact_board_inquiry_includes_board_fields() {
    let (app, backend) = TestApp::with_form_backend().await;

    let submission = contact_submission()
        .with_field("inquiry_type", json!("board_nomination"))
        .with_field("property_address", json!("10 Oak St"))
        .with_field("board_position", json!("treasurer"))
        .with_field("years_at_property", json!(2.5))
        .with_field("number_of_units", json!("12"));

    let (status, _) = app.post_json(NOTIFY_FUNCTION_PATH, &submission.body()).await;
    assert_eq!(status, StatusCode::OK);

    let payload = backend.requests()[0].json();
    assert_eq!(payload["board_position"], "treasurer");
    assert_eq!(payload["years_at_property"], "2.5");
    assert_eq!(payload["number_of_units"], "12");
    assert_eq!(payload["previous_experience"], "N/A");
}

#[tokio::test]
async fn provider_rejection_answers_500_with_reason() {
    let (app, _backend) =
        TestApp::with_form_backend_responding(502, r#"{"error":"upstream"}"#).await;

    let (status, body) = app
        .post_json(NOTIFY_FUNCTION_PATH, &violation_submission().body())
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        assert::failure(&body),
        "formspree request failed: Bad Gateway"
    );
}

#[tokio::test]
async fn unwired_notify_route_answers_not_configured() {
    let app = TestApp::with_providers(None, None);

    let (status, body) = app
        .post_json(NOTIFY_FUNCTION_PATH, &contact_submission().body())
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        assert::failure(&body),
        "notification provider not configured"
    );
}

// =============================================================================
// Store route
// =============================================================================

#[tokio::test]
async fn store_route_hands_parsed_submission_to_store() {
    let store = Arc::new(RecordingProvider::default());
    let app = TestApp::with_providers(Some(store.clone()), None);

    let (status, body) = app
        .post_json(STORE_FUNCTION_PATH, &nomination_submission().body())
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"success": true, "message": "Form submitted successfully"})
    );

    let delivered = store.delivered();
    assert_eq!(delivered.len(), 1);
    match &delivered[0] {
        Submission::BoardNomination(n) => {
            assert_eq!(n.nominee_name, "Grace Hopper");
            assert_eq!(n.years_at_property, Some(YearsAtProperty::from_half_years(7)));
            assert!(n.acknowledged_attendance);
        }
        other => panic!("expected a nomination, got {other:?}"),
    }
}

#[tokio::test]
async fn store_failure_passes_message_through() {
    let store = Arc::new(RecordingProvider::failing("duplicate key"));
    let app = TestApp::with_providers(Some(store), None);

    let (status, body) = app
        .post_json(STORE_FUNCTION_PATH, &violation_submission().body())
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert::contains(assert::failure(&body), "duplicate key");
}

#[tokio::test]
async fn routes_are_wired_independently() {
    let store = Arc::new(RecordingProvider::default());
    let app = TestApp::with_providers(Some(store.clone()), None);

    let (stored, _) = app
        .post_json(STORE_FUNCTION_PATH, &contact_submission().body())
        .await;
    let (notified, _) = app
        .post_json(NOTIFY_FUNCTION_PATH, &contact_submission().body())
        .await;

    assert_eq!(stored, StatusCode::OK);
    assert_eq!(notified, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(store.delivered().len(), 1);
}

// =============================================================================
// Envelope parsing
// =============================================================================

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let store = Arc::new(RecordingProvider::default());
    let app = TestApp::with_providers(Some(store.clone()), None);

    let (status, body) = app.post_json(STORE_FUNCTION_PATH, "{not json").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(store.delivered().is_empty());
}

#[tokio::test]
async fn unknown_form_type_is_a_bad_request() {
    let store = Arc::new(RecordingProvider::default());
    let app = TestApp::with_providers(Some(store.clone()), None);

    let body = json!({"formType": "newsletter", "data": {}}).to_string();
    let (status, body) = app.post_json(STORE_FUNCTION_PATH, &body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert::contains(assert::failure(&body), "newsletter");
    assert!(store.delivered().is_empty());
}

#[tokio::test]
async fn missing_required_field_is_a_bad_request() {
    let store = Arc::new(RecordingProvider::default());
    let app = TestApp::with_providers(Some(store.clone()), None);

    let submission = violation_submission().without_field("reporter_name");
    let (status, _) = app.post_json(STORE_FUNCTION_PATH, &submission.body()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(store.delivered().is_empty());
}

#[tokio::test]
async fn blank_report_date_becomes_today() {
    let store = Arc::new(RecordingProvider::default());
    let app = TestApp::with_providers(Some(store.clone()), None);

    let submission = violation_submission().with_field("report_date", json!(""));
    let (status, _) = app.post_json(STORE_FUNCTION_PATH, &submission.body()).await;
    assert_eq!(status, StatusCode::OK);

    match &store.delivered()[0] {
        Submission::Violation(v) => {
            assert_eq!(v.report_date, chrono::Utc::now().date_naive());
            assert_eq!(v.violator_name, None);
        }
        other => panic!("expected a violation report, got {other:?}"),
    }
}

// =============================================================================
// OPTIONS and CORS
// =============================================================================

#[tokio::test]
async fn plain_options_answers_empty_200() {
    let app = TestApp::with_providers(None, None);

    for path in [STORE_FUNCTION_PATH, NOTIFY_FUNCTION_PATH] {
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri(path)
            .body(Body::empty())
            .unwrap();
        let response = app.request(request).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_bytes(response).await.is_empty());
    }
}

#[tokio::test]
async fn preflight_allows_any_origin_by_default() {
    let app = TestApp::with_providers(None, None);

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri(NOTIFY_FUNCTION_PATH)
        .header("origin", "https://stellar.example.com")
        .header("access-control-request-method", "POST")
        .header("access-control-request-headers", "content-type,apikey")
        .body(Body::empty())
        .unwrap();
    let response = app.request(request).await;

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(headers["access-control-allow-origin"], "*");
    let allowed = headers["access-control-allow-headers"]
        .to_str()
        .unwrap()
        .to_lowercase();
    assert::contains(&allowed, "apikey");
    assert::contains(&allowed, "x-client-info");
}

#[tokio::test]
async fn success_response_carries_cors_header() {
    let (app, _backend) = TestApp::with_form_backend().await;

    let request = Request::post(NOTIFY_FUNCTION_PATH)
        .header("content-type", "application/json")
        .header("origin", "https://stellar.example.com")
        .body(Body::from(contact_submission().body()))
        .unwrap();
    let response = app.request(request).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
}

// =============================================================================
// Health and metrics
// =============================================================================

#[tokio::test]
async fn health_reports_wiring_without_a_database() {
    let (app, _backend) = TestApp::with_form_backend().await;

    let response = app
        .request(Request::get("/health").body(Body::empty()).unwrap())
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert!(body["postgres"].is_null());
    assert_eq!(body["notify"], "formspree");
    assert!(body["store"].is_null());
}

#[tokio::test]
async fn metrics_count_deliveries() {
    let (app, _backend) = TestApp::with_form_backend().await;
    app.post_json(NOTIFY_FUNCTION_PATH, &violation_submission().body())
        .await;

    let response = app
        .request(Request::get("/metrics").body(Body::empty()).unwrap())
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let text = String::from_utf8(body_bytes(response).await).unwrap();
    assert::contains(
        &text,
        r#"intake_submissions_total{form_type="violation",provider="formspree",outcome="success"} 1"#,
    );
}
