#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Common test utilities for integration tests.
//!
//! [`TestApp`] wraps the REAL router and state from the kernel; only the
//! providers are swapped for local doubles (a recording provider or a
//! [`MockEndpoint`] standing in for a third-party API).

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum::response::Response;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use intake_forms::model::Submission;
use intake_kernel::config::Config;
use intake_kernel::metrics::Metrics;
use intake_kernel::providers::{Delivery, FormspreeProvider, Provider, ProviderError};
use intake_kernel::{AppState, app};
use intake_test_utils::MockEndpoint;

/// Provider double that keeps every submission it was handed.
#[derive(Default)]
pub struct RecordingProvider {
    delivered: Mutex<Vec<Submission>>,
    fail_with: Option<String>,
}

impl RecordingProvider {
    /// A provider whose every delivery fails with `message`.
    pub fn failing(message: &str) -> Self {
        Self {
            delivered: Mutex::new(Vec::new()),
            fail_with: Some(message.to_string()),
        }
    }

    pub fn delivered(&self) -> Vec<Submission> {
        self.delivered.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provider for RecordingProvider {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn deliver(&self, submission: &Submission) -> Result<Delivery, ProviderError> {
        self.delivered.lock().unwrap().push(submission.clone());
        match &self.fail_with {
            Some(message) => Err(ProviderError::Rejected {
                provider: "recording",
                status: 500,
                detail: message.clone(),
            }),
            None => Ok(Delivery {
                id: Some("row-1".to_string()),
            }),
        }
    }
}

/// Test application wrapper using the REAL kernel routes and state.
pub struct TestApp {
    router: Router,
    pub state: AppState,
}

impl TestApp {
    /// Build the app around the given providers.
    pub fn with_providers(
        store: Option<Arc<dyn Provider>>,
        notify: Option<Arc<dyn Provider>>,
    ) -> Self {
        let config = Config::from_lookup(|_| None).expect("default config");
        let state = AppState::from_parts(None, store, notify, Arc::new(Metrics::new()));
        let router = app(state.clone(), &config);
        Self { router, state }
    }

    /// App whose notify route posts to a local form backend.
    pub async fn with_form_backend() -> (Self, MockEndpoint) {
        Self::with_form_backend_responding(200, r#"{"ok":true}"#).await
    }

    pub async fn with_form_backend_responding(status: u16, body: &str) -> (Self, MockEndpoint) {
        let backend = MockEndpoint::responding(status, body).await;
        let provider = FormspreeProvider::new(reqwest::Client::new(), backend.url("/f/test"));
        (Self::with_providers(None, Some(Arc::new(provider))), backend)
    }

    /// Send a request to the app.
    pub async fn request(&self, request: Request<Body>) -> Response {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request")
    }

    /// POST a raw JSON body and return status plus parsed body.
    pub async fn post_json(&self, path: &str, body: &str) -> (StatusCode, Value) {
        let request = Request::post(path)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = self.request(request).await;
        let status = response.status();
        (status, body_json(response).await)
    }
}

/// Read a response body to bytes.
pub async fn body_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .expect("failed to read body")
        .to_bytes()
        .to_vec()
}

/// Read a response body as JSON.
pub async fn body_json(response: Response) -> Value {
    let bytes = body_bytes(response).await;
    serde_json::from_slice(&bytes).unwrap_or_else(|e| {
        panic!(
            "response is not JSON ({e}): {}",
            String::from_utf8_lossy(&bytes)
        )
    })
}
