//! Submission relay: turns a validated form into outbound HTTP calls.
//!
//! Exactly one attempt per submission. There is no retry, backoff or
//! idempotency key; resubmitting after an error is a brand new submission
//! as far as the receiving backend is concerned.

use std::time::Duration;

use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::form::{FormRecord, FormState, SubmitError};
use crate::model::Submission;

/// Store function path under a functions base URL.
pub const STORE_FUNCTION_PATH: &str = "/functions/v1/submit-form";

/// Notify function path under a functions base URL.
pub const NOTIFY_FUNCTION_PATH: &str = "/functions/v1/send-email";

/// Where a form's submissions go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayTarget {
    /// Post the flat record plus a `_subject` line straight to a form backend.
    FormBackend { endpoint: String },

    /// Post the `{formType, data}` envelope to the store function and, once
    /// stored, to the notify function.
    Forwarder {
        store_url: String,
        notify_url: String,
        api_key: Option<String>,
    },
}

impl RelayTarget {
    pub fn form_backend(endpoint: impl Into<String>) -> Self {
        RelayTarget::FormBackend {
            endpoint: endpoint.into(),
        }
    }

    /// Forwarder functions hosted under `base_url`.
    pub fn forwarder(base_url: &str, api_key: Option<String>) -> Self {
        let base = base_url.trim_end_matches('/');
        RelayTarget::Forwarder {
            store_url: format!("{base}{STORE_FUNCTION_PATH}"),
            notify_url: format!("{base}{NOTIFY_FUNCTION_PATH}"),
            api_key,
        }
    }
}

/// Result of a relayed submission that was accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelayOutcome {
    /// For forwarder targets: whether the notify call also succeeded.
    /// `None` for targets without a separate notify leg.
    pub notified: Option<bool>,
}

/// Relay errors.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error(transparent)]
    Submit(#[from] SubmitError),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("submission rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("failed to encode submission: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Sends submissions for one target.
#[derive(Debug, Clone)]
pub struct SubmissionRelay {
    client: reqwest::Client,
    target: RelayTarget,
}

impl SubmissionRelay {
    /// Create a relay with a 30 second request timeout.
    pub fn new(target: RelayTarget) -> Result<Self, RelayError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self::with_client(client, target))
    }

    pub fn with_client(client: reqwest::Client, target: RelayTarget) -> Self {
        Self { client, target }
    }

    pub fn target(&self) -> &RelayTarget {
        &self.target
    }

    /// Validate, send and record the outcome on `form`.
    ///
    /// On success the form resets (keeping a receipt snapshot where the form
    /// wants one); on failure the record is left exactly as entered.
    pub async fn submit<R: FormRecord>(
        &self,
        form: &mut FormState<R>,
    ) -> Result<RelayOutcome, RelayError> {
        let record = form.begin_submit()?;
        let result = self.send(record.into()).await;

        match &result {
            Ok(_) => info!(form_type = %R::FORM_TYPE, "submission accepted"),
            Err(e) => warn!(form_type = %R::FORM_TYPE, error = %e, "submission failed"),
        }

        form.complete(result.is_ok());
        result
    }

    /// Send one submission to the target. Exactly one attempt per call.
    pub async fn send(&self, submission: Submission) -> Result<RelayOutcome, RelayError> {
        match &self.target {
            RelayTarget::FormBackend { endpoint } => {
                let payload = form_backend_payload(&submission)?;
                let response = self
                    .client
                    .post(endpoint)
                    .header("Accept", "application/json")
                    .json(&payload)
                    .send()
                    .await?;
                ensure_success(response).await?;
                Ok(RelayOutcome { notified: None })
            }
            RelayTarget::Forwarder {
                store_url,
                notify_url,
                api_key,
            } => {
                let response = self
                    .authorized(self.client.post(store_url), api_key.as_deref())
                    .json(&submission)
                    .send()
                    .await?;
                ensure_success(response).await?;

                let notified = match self
                    .authorized(self.client.post(notify_url), api_key.as_deref())
                    .json(&submission)
                    .send()
                    .await
                {
                    Ok(response) => match ensure_success(response).await {
                        Ok(()) => true,
                        Err(e) => {
                            warn!(error = %e, "submission stored but notification failed");
                            false
                        }
                    },
                    Err(e) => {
                        warn!(error = %e, "submission stored but notification failed");
                        false
                    }
                };

                Ok(RelayOutcome {
                    notified: Some(notified),
                })
            }
        }
    }

    fn authorized(
        &self,
        request: reqwest::RequestBuilder,
        api_key: Option<&str>,
    ) -> reqwest::RequestBuilder {
        match api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }
}

async fn ensure_success(response: reqwest::Response) -> Result<(), RelayError> {
    let status = response.status();
    if status.is_success() {
        debug!(status = status.as_u16(), "relay request succeeded");
        return Ok(());
    }
    let body = response.text().await.unwrap_or_default();
    Err(RelayError::Rejected {
        status: status.as_u16(),
        body,
    })
}

/// Flat payload for a form backend: the record's fields plus `_subject`.
///
/// Violation types become one `", "`-joined string in selection order and
/// nomination acknowledgements become `"Yes"`/`"No"`.
pub fn form_backend_payload(submission: &Submission) -> Result<Value, serde_json::Error> {
    let (mut fields, subject) = match submission {
        Submission::Contact(c) => (
            to_object(serde_json::to_value(c)?),
            format!("New Contact Form Submission from {}", c.name),
        ),
        Submission::Violation(v) => {
            let joined = v.violation_types.joined();
            let mut fields = to_object(serde_json::to_value(v)?);
            fields.insert("violation_types".into(), Value::String(joined.clone()));
            (
                fields,
                format!("Violation Report: {joined} - {}", v.reporter_name),
            )
        }
        Submission::BoardNomination(n) => {
            let mut fields = to_object(serde_json::to_value(n)?);
            for (key, flag) in [
                ("acknowledged_terms", n.acknowledged_terms),
                ("acknowledged_commitment", n.acknowledged_commitment),
                ("acknowledged_attendance", n.acknowledged_attendance),
            ] {
                let answer = if flag { "Yes" } else { "No" };
                fields.insert(key.into(), Value::String(answer.into()));
            }
            (
                fields,
                format!("Board Nomination Application - {}", n.nominee_name),
            )
        }
    };

    fields.insert("_subject".into(), Value::String(subject));
    Ok(Value::Object(fields))
}

fn to_object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}
