//! Form backend provider.
//!
//! Posts the rendered notification (subject plus labelled fields, `N/A` for
//! blanks) as JSON and lets the backend turn it into an email.

use async_trait::async_trait;
use intake_forms::model::Submission;
use tracing::debug;

use super::{Delivery, Provider, ProviderError};

const NAME: &str = "formspree";

pub struct FormspreeProvider {
    client: reqwest::Client,
    endpoint: String,
}

impl FormspreeProvider {
    pub fn new(client: reqwest::Client, endpoint: String) -> Self {
        Self { client, endpoint }
    }
}

#[async_trait]
impl Provider for FormspreeProvider {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn deliver(&self, submission: &Submission) -> Result<Delivery, ProviderError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("Accept", "application/json")
            .json(&submission.notification_json())
            .send()
            .await
            .map_err(|source| ProviderError::Transport {
                provider: NAME,
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            // The backend's error body is not surfaced; the status text is.
            return Err(ProviderError::Rejected {
                provider: NAME,
                status: status.as_u16(),
                detail: status
                    .canonical_reason()
                    .unwrap_or("unknown status")
                    .to_string(),
            });
        }

        debug!(status = status.as_u16(), "form backend accepted notification");
        Ok(Delivery::default())
    }
}
