//! Email API provider (Resend-compatible).

use async_trait::async_trait;
use intake_forms::model::Submission;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Delivery, Provider, ProviderError, rejection_body};
use crate::config::ResendConfig;

const NAME: &str = "resend";

#[derive(Serialize)]
struct SendEmail<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: String,
    text: String,
}

#[derive(Deserialize)]
struct SendEmailResponse {
    id: Option<String>,
}

pub struct ResendProvider {
    client: reqwest::Client,
    config: ResendConfig,
}

impl ResendProvider {
    pub fn new(client: reqwest::Client, config: ResendConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl Provider for ResendProvider {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn deliver(&self, submission: &Submission) -> Result<Delivery, ProviderError> {
        let email = SendEmail {
            from: &self.config.from,
            to: [&self.config.to],
            subject: submission.subject(),
            text: submission.text_body(),
        };

        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .json(&email)
            .send()
            .await
            .map_err(|source| ProviderError::Transport {
                provider: NAME,
                source,
            })?;

        if !response.status().is_success() {
            let (status, detail) = rejection_body(response).await;
            return Err(ProviderError::Rejected {
                provider: NAME,
                status,
                detail,
            });
        }

        let id = response
            .json::<SendEmailResponse>()
            .await
            .ok()
            .and_then(|r| r.id);
        debug!(id = ?id, "email API accepted message");

        Ok(Delivery { id })
    }
}
