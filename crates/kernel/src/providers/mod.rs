//! Delivery providers behind the forwarder.
//!
//! Each route is wired to exactly one [`Provider`]. Providers are
//! interchangeable: a form backend, an email API, raw SMTP, or the
//! relational store. None of them retry.

pub mod formspree;
pub mod resend;
pub mod smtp;
pub mod store;

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use intake_forms::model::Submission;
use thiserror::Error;

use crate::config::{Config, NotifyConfig};

pub use formspree::FormspreeProvider;
pub use resend::ResendProvider;
pub use smtp::{SmtpProvider, SmtpStep};
pub use store::StoreProvider;

/// A successful delivery.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Delivery {
    /// Identifier handed back by the provider (row id, message id), if any.
    pub id: Option<String>,
}

/// Provider failures.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{0} not configured")]
    NotConfigured(&'static str),

    #[error("{provider} request failed: {source}")]
    Transport {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// Non-2xx answer. `detail` is what the provider said, passed through.
    #[error("{provider} request failed: {detail}")]
    Rejected {
        provider: &'static str,
        status: u16,
        detail: String,
    },

    #[error("SMTP {step} failed: {message}")]
    Smtp { step: SmtpStep, message: String },

    #[error("SMTP {step} timed out")]
    Timeout { step: SmtpStep },

    #[error("failed to build message: {0}")]
    Message(String),

    #[error("{0}")]
    Database(#[from] sqlx::Error),
}

/// A delivery mechanism for normalized submissions.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Short name for logs and metrics labels.
    fn name(&self) -> &'static str;

    /// Deliver one submission. Exactly one attempt.
    async fn deliver(&self, submission: &Submission) -> Result<Delivery, ProviderError>;
}

/// Shared HTTP client for provider calls.
pub fn http_client(config: &Config) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(config.provider_timeout)
        .build()
        .context("failed to build HTTP client")
}

/// Build the notify provider named by the configuration.
pub fn notify_provider(
    config: &Config,
    client: &reqwest::Client,
) -> Option<Arc<dyn Provider>> {
    match &config.notify {
        NotifyConfig::None => None,
        NotifyConfig::Formspree { endpoint } => Some(Arc::new(FormspreeProvider::new(
            client.clone(),
            endpoint.clone(),
        ))),
        NotifyConfig::Resend(resend) => Some(Arc::new(ResendProvider::new(
            client.clone(),
            resend.clone(),
        ))),
        NotifyConfig::Smtp(smtp) => Some(Arc::new(SmtpProvider::new(smtp.clone()))),
    }
}

/// Status and body of a non-2xx response.
pub(crate) async fn rejection_body(response: reqwest::Response) -> (u16, String) {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    (status.as_u16(), body)
}
