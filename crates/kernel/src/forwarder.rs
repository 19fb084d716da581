//! Notification forwarder: one route, one provider.

use std::sync::Arc;
use std::time::Instant;

use intake_forms::model::Submission;
use tracing::{info, warn};

use crate::metrics::Metrics;
use crate::providers::{Delivery, Provider, ProviderError};

/// Hands submissions to a single provider, recording the outcome.
#[derive(Clone)]
pub struct Forwarder {
    provider: Arc<dyn Provider>,
    metrics: Arc<Metrics>,
}

impl Forwarder {
    pub fn new(provider: Arc<dyn Provider>, metrics: Arc<Metrics>) -> Self {
        Self { provider, metrics }
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Deliver one submission. No retry.
    pub async fn forward(&self, submission: &Submission) -> Result<Delivery, ProviderError> {
        let form_type = submission.form_type();
        let provider = self.provider.name();

        let started = Instant::now();
        let result = self.provider.deliver(submission).await;
        let elapsed = started.elapsed();

        self.metrics.record_delivery(
            form_type.as_str(),
            provider,
            result.is_ok(),
            elapsed.as_secs_f64(),
        );

        match &result {
            Ok(delivery) => info!(
                %form_type,
                provider,
                id = ?delivery.id,
                elapsed_ms = elapsed.as_millis() as u64,
                "submission delivered"
            ),
            Err(e) => warn!(
                %form_type,
                provider,
                error = %e,
                elapsed_ms = elapsed.as_millis() as u64,
                "submission delivery failed"
            ),
        }

        result
    }
}

impl std::fmt::Debug for Forwarder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Forwarder")
            .field("provider", &self.provider.name())
            .finish()
    }
}
