//! Prometheus metrics collection.
//!
//! Counts relayed submissions and times provider deliveries.

use prometheus_client::encoding::{EncodeLabelSet, text::encode};
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::family::Family;
use prometheus_client::metrics::histogram::{Histogram, exponential_buckets};
use prometheus_client::registry::Registry;

/// Submission outcome labels.
#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct SubmissionLabels {
    pub form_type: String,
    pub provider: String,
    pub outcome: String,
}

/// Provider labels.
#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct ProviderLabels {
    pub provider: String,
}

/// Application metrics.
pub struct Metrics {
    registry: Registry,

    /// Submissions by form type, provider and outcome.
    pub submissions: Family<SubmissionLabels, Counter>,

    /// Time spent inside a provider's delivery.
    pub delivery_duration_seconds: Family<ProviderLabels, Histogram>,
}

impl Metrics {
    /// Create a new metrics registry.
    pub fn new() -> Self {
        let mut registry = Registry::default();

        let submissions = Family::<SubmissionLabels, Counter>::default();
        registry.register(
            "intake_submissions",
            "Submissions handed to a provider",
            submissions.clone(),
        );

        let delivery_duration_seconds =
            Family::<ProviderLabels, Histogram>::new_with_constructor(|| {
                Histogram::new(exponential_buckets(0.005, 2.0, 14))
            });
        registry.register(
            "intake_delivery_duration_seconds",
            "Provider delivery duration in seconds",
            delivery_duration_seconds.clone(),
        );

        Self {
            registry,
            submissions,
            delivery_duration_seconds,
        }
    }

    /// Record one delivery attempt.
    pub fn record_delivery(
        &self,
        form_type: &str,
        provider: &str,
        succeeded: bool,
        duration_secs: f64,
    ) {
        let outcome = if succeeded { "success" } else { "error" };
        self.submissions
            .get_or_create(&SubmissionLabels {
                form_type: form_type.to_string(),
                provider: provider.to_string(),
                outcome: outcome.to_string(),
            })
            .inc();

        self.delivery_duration_seconds
            .get_or_create(&ProviderLabels {
                provider: provider.to_string(),
            })
            .observe(duration_secs);
    }

    /// Encode metrics in Prometheus text format.
    ///
    /// # Panics
    ///
    /// Panics if Prometheus metric encoding to a `String` buffer fails.
    /// The `fmt::Write` impl for `String` is infallible, and all metric
    /// labels use derived `EncodeLabelSet` impls that do not produce
    /// `fmt::Error`.
    pub fn encode(&self) -> String {
        let mut buffer = String::new();
        // Prometheus encoding to String buffer is infallible
        #[allow(clippy::expect_used)]
        encode(&mut buffer, &self.registry).expect("encoding metrics");
        buffer
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Metrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Metrics").finish()
    }
}

#[cfg(test)]
// Tests are allowed to use unwrap/expect freely.
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_record_delivery() {
        let metrics = Metrics::new();
        metrics.record_delivery("violation", "formspree", true, 0.12);
        metrics.record_delivery("violation", "formspree", false, 0.5);

        let output = metrics.encode();
        assert!(output.contains("intake_submissions_total"));
        assert!(output.contains(r#"outcome="success""#));
        assert!(output.contains(r#"outcome="error""#));
        assert!(output.contains("intake_delivery_duration_seconds_bucket"));
    }
}
