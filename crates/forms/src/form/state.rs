//! Per-form submission status machine.

use std::time::{Duration, Instant};

use super::{FieldError, FieldInput, FormRecord, ValidationErrors};

/// How long a success or error banner stays up before the form returns to idle.
pub const DEFAULT_STATUS_DISPLAY: Duration = Duration::from_secs(5);

/// Submission status of one form instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitStatus {
    Idle,
    Submitting,
    Success,
    Error,
}

/// Why a submission could not start.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    #[error("a submission is already in flight")]
    InFlight,

    #[error("form is incomplete: {0}")]
    Invalid(#[from] ValidationErrors),
}

/// Holds one form's record and its submission status.
///
/// Status moves idle → submitting → success | error. Success and error fall
/// back to idle after the display window or on the next edit. At most one
/// submission is in flight at a time.
#[derive(Debug, Clone)]
pub struct FormState<R: FormRecord> {
    record: R,
    status: SubmitStatus,
    finished_at: Option<Instant>,
    display_for: Duration,
    in_flight: Option<R>,
    receipt: Option<R>,
}

impl<R: FormRecord> Default for FormState<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: FormRecord> FormState<R> {
    /// A fresh form holding the default record.
    pub fn new() -> Self {
        Self {
            record: R::defaults(),
            status: SubmitStatus::Idle,
            finished_at: None,
            display_for: DEFAULT_STATUS_DISPLAY,
            in_flight: None,
            receipt: None,
        }
    }

    /// Override how long success/error stays visible.
    pub fn with_status_display(mut self, display_for: Duration) -> Self {
        self.display_for = display_for;
        self
    }

    /// Start from an existing record instead of the defaults.
    pub fn with_record(mut self, record: R) -> Self {
        self.record = record;
        self
    }

    pub fn record(&self) -> &R {
        &self.record
    }

    /// Current status, after applying the display window.
    pub fn status(&self) -> SubmitStatus {
        match (self.status, self.finished_at) {
            (SubmitStatus::Success | SubmitStatus::Error, Some(at))
                if at.elapsed() >= self.display_for =>
            {
                SubmitStatus::Idle
            }
            (status, _) => status,
        }
    }

    /// Whether the submit control is enabled.
    pub fn can_submit(&self) -> bool {
        self.status != SubmitStatus::Submitting
    }

    /// Snapshot of the last successfully submitted record, for forms that
    /// print a receipt.
    pub fn receipt(&self) -> Option<&R> {
        self.receipt.as_ref()
    }

    /// Apply an input event. A finished status returns to idle.
    pub fn set_field(&mut self, name: &str, input: FieldInput) -> Result<(), FieldError> {
        let mut updated = self.record.clone();
        updated.set_field(name, input)?;
        self.record = updated;
        self.clear_finished();
        Ok(())
    }

    /// Restore the default record.
    pub fn reset(&mut self) {
        self.record = R::defaults();
        self.clear_finished();
    }

    /// Validate and mark the form as submitting.
    ///
    /// Returns the record to send and drops the previous receipt. Fails
    /// without changing state when a submission is already in flight or the
    /// record is incomplete.
    pub fn begin_submit(&mut self) -> Result<R, SubmitError> {
        if self.status == SubmitStatus::Submitting {
            return Err(SubmitError::InFlight);
        }
        self.record.validate()?;

        let snapshot = self.record.clone();
        self.in_flight = Some(snapshot.clone());
        self.receipt = None;
        self.status = SubmitStatus::Submitting;
        self.finished_at = None;
        Ok(snapshot)
    }

    /// Record the outcome of the in-flight submission.
    ///
    /// On success the form resets to defaults and, for receipt-keeping
    /// forms, the submitted record is kept. On failure the record stays as
    /// entered. Ignored when nothing is in flight.
    pub fn complete(&mut self, succeeded: bool) {
        let Some(submitted) = self.in_flight.take() else {
            return;
        };

        if succeeded {
            if R::KEEPS_RECEIPT {
                self.receipt = Some(submitted);
            }
            self.record = R::defaults();
            self.status = SubmitStatus::Success;
        } else {
            self.status = SubmitStatus::Error;
        }
        self.finished_at = Some(Instant::now());
    }

    fn clear_finished(&mut self) {
        if matches!(self.status, SubmitStatus::Success | SubmitStatus::Error) {
            self.status = SubmitStatus::Idle;
            self.finished_at = None;
        }
    }
}
