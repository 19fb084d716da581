//! Intake forms
//!
//! Submission records shared with the forwarder, client-side form state,
//! the submission relay, and the printable nomination receipt.

pub mod form;
pub mod model;
pub mod receipt;
pub mod relay;

pub mod prelude {
    pub use crate::form::{FieldInput, FormRecord, FormState, SubmitStatus};
    pub use crate::model::*;
    pub use crate::receipt::ReceiptRenderer;
    pub use crate::relay::{RelayOutcome, RelayTarget, SubmissionRelay};
}
