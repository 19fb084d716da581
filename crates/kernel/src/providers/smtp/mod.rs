//! SMTP provider.
//!
//! Builds a plain-text MIME message with lettre and hands it to a
//! [`SmtpSession`] over a fresh connection. One connection per delivery.

mod channel;
mod session;

use async_trait::async_trait;
use intake_forms::model::Submission;
use lettre::Message;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use tracing::debug;

pub use channel::{Capabilities, LettreChannel, ReplyError, SmtpChannel};
pub use session::{SessionPlan, SmtpSession, SmtpStep};

use super::{Delivery, Provider, ProviderError};
use crate::config::{SmtpConfig, SmtpEncryption};

pub struct SmtpProvider {
    config: SmtpConfig,
}

impl SmtpProvider {
    pub fn new(config: SmtpConfig) -> Self {
        Self { config }
    }

    fn plan(&self) -> SessionPlan {
        SessionPlan {
            starttls: self.config.encryption == SmtpEncryption::StartTls,
            credentials: self.config.credentials.clone(),
            step_timeout: self.config.step_timeout,
        }
    }
}

/// The address a reply should go to, when the submitter left a usable one.
fn reply_to(submission: &Submission) -> Option<Mailbox> {
    let candidate = match submission {
        Submission::Contact(c) => &c.email,
        Submission::Violation(v) => &v.reporter_contact,
        Submission::BoardNomination(n) => &n.nominee_email,
    };
    candidate.trim().parse().ok()
}

/// Render the notification email for `submission`.
pub fn build_message(config: &SmtpConfig, submission: &Submission) -> Result<Message, ProviderError> {
    let mut builder = Message::builder()
        .from(config.from.clone())
        .to(config.to.clone())
        .subject(submission.subject())
        .header(ContentType::TEXT_PLAIN);

    if let Some(reply_to) = reply_to(submission) {
        builder = builder.reply_to(reply_to);
    }

    builder
        .body(submission.text_body())
        .map_err(|e| ProviderError::Message(e.to_string()))
}

#[async_trait]
impl Provider for SmtpProvider {
    fn name(&self) -> &'static str {
        "smtp"
    }

    async fn deliver(&self, submission: &Submission) -> Result<Delivery, ProviderError> {
        let message = build_message(&self.config, submission)?;
        let from = self.config.from.email.clone();
        let to = [self.config.to.email.clone()];

        let mut session = SmtpSession::new(LettreChannel::new(&self.config), self.plan());
        session.run(&from, &to, &message.formatted()).await?;

        debug!(
            host = %self.config.host,
            steps = session.completed().len(),
            "SMTP delivery complete"
        );
        Ok(Delivery::default())
    }
}
