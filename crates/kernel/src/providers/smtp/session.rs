//! One SMTP conversation, driven as an explicit state machine.
//!
//! The session decides which step comes next and bounds every step with
//! the same timeout; the [`SmtpChannel`] performs the I/O. A failing step
//! ends the conversation with an error naming that step.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use lettre::Address;
use tracing::{debug, warn};

use super::channel::{Capabilities, ReplyError, SmtpChannel};
use crate::providers::ProviderError;

/// Protocol steps, in conversation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SmtpStep {
    Greeting,
    Hello,
    TlsUpgrade,
    Auth,
    MailFrom,
    RcptTo,
    Data,
    Quit,
}

impl SmtpStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            SmtpStep::Greeting => "greeting",
            SmtpStep::Hello => "EHLO",
            SmtpStep::TlsUpgrade => "STARTTLS",
            SmtpStep::Auth => "AUTH",
            SmtpStep::MailFrom => "MAIL FROM",
            SmtpStep::RcptTo => "RCPT TO",
            SmtpStep::Data => "DATA",
            SmtpStep::Quit => "QUIT",
        }
    }
}

impl fmt::Display for SmtpStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the conversation must include beyond the message itself.
#[derive(Debug, Clone)]
pub struct SessionPlan {
    /// Upgrade with STARTTLS after EHLO. The server must advertise it.
    pub starttls: bool,
    /// Username and password for AUTH.
    pub credentials: Option<(String, String)>,
    pub step_timeout: Duration,
}

pub struct SmtpSession<C> {
    channel: C,
    plan: SessionPlan,
    completed: Vec<SmtpStep>,
}

impl<C: SmtpChannel> SmtpSession<C> {
    pub fn new(channel: C, plan: SessionPlan) -> Self {
        Self {
            channel,
            plan,
            completed: Vec::new(),
        }
    }

    /// Steps that finished successfully, in order.
    pub fn completed(&self) -> &[SmtpStep] {
        &self.completed
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }

    /// Deliver `message` from `from` to every address in `to`.
    ///
    /// Once DATA is accepted the message counts as delivered; a failed QUIT
    /// is logged and ignored.
    pub async fn run(
        &mut self,
        from: &Address,
        to: &[Address],
        message: &[u8],
    ) -> Result<(), ProviderError> {
        if to.is_empty() {
            return Err(ProviderError::Message("no recipients".to_string()));
        }

        let limit = self.plan.step_timeout;
        let mut capabilities = Capabilities::default();
        let mut next_recipient = 0;
        let mut step = Some(SmtpStep::Greeting);

        while let Some(current) = step {
            step = match current {
                SmtpStep::Greeting => {
                    bounded(current, limit, self.channel.greet()).await?;
                    Some(SmtpStep::Hello)
                }
                SmtpStep::Hello => {
                    capabilities = bounded(current, limit, self.channel.hello()).await?;
                    Some(self.after_hello())
                }
                SmtpStep::TlsUpgrade => {
                    if !capabilities.starttls {
                        return Err(refused(current, "server does not advertise STARTTLS"));
                    }
                    capabilities = bounded(current, limit, self.channel.starttls()).await?;
                    Some(self.after_tls())
                }
                SmtpStep::Auth => {
                    if !capabilities.auth {
                        return Err(refused(
                            current,
                            "server does not advertise a supported AUTH mechanism",
                        ));
                    }
                    if let Some((username, password)) = &self.plan.credentials {
                        bounded(current, limit, self.channel.auth(username, password)).await?;
                    }
                    Some(SmtpStep::MailFrom)
                }
                SmtpStep::MailFrom => {
                    bounded(current, limit, self.channel.mail_from(from)).await?;
                    Some(SmtpStep::RcptTo)
                }
                SmtpStep::RcptTo => {
                    bounded(current, limit, self.channel.rcpt_to(&to[next_recipient])).await?;
                    next_recipient += 1;
                    if next_recipient < to.len() {
                        Some(SmtpStep::RcptTo)
                    } else {
                        Some(SmtpStep::Data)
                    }
                }
                SmtpStep::Data => {
                    bounded(current, limit, self.channel.data(message)).await?;
                    Some(SmtpStep::Quit)
                }
                SmtpStep::Quit => {
                    if let Err(e) = bounded(current, limit, self.channel.quit()).await {
                        warn!(error = %e, "message accepted but QUIT failed");
                        return Ok(());
                    }
                    None
                }
            };

            debug!(step = %current, "SMTP step complete");
            self.completed.push(current);
        }

        Ok(())
    }

    fn after_hello(&self) -> SmtpStep {
        if self.plan.starttls {
            SmtpStep::TlsUpgrade
        } else {
            self.after_tls()
        }
    }

    fn after_tls(&self) -> SmtpStep {
        if self.plan.credentials.is_some() {
            SmtpStep::Auth
        } else {
            SmtpStep::MailFrom
        }
    }
}

fn refused(step: SmtpStep, message: &str) -> ProviderError {
    ProviderError::Smtp {
        step,
        message: message.to_string(),
    }
}

/// Run one step under the step timeout.
async fn bounded<T, F>(step: SmtpStep, limit: Duration, future: F) -> Result<T, ProviderError>
where
    F: Future<Output = Result<T, ReplyError>>,
{
    match tokio::time::timeout(limit, future).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(ReplyError(message))) => Err(ProviderError::Smtp { step, message }),
        Err(_) => Err(ProviderError::Timeout { step }),
    }
}
