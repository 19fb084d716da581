//! I/O side of the SMTP conversation.

use std::time::Duration;

use async_trait::async_trait;
use lettre::Address;
use lettre::transport::smtp::authentication::{Credentials, Mechanism};
use lettre::transport::smtp::client::{AsyncSmtpConnection, TlsParameters};
use lettre::transport::smtp::commands::{Data, Mail, Rcpt};
use lettre::transport::smtp::extension::ClientId;

use crate::config::{SmtpConfig, SmtpEncryption};

const MECHANISMS: &[Mechanism] = &[Mechanism::Plain, Mechanism::Login];

/// What the server advertised in its EHLO reply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    pub starttls: bool,
    /// At least one mechanism we can use.
    pub auth: bool,
}

/// A negative or unreadable server reply, as text.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct ReplyError(pub String);

impl From<lettre::transport::smtp::Error> for ReplyError {
    fn from(e: lettre::transport::smtp::Error) -> Self {
        ReplyError(e.to_string())
    }
}

/// Performs one protocol step per call.
#[async_trait]
pub trait SmtpChannel: Send {
    /// Connect and read the server greeting.
    async fn greet(&mut self) -> Result<(), ReplyError>;

    /// Introduce ourselves and report the server's extensions.
    async fn hello(&mut self) -> Result<Capabilities, ReplyError>;

    /// Upgrade to TLS and introduce ourselves again.
    async fn starttls(&mut self) -> Result<Capabilities, ReplyError>;

    async fn auth(&mut self, username: &str, password: &str) -> Result<(), ReplyError>;

    async fn mail_from(&mut self, from: &Address) -> Result<(), ReplyError>;

    async fn rcpt_to(&mut self, to: &Address) -> Result<(), ReplyError>;

    /// Send DATA followed by the message and its terminator.
    async fn data(&mut self, message: &[u8]) -> Result<(), ReplyError>;

    async fn quit(&mut self) -> Result<(), ReplyError>;
}

/// Channel over a real connection, using lettre's SMTP client.
///
/// lettre sends EHLO as part of connecting, so [`greet`](SmtpChannel::greet)
/// covers both the banner and the EHLO exchange and
/// [`hello`](SmtpChannel::hello) reports what that exchange advertised.
pub struct LettreChannel {
    host: String,
    port: u16,
    implicit_tls: bool,
    hello_name: ClientId,
    io_timeout: Duration,
    connection: Option<AsyncSmtpConnection>,
}

impl LettreChannel {
    pub fn new(config: &SmtpConfig) -> Self {
        Self {
            host: config.host.clone(),
            port: config.port,
            implicit_tls: config.encryption == SmtpEncryption::Tls,
            hello_name: ClientId::Domain(config.from.email.domain().to_string()),
            io_timeout: config.step_timeout,
            connection: None,
        }
    }

    fn connection(&mut self) -> Result<&mut AsyncSmtpConnection, ReplyError> {
        self.connection
            .as_mut()
            .ok_or_else(|| ReplyError("not connected".to_string()))
    }
}

fn capabilities(connection: &AsyncSmtpConnection) -> Capabilities {
    Capabilities {
        starttls: connection.can_starttls(),
        auth: connection
            .server_info()
            .get_auth_mechanism(MECHANISMS)
            .is_some(),
    }
}

#[async_trait]
impl SmtpChannel for LettreChannel {
    async fn greet(&mut self) -> Result<(), ReplyError> {
        let tls = if self.implicit_tls {
            Some(TlsParameters::new(self.host.clone())?)
        } else {
            None
        };

        let connection = AsyncSmtpConnection::connect_tokio1(
            (self.host.as_str(), self.port),
            Some(self.io_timeout),
            &self.hello_name,
            tls,
            None,
        )
        .await?;

        self.connection = Some(connection);
        Ok(())
    }

    async fn hello(&mut self) -> Result<Capabilities, ReplyError> {
        Ok(capabilities(self.connection()?))
    }

    async fn starttls(&mut self) -> Result<Capabilities, ReplyError> {
        let parameters = TlsParameters::new(self.host.clone())?;
        let hello_name = self.hello_name.clone();
        let connection = self.connection()?;
        connection.starttls(parameters, &hello_name).await?;
        Ok(capabilities(connection))
    }

    async fn auth(&mut self, username: &str, password: &str) -> Result<(), ReplyError> {
        let credentials = Credentials::new(username.to_string(), password.to_string());
        self.connection()?.auth(MECHANISMS, &credentials).await?;
        Ok(())
    }

    async fn mail_from(&mut self, from: &Address) -> Result<(), ReplyError> {
        self.connection()?
            .command(Mail::new(Some(from.clone()), vec![]))
            .await?;
        Ok(())
    }

    async fn rcpt_to(&mut self, to: &Address) -> Result<(), ReplyError> {
        self.connection()?
            .command(Rcpt::new(to.clone(), vec![]))
            .await?;
        Ok(())
    }

    async fn data(&mut self, message: &[u8]) -> Result<(), ReplyError> {
        let connection = self.connection()?;
        connection.command(Data).await?;
        connection.message(message).await?;
        Ok(())
    }

    async fn quit(&mut self) -> Result<(), ReplyError> {
        if let Some(mut connection) = self.connection.take() {
            connection.quit().await?;
        }
        Ok(())
    }
}
