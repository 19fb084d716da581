//! Configuration loaded from environment variables.
//!
//! Everything is read and validated once at startup. A provider selected
//! without its credentials aborts boot instead of failing the first request.

use std::env;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use lettre::message::Mailbox;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port (default: 3000).
    pub port: u16,

    /// CORS allowed origins (comma-separated, default: "*").
    pub cors_allowed_origins: Vec<String>,

    /// PostgreSQL connection URL. When None, the store route is unwired.
    pub database_url: Option<String>,

    /// Maximum database connections in pool (default: 5).
    pub database_max_connections: u32,

    /// Provider behind the notify route.
    pub notify: NotifyConfig,

    /// Timeout for outbound HTTP provider calls (default: 30s).
    pub provider_timeout: Duration,
}

/// Which provider handles notifications, with its settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyConfig {
    /// Notify route answers "not configured".
    None,
    Formspree { endpoint: String },
    Resend(ResendConfig),
    Smtp(SmtpConfig),
}

impl NotifyConfig {
    /// Provider name as used in `NOTIFY_PROVIDER` and metrics labels.
    pub fn name(&self) -> &'static str {
        match self {
            NotifyConfig::None => "none",
            NotifyConfig::Formspree { .. } => "formspree",
            NotifyConfig::Resend(_) => "resend",
            NotifyConfig::Smtp(_) => "smtp",
        }
    }
}

/// Email API settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResendConfig {
    pub api_key: String,
    pub api_url: String,
    pub from: String,
    pub to: String,
}

/// SMTP transport encryption.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmtpEncryption {
    /// Plain connection upgraded with STARTTLS (port 587).
    StartTls,
    /// Implicit TLS from the first byte (port 465).
    Tls,
    /// Unencrypted, for local development only.
    None,
}

impl std::str::FromStr for SmtpEncryption {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "starttls" => Ok(SmtpEncryption::StartTls),
            "tls" => Ok(SmtpEncryption::Tls),
            "none" => Ok(SmtpEncryption::None),
            other => bail!("SMTP_ENCRYPTION must be starttls, tls or none (got {other:?})"),
        }
    }
}

/// SMTP settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    /// Username and password, set together or not at all. AUTH only when set.
    pub credentials: Option<(String, String)>,
    pub encryption: SmtpEncryption,
    pub from: Mailbox,
    pub to: Mailbox,
    /// Bound on every protocol step.
    pub step_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    ///
    /// Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &str, provider: &str| {
            var(key).with_context(|| format!("{key} is required when NOTIFY_PROVIDER={provider}"))
        };

        let port = var("PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse()
            .context("PORT must be a valid u16")?;

        let cors_allowed_origins = var("CORS_ALLOWED_ORIGINS")
            .map(|v| {
                v.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_else(|| vec!["*".to_string()]);

        let database_url = var("DATABASE_URL");

        let database_max_connections = var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|| "5".to_string())
            .parse()
            .context("DATABASE_MAX_CONNECTIONS must be a valid u32")?;

        let provider_timeout = var("PROVIDER_TIMEOUT_SECS")
            .unwrap_or_else(|| "30".to_string())
            .parse::<u64>()
            .map(Duration::from_secs)
            .context("PROVIDER_TIMEOUT_SECS must be a whole number of seconds")?;

        let provider = var("NOTIFY_PROVIDER")
            .unwrap_or_else(|| "none".to_string())
            .to_lowercase();

        let notify = match provider.as_str() {
            "none" => NotifyConfig::None,
            "formspree" => NotifyConfig::Formspree {
                endpoint: required("FORMSPREE_ENDPOINT", "formspree")?,
            },
            "resend" => NotifyConfig::Resend(ResendConfig {
                api_key: required("RESEND_API_KEY", "resend")?,
                api_url: var("RESEND_API_URL")
                    .unwrap_or_else(|| "https://api.resend.com/emails".to_string()),
                from: required("RESEND_FROM", "resend")?,
                to: required("RESEND_TO", "resend")?,
            }),
            "smtp" => {
                let host = required("SMTP_HOST", "smtp")?;

                let smtp_port = var("SMTP_PORT")
                    .unwrap_or_else(|| "587".to_string())
                    .parse::<u16>()
                    .context("SMTP_PORT must be a valid u16")?;

                let credentials = match (var("SMTP_USERNAME"), var("SMTP_PASSWORD")) {
                    (Some(user), Some(pass)) => Some((user, pass)),
                    (None, None) => None,
                    _ => bail!("SMTP_USERNAME and SMTP_PASSWORD must be set together"),
                };

                let encryption = var("SMTP_ENCRYPTION")
                    .unwrap_or_else(|| "starttls".to_string())
                    .parse::<SmtpEncryption>()?;

                let from = required("SMTP_FROM_EMAIL", "smtp")?
                    .parse::<Mailbox>()
                    .context("SMTP_FROM_EMAIL must be a valid mailbox")?;
                let to = required("SMTP_TO_EMAIL", "smtp")?
                    .parse::<Mailbox>()
                    .context("SMTP_TO_EMAIL must be a valid mailbox")?;

                let step_timeout = var("SMTP_STEP_TIMEOUT_SECS")
                    .unwrap_or_else(|| "30".to_string())
                    .parse::<u64>()
                    .map(Duration::from_secs)
                    .context("SMTP_STEP_TIMEOUT_SECS must be a whole number of seconds")?;

                NotifyConfig::Smtp(SmtpConfig {
                    host,
                    port: smtp_port,
                    credentials,
                    encryption,
                    from,
                    to,
                    step_timeout,
                })
            }
            other => bail!("NOTIFY_PROVIDER must be formspree, resend, smtp or none (got {other:?})"),
        };

        Ok(Self {
            port,
            cors_allowed_origins,
            database_url,
            database_max_connections,
            notify,
            provider_timeout,
        })
    }

    /// Whether CORS is left wide open.
    pub fn cors_is_wildcard(&self) -> bool {
        self.cors_allowed_origins.is_empty()
            || (self.cors_allowed_origins.len() == 1 && self.cors_allowed_origins[0] == "*")
    }
}
