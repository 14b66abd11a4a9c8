use std::env;
use std::time::Duration;

use anyhow::{Context, Result};
use lettre::message::Mailbox;

use crate::mailer::MailPolicy;

/// Immutable application configuration, read from the environment once
/// at startup and passed explicitly to the components that need it.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: String,
    pub mail: MailConfig,
}

/// SMTP transport settings plus the delivery policy of the mail
/// worker.
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_tls: bool,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<String>,
    pub sender: Mailbox,
    pub queue_size: usize,
    pub policy: MailPolicy,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let database_url = required("DATABASE_URL")?;
        let host = required("HOST")?;
        let port = required("PORT")?;
        let bind_addr = format!("{host}:{port}");

        let smtp_tls = parsed("SMTP_TLS", true)?;
        let mail = MailConfig {
            smtp_host: required("SMTP_HOST")?,
            smtp_port: parsed("SMTP_PORT", if smtp_tls { 465 } else { 25 })?,
            smtp_tls,
            smtp_username: env::var("SMTP_USERNAME").ok(),
            smtp_password: env::var("SMTP_PASSWORD").ok(),
            sender: required("MAIL_SENDER")?
                .parse()
                .context("MAIL_SENDER is not a valid mailbox")?,
            queue_size: parsed("MAIL_QUEUE_SIZE", 64)?,
            policy: MailPolicy {
                send_timeout: Duration::from_secs(parsed("MAIL_SEND_TIMEOUT_SECS", 10)?),
                max_retries: parsed("MAIL_MAX_RETRIES", 3)?,
                retry_backoff: Duration::from_secs(parsed("MAIL_RETRY_BACKOFF_SECS", 2)?),
            },
        };

        Ok(Self {
            database_url,
            bind_addr,
            mail,
        })
    }
}

fn required(key: &str) -> Result<String> {
    env::var(key).with_context(|| format!("{key} is not set in the environment"))
}

fn parsed<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .with_context(|| format!("{key} holds an invalid value")),
        Err(_) => Ok(default),
    }
}
