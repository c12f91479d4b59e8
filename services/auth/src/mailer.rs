//! Email dispatch for confirmation codes
//!
//! Delivery failures are returned to the caller; nothing here retries or
//! swallows an error.

use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor, message::Mailbox,
    transport::smtp::authentication::Credentials,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

use crate::settings::{MailBackend, MailSettings};

/// Email delivery errors
#[derive(Debug, Error)]
pub enum MailError {
    #[error("Invalid mail address {address}: {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("Failed to build message: {0}")]
    Build(#[from] lettre::error::Error),

    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    #[error("Mail configuration error: {0}")]
    Configuration(String),
}

/// Something that can deliver a plain-text email
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, recipient: &str, subject: &str, body: &str) -> Result<(), MailError>;
}

fn parse_mailbox(address: &str) -> Result<Mailbox, MailError> {
    address.parse().map_err(|e: lettre::address::AddressError| MailError::InvalidAddress {
        address: address.to_string(),
        reason: e.to_string(),
    })
}

/// SMTP relay mailer
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(settings: &MailSettings) -> Result<Self, MailError> {
        let host = settings
            .smtp_host
            .as_deref()
            .ok_or_else(|| MailError::Configuration("mail.smtp_host is not set".to_string()))?;

        let mut builder = if settings.smtp_tls {
            AsyncSmtpTransport::<Tokio1Executor>::relay(host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host)
        }
        .port(settings.smtp_port);

        if let (Some(username), Some(password)) = (&settings.smtp_username, &settings.smtp_password)
        {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        Ok(Self {
            transport: builder.build(),
            from: parse_mailbox(&settings.from)?,
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, recipient: &str, subject: &str, body: &str) -> Result<(), MailError> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(parse_mailbox(recipient)?)
            .subject(subject)
            .body(body.to_string())?;

        self.transport.send(message).await?;
        info!(recipient, subject, "Email sent");
        Ok(())
    }
}

/// Mailer that only logs the message, for local development
pub struct LogMailer {
    from: Mailbox,
}

impl LogMailer {
    pub fn new(settings: &MailSettings) -> Result<Self, MailError> {
        Ok(Self {
            from: parse_mailbox(&settings.from)?,
        })
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, recipient: &str, subject: &str, body: &str) -> Result<(), MailError> {
        parse_mailbox(recipient)?;
        info!(from = %self.from, recipient, subject, body, "Email (log backend)");
        Ok(())
    }
}

/// Build the mailer selected by `mail.backend`
pub fn from_settings(settings: &MailSettings) -> Result<Arc<dyn Mailer>, MailError> {
    match settings.backend {
        MailBackend::Smtp => Ok(Arc::new(SmtpMailer::new(settings)?)),
        MailBackend::Log => Ok(Arc::new(LogMailer::new(settings)?)),
    }
}
