//! Service settings loaded through the `config` crate
//!
//! Values come from built-in defaults overridden by `YAMDB__*` environment
//! variables, e.g. `YAMDB__BIND_ADDRESS` or `YAMDB__MAIL__SMTP_HOST`.

use config::{Config, ConfigError, Environment};
use serde::Deserialize;

/// How confirmation emails leave the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MailBackend {
    /// Deliver through an SMTP relay
    Smtp,
    /// Write messages to the log only
    Log,
}

/// Outgoing mail settings
#[derive(Debug, Clone, Deserialize)]
pub struct MailSettings {
    pub backend: MailBackend,
    /// Sender address for confirmation emails
    pub from: String,
    pub smtp_host: Option<String>,
    pub smtp_port: u16,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<String>,
    /// Use an implicit/STARTTLS relay instead of a plain connection
    pub smtp_tls: bool,
}

/// Authentication service settings
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Socket address the HTTP server binds to
    pub bind_address: String,
    /// Lifetime of an issued confirmation code in seconds
    pub confirmation_ttl_seconds: u64,
    pub mail: MailSettings,
}

impl Settings {
    /// Load settings from defaults and `YAMDB__*` environment variables
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("bind_address", "0.0.0.0:3000")?
            .set_default("confirmation_ttl_seconds", 259_200_i64)?
            .set_default("mail.backend", "log")?
            .set_default("mail.from", "noreply@yamdb.local")?
            .set_default("mail.smtp_port", 587_i64)?
            .set_default("mail.smtp_tls", true)?
            .add_source(
                Environment::with_prefix("YAMDB")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}
