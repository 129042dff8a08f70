// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Best-effort SMTP delivery for composed mail.
//!
//! The engines hand back [`OutboundMail`] values; this module is the
//! only place that actually talks to an SMTP relay. Configuration comes
//! from environment variables, and when `SMTP_HOST` is unset delivery
//! is disabled entirely: messages are logged and dropped, never an
//! error. A failed send is logged at `error!` and the operation that
//! produced the mail still succeeds.

use admast::OutboundMail;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::header::ContentType, transport::smtp::authentication::Credentials,
};
use tracing::{debug, error, info};

/// Default SMTP port (STARTTLS).
const DEFAULT_SMTP_PORT: u16 = 587;

/// Default sender address when `SMTP_FROM` is not set.
const DEFAULT_FROM_ADDRESS: &str = "noreply@admast.local";

/// Mail delivery failures. These are logged, never propagated.
#[derive(Debug, thiserror::Error)]
enum MailError {
    /// SMTP transport-level failure (connection, authentication).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// The recipient or sender address could not be parsed.
    #[error("Mail address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Mail build error: {0}")]
    Build(String),
}

/// SMTP relay configuration, loaded from the environment.
///
/// | Variable        | Required | Default                 |
/// |-----------------|----------|-------------------------|
/// | `SMTP_HOST`     | yes      | —                       |
/// | `SMTP_PORT`     | no       | `587`                   |
/// | `SMTP_FROM`     | no       | `noreply@admast.local`  |
/// | `SMTP_USER`     | no       | —                       |
/// | `SMTP_PASSWORD` | no       | —                       |
#[derive(Debug, Clone)]
struct MailConfig {
    /// SMTP server hostname.
    smtp_host: String,
    /// SMTP server port.
    smtp_port: u16,
    /// RFC 5322 "From" address.
    from_address: String,
    /// Optional SMTP username.
    smtp_user: Option<String>,
    /// Optional SMTP password.
    smtp_password: Option<String>,
}

impl MailConfig {
    /// Loads configuration from the environment. Returns `None` when
    /// `SMTP_HOST` is unset, signalling that delivery is disabled.
    fn from_env() -> Option<Self> {
        let smtp_host: String = std::env::var("SMTP_HOST").ok()?;
        Some(Self {
            smtp_host,
            smtp_port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            from_address: std::env::var("SMTP_FROM")
                .unwrap_or_else(|_| String::from(DEFAULT_FROM_ADDRESS)),
            smtp_user: std::env::var("SMTP_USER").ok(),
            smtp_password: std::env::var("SMTP_PASSWORD").ok(),
        })
    }
}

/// Sends composed mail over SMTP, or drops it when unconfigured.
pub struct Mailer {
    /// Relay configuration; `None` means delivery is disabled.
    config: Option<MailConfig>,
}

impl Mailer {
    /// Builds a mailer from the environment, logging whether delivery
    /// is live.
    #[must_use]
    pub fn from_env() -> Self {
        let config: Option<MailConfig> = MailConfig::from_env();
        match &config {
            Some(config) => info!(
                host = %config.smtp_host,
                port = config.smtp_port,
                from = %config.from_address,
                "Outbound mail delivery enabled"
            ),
            None => info!("SMTP_HOST is not set; outbound mail delivery is disabled"),
        }
        Self { config }
    }

    /// Builds a mailer that drops everything.
    #[must_use]
    pub const fn disabled() -> Self {
        Self { config: None }
    }

    /// Delivers one message, best-effort. Failures are logged and
    /// swallowed so the operation that composed the mail still
    /// succeeds.
    pub async fn deliver(&self, mail: &OutboundMail) {
        let Some(config) = &self.config else {
            debug!(to = %mail.to, subject = %mail.subject, "Mail delivery disabled; dropping message");
            return;
        };

        match Self::send(config, mail).await {
            Ok(()) => info!(to = %mail.to, subject = %mail.subject, "Mail sent"),
            Err(e) => error!(to = %mail.to, error = %e, "Failed to send mail"),
        }
    }

    /// Assembles and sends one message through the configured relay.
    async fn send(config: &MailConfig, mail: &OutboundMail) -> Result<(), MailError> {
        let message: Message = Message::builder()
            .from(config.from_address.parse()?)
            .to(mail.to.parse()?)
            .subject(mail.subject.clone())
            .header(ContentType::TEXT_PLAIN)
            .body(mail.body.clone())
            .map_err(|e| MailError::Build(e.to_string()))?;

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port);
        if let (Some(user), Some(password)) = (&config.smtp_user, &config.smtp_password) {
            builder = builder.credentials(Credentials::new(user.clone(), password.clone()));
        }

        builder.build().send(message).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disabled_mailer_drops_without_error() {
        let mailer: Mailer = Mailer::disabled();
        mailer
            .deliver(&OutboundMail {
                to: String::from("nobody@admast.example"),
                subject: String::from("Hello"),
                body: String::from("Body"),
            })
            .await;
    }

    #[test]
    fn test_mail_error_display() {
        let err: MailError = MailError::Build(String::from("missing body"));
        assert_eq!(err.to_string(), "Mail build error: missing body");
    }
}
