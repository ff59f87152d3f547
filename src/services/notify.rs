// src/services/notify.rs

//! Summary email delivery.

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::error::{AppError, Result};
use crate::models::MailConfig;

/// Sends a single notification message.
///
/// Callers treat delivery as best-effort; implementations report failures
/// through the returned error but must not retry internally.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, subject: &str, body: &str) -> Result<()>;
}

/// Notifier backed by an authenticated STARTTLS mail relay.
pub struct SmtpNotifier {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl SmtpNotifier {
    /// Create a notifier from configuration.
    pub fn new(config: &MailConfig) -> Result<Self> {
        let from: Mailbox = config
            .from
            .parse()
            .map_err(|e| AppError::mail(format!("invalid from address: {e}")))?;

        let to: Mailbox = config
            .to
            .parse()
            .map_err(|e| AppError::mail(format!("invalid to address: {e}")))?;

        let creds = Credentials::new(config.username.clone(), config.password.clone());

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
            .map_err(|e| AppError::mail(format!("SMTP transport setup failed: {e}")))?
            .port(config.smtp_port)
            .credentials(creds)
            .build();

        Ok(Self { mailer, from, to })
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send(&self, subject: &str, body: &str) -> Result<()> {
        let email = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| AppError::mail(format!("failed to build message: {e}")))?;

        self.mailer
            .send(email)
            .await
            .map_err(|e| AppError::mail(format!("failed to submit message: {e}")))?;

        tracing::info!(to = %self.to, subject, "Notification email sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mail_config() -> MailConfig {
        MailConfig {
            smtp_host: "smtp.example.com".to_string(),
            smtp_port: 587,
            username: "bot".to_string(),
            password: "secret".to_string(),
            from: "Feedloop <bot@example.com>".to_string(),
            to: "team@example.com".to_string(),
        }
    }

    #[test]
    fn test_new_accepts_valid_addresses() {
        assert!(SmtpNotifier::new(&mail_config()).is_ok());
    }

    #[test]
    fn test_new_rejects_invalid_from() {
        let mut config = mail_config();
        config.from = "not an address".to_string();
        assert!(SmtpNotifier::new(&config).is_err());
    }

    #[test]
    fn test_new_rejects_invalid_to() {
        let mut config = mail_config();
        config.to = String::new();
        assert!(SmtpNotifier::new(&config).is_err());
    }
}
