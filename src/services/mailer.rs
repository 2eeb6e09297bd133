//! Outbound notification mail.

use anyhow::Context;
use async_trait::async_trait;
use lettre::message::{Mailbox, header::ContentType};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::sync::Arc;

use crate::config::SmtpConfig;
use crate::database::ContactSubmission;

#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingMail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, mail: OutgoingMail) -> anyhow::Result<()>;
}

/// Writes every message to the log instead of delivering it
#[derive(Debug, Default)]
pub struct TracingMailer;

#[async_trait]
impl Mailer for TracingMailer {
    async fn send(&self, mail: OutgoingMail) -> anyhow::Result<()> {
        tracing::info!(
            to = %mail.to,
            subject = %mail.subject,
            "📧 Mail (not delivered, no relay configured):\n{}",
            mail.body
        );
        Ok(())
    }
}

/// Relays mail through an SMTP server with STARTTLS, sending as the login user
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    relay: String,
}

impl SmtpMailer {
    /// `None` unless both the SMTP user and password are configured
    pub fn from_config(smtp: &SmtpConfig) -> anyhow::Result<Option<Self>> {
        let Some((user, password)) = smtp.credentials() else {
            return Ok(None);
        };

        let from: Mailbox = user
            .parse()
            .with_context(|| format!("SMTP_USER '{}' is not a mail address", user))?;
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&smtp.host)
            .with_context(|| format!("invalid SMTP relay {}", smtp.host))?
            .port(smtp.port)
            .credentials(Credentials::new(user.to_string(), password.to_string()))
            .build();

        Ok(Some(Self {
            transport,
            from,
            relay: format!("{}:{}", smtp.host, smtp.port),
        }))
    }

    pub fn relay(&self) -> &str {
        &self.relay
    }

    fn message(&self, mail: &OutgoingMail) -> anyhow::Result<Message> {
        let to: Mailbox = mail
            .to
            .parse()
            .with_context(|| format!("invalid recipient '{}'", mail.to))?;

        Ok(Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(mail.subject.as_str())
            .header(ContentType::TEXT_PLAIN)
            .body(mail.body.clone())?)
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, mail: OutgoingMail) -> anyhow::Result<()> {
        let message = self.message(&mail)?;
        self.transport
            .send(message)
            .await
            .with_context(|| format!("SMTP delivery to {} via {} failed", mail.to, self.relay))?;

        tracing::info!("📧 Sent '{}' to {}", mail.subject, mail.to);
        Ok(())
    }
}

/// SMTP when credentials are configured, the log otherwise
pub fn from_config(smtp: &SmtpConfig) -> anyhow::Result<Arc<dyn Mailer>> {
    match SmtpMailer::from_config(smtp)? {
        Some(mailer) => {
            tracing::info!("📧 Relaying mail through {}", mailer.relay());
            Ok(Arc::new(mailer))
        }
        None => {
            tracing::warn!("⚠️  SMTP_USER/SMTP_PASS not set, outgoing mail will only be logged");
            Ok(Arc::new(TracingMailer))
        }
    }
}

/// Notification for the support inbox
pub fn admin_notification(
    admin_email: &str,
    submission: &ContactSubmission,
    ai_draft: Option<&str>,
) -> OutgoingMail {
    let ContactSubmission { first_name, last_name, email, message, user_id } = submission;
    let status = match user_id {
        Some(id) => format!("Registered user #{id}"),
        None => "Guest".to_string(),
    };

    let mut body = format!(
        "New contact submission from {first_name} {last_name} <{email}>\nUser status: {status}\n\n{message}\n"
    );
    if let Some(draft) = ai_draft {
        body.push_str("\n--- Suggested reply ---\n");
        body.push_str(draft);
        body.push('\n');
    }

    OutgoingMail {
        to: admin_email.to_string(),
        subject: format!("New Contact Form: {first_name} {last_name}"),
        body,
    }
}

/// Confirmation sent back to the person who wrote in
pub fn user_confirmation(first_name: &str, email: &str) -> OutgoingMail {
    OutgoingMail {
        to: email.to_string(),
        subject: "We received your message".to_string(),
        body: format!(
            "Hi {first_name},\n\nThanks for reaching out to CodeFuture. \
             Our team will get back to you shortly.\n"
        ),
    }
}
