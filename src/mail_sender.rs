//! The capability used to hand a composed email over to a mail server.
//!
//! [`MailSender`] is the seam the request handler depends on. The production
//! implementation, [`SmtpMailSender`], wraps any `lettre` async transport and
//! is built from [`EmailSettings`] to talk to an SMTP relay.

use crate::{
    configuration::{EmailSettings, TlsMode},
    domain::EmailAddress,
};
use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::{Credentials, Mechanism},
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use secrecy::ExposeSecret;
use std::time::Duration;

/// Something that can deliver a single plain text email.
#[async_trait]
pub trait MailSender: Send + Sync + std::fmt::Debug {
    /// Deliver one email. Called at most once per request and never retried.
    async fn send(
        &self,
        from: &EmailAddress,
        to: &EmailAddress,
        subject: &str,
        body: &str,
    ) -> Result<(), MailSenderError>;
}

#[derive(Debug, Clone)]
pub struct SmtpMailSender<T = AsyncSmtpTransport<Tokio1Executor>> {
    transport: T,
}

impl<T> SmtpMailSender<T> {
    /// Create a new mail sender on top of an existing transport.
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}

impl TryFrom<&EmailSettings> for SmtpMailSender {
    type Error = MailSenderError;

    fn try_from(config: &EmailSettings) -> Result<Self, Self::Error> {
        let builder = match config.tls() {
            TlsMode::StartTls => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(config.host())
                .map_err(|e| MailSenderError::Transport(Box::new(e)))?,
            TlsMode::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(config.host())
                .map_err(|e| MailSenderError::Transport(Box::new(e)))?,
            TlsMode::Plain => {
                tracing::warn!(
                    smtp_host = %config.host(),
                    "Using an unencrypted, unauthenticated SMTP connection"
                );
                AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(config.host())
            }
        };
        let builder = builder
            .port(*config.port())
            .timeout(Some(config.timeout()));

        let builder = if *config.tls() != TlsMode::Plain && !config.username().is_empty() {
            builder
                .credentials(Credentials::new(
                    config.username().clone(),
                    config.password().expose_secret().clone(),
                ))
                .authentication(vec![Mechanism::Plain])
        } else {
            builder
        };

        tracing::info!(
            smtp_host = %config.host(),
            smtp_port = config.port(),
            tls = ?config.tls(),
            "SMTP mail sender initialized"
        );

        Ok(Self::new(builder.build()))
    }
}

#[async_trait]
impl<T> MailSender for SmtpMailSender<T>
where
    T: AsyncTransport + Send + Sync + std::fmt::Debug,
    T::Ok: Send,
    T::Error: std::error::Error + Send + Sync + 'static,
{
    #[tracing::instrument(name = "Send email over SMTP", skip(self, subject, body))]
    async fn send(
        &self,
        from: &EmailAddress,
        to: &EmailAddress,
        subject: &str,
        body: &str,
    ) -> Result<(), MailSenderError> {
        let from: Mailbox = from
            .as_ref()
            .parse()
            .map_err(MailSenderError::InvalidAddress)?;
        let to: Mailbox = to.as_ref().parse().map_err(MailSenderError::InvalidAddress)?;

        let message = Message::builder()
            .from(from)
            .to(to)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(MailSenderError::Build)?;

        self.transport
            .send(message)
            .await
            .map_err(|e| MailSenderError::Transport(Box::new(e)))?;
        tracing::debug!("Email accepted by the transport");

        Ok(())
    }
}

/// Every way handing an email to the mail server can fail.
#[derive(thiserror::Error)]
pub enum MailSenderError {
    #[error("Email address could not be used as a mailbox")]
    InvalidAddress(#[source] lettre::address::AddressError),
    #[error("Failed to build email message")]
    Build(#[source] lettre::error::Error),
    #[error("Mail transport failed to deliver the email")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("Mail transport did not finish within {0:?}")]
    Timeout(Duration),
}
