use crate::{
    configuration::Settings,
    domain::{DeliveryOutcome, EmailAddress, SubmissionError, SubmissionSchema},
    mail_sender::{MailSender, MailSenderError},
};
use std::{sync::Arc, time::Duration};

/// Validates a raw contact request and relays it through a [`MailSender`].
///
/// The handler holds no per-request state, so a single instance is shared by
/// every trigger adapter and every concurrent request.
#[derive(Debug)]
pub struct ContactHandler {
    schema: SubmissionSchema,
    sender: EmailAddress,
    recipient: EmailAddress,
    mail_sender: Arc<dyn MailSender>,
    send_timeout: Duration,
    log_request_body: bool,
}

impl ContactHandler {
    pub fn new(
        schema: SubmissionSchema,
        sender: EmailAddress,
        recipient: EmailAddress,
        mail_sender: Arc<dyn MailSender>,
        send_timeout: Duration,
    ) -> Self {
        Self {
            schema,
            sender,
            recipient,
            mail_sender,
            send_timeout,
            log_request_body: false,
        }
    }

    /// Log raw request bodies at debug level before they are parsed.
    pub fn with_request_body_logging(mut self, enabled: bool) -> Self {
        self.log_request_body = enabled;
        self
    }

    /// Create a handler from the application settings and a mail sender.
    pub fn from_settings(
        settings: &Settings,
        mail_sender: Arc<dyn MailSender>,
    ) -> Result<Self, String> {
        let email = settings.email();
        let handler = Self::new(
            *settings.application().schema(),
            email.sender()?,
            email.recipient()?,
            mail_sender,
            email.send_timeout()?,
        )
        .with_request_body_logging(*settings.application().log_request_body());

        Ok(handler)
    }

    /// Decode, validate and relay a single request body.
    ///
    /// At most one email is sent per call. Nothing is retried and nothing is
    /// remembered between calls, so the same body handled twice is sent twice.
    #[tracing::instrument(
        name = "Relay contact submission",
        skip(self, raw_body),
        fields(schema = ?self.schema, body_length = raw_body.len())
    )]
    pub async fn handle(&self, raw_body: &[u8]) -> DeliveryOutcome {
        if self.log_request_body {
            tracing::debug!(
                request_body = %String::from_utf8_lossy(raw_body),
                "Received request body"
            );
        }

        let submission = match self.schema.decode(raw_body) {
            Ok(submission) => submission,
            Err(error) => {
                match &error {
                    SubmissionError::Malformed(_) => tracing::warn!(
                        error.cause_chain = ?error,
                        error.message = %error,
                        "Failed to parse request"
                    ),
                    SubmissionError::MissingField(field) => {
                        tracing::info!(field, "Rejected submission with a missing field")
                    }
                }
                return DeliveryOutcome::ValidationFailure(error);
            }
        };

        let body = submission.body();
        let send = self.mail_sender.send(
            &self.sender,
            &self.recipient,
            submission.subject(),
            &body,
        );
        let result = match tokio::time::timeout(self.send_timeout, send).await {
            Ok(result) => result,
            Err(_) => Err(MailSenderError::Timeout(self.send_timeout)),
        };

        match result {
            Ok(()) => {
                tracing::info!("Contact submission has been relayed");
                DeliveryOutcome::Success
            }
            Err(error) => {
                tracing::error!(
                    error.cause_chain = ?error,
                    error.message = %error,
                    "Failed to send email"
                );
                DeliveryOutcome::DeliveryFailure(error)
            }
        }
    }
}
