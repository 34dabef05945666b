use super::RequiredText;
use serde_json::{Map, Value};

const CONTACT_FORM_SUBJECT: &str = "New Contact Form Submission";

/// The shape of request bodies the relay accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionSchema {
    /// `{"name": .., "email": .., "message": ..}` from a website contact form.
    ContactForm,
    /// `{"subject": .., "body": ..}` forwarded as-is.
    Notification,
}

impl SubmissionSchema {
    /// Decode and validate a raw request body into a [`ContactSubmission`].
    ///
    /// The body must be a JSON object. Unknown keys are ignored, a required
    /// key that is absent, `null` or an empty string is reported as missing.
    pub fn decode(&self, raw_body: &[u8]) -> Result<ContactSubmission, SubmissionError> {
        let object: Map<String, Value> =
            serde_json::from_slice(raw_body).map_err(SubmissionError::Malformed)?;
        let object = Value::Object(object);

        match self {
            Self::ContactForm => {
                let data: ContactFormData =
                    serde_json::from_value(object).map_err(SubmissionError::Malformed)?;
                data.try_into()
            }
            Self::Notification => {
                let data: NotificationData =
                    serde_json::from_value(object).map_err(SubmissionError::Malformed)?;
                data.try_into()
            }
        }
    }
}

#[derive(Debug, serde::Deserialize)]
struct ContactFormData {
    name: Option<String>,
    email: Option<String>,
    message: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
struct NotificationData {
    subject: Option<String>,
    body: Option<String>,
}

impl TryFrom<ContactFormData> for ContactSubmission {
    type Error = SubmissionError;

    fn try_from(value: ContactFormData) -> Result<Self, Self::Error> {
        let name = RequiredText::parse(value.name, "name")?;
        let email = RequiredText::parse(value.email, "email")?;
        let message = RequiredText::parse(value.message, "message")?;

        Ok(Self::ContactForm {
            name,
            email,
            message,
        })
    }
}

impl TryFrom<NotificationData> for ContactSubmission {
    type Error = SubmissionError;

    fn try_from(value: NotificationData) -> Result<Self, Self::Error> {
        let subject = RequiredText::parse(value.subject, "subject")?;
        let body = RequiredText::parse(value.body, "body")?;

        Ok(Self::Notification { subject, body })
    }
}

/// A validated submission, ready to be relayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactSubmission {
    ContactForm {
        name: RequiredText,
        email: RequiredText,
        message: RequiredText,
    },
    Notification {
        subject: RequiredText,
        body: RequiredText,
    },
}

impl ContactSubmission {
    /// Subject line of the relayed email.
    pub fn subject(&self) -> &str {
        match self {
            Self::ContactForm { .. } => CONTACT_FORM_SUBJECT,
            Self::Notification { subject, .. } => subject.as_ref(),
        }
    }

    /// Plain text body of the relayed email.
    pub fn body(&self) -> String {
        match self {
            Self::ContactForm {
                name,
                email,
                message,
            } => format!(
                "Name: {}\nEmail: {}\nMessage:\n{}",
                name.as_ref(),
                email.as_ref(),
                message.as_ref()
            ),
            Self::Notification { body, .. } => body.as_ref().to_string(),
        }
    }
}

/// Reasons a request body is rejected before anything is sent.
#[derive(thiserror::Error)]
pub enum SubmissionError {
    #[error("Request body is not a valid submission object")]
    Malformed(#[source] serde_json::Error),
    #[error("Missing required field `{0}`")]
    MissingField(&'static str),
}
