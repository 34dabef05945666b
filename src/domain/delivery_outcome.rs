use super::SubmissionError;
use crate::mail_sender::MailSenderError;
use axum::{
    response::{IntoResponse, Response},
    Json,
};
use http::StatusCode;
use utoipa::ToSchema;

pub const MESSAGE_SENT: &str = "Message sent successfully";
pub const INVALID_FORM_DATA: &str = "Invalid form data";
pub const MISSING_REQUIRED_FIELD: &str = "All fields are required";
pub const INVALID_REQUEST_METHOD: &str = "Invalid request method";
pub const FAILED_TO_SEND: &str = "Failed to send email";

/// The result of relaying a single request. Produced once and immediately
/// turned into a response.
#[derive(Debug)]
pub enum DeliveryOutcome {
    Success,
    ValidationFailure(SubmissionError),
    DeliveryFailure(MailSenderError),
}

impl DeliveryOutcome {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Success => StatusCode::OK,
            Self::ValidationFailure(_) => StatusCode::BAD_REQUEST,
            Self::DeliveryFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The message shown to the caller. Never contains details of the cause.
    pub fn message(&self) -> &'static str {
        match self {
            Self::Success => MESSAGE_SENT,
            Self::ValidationFailure(SubmissionError::Malformed(_)) => INVALID_FORM_DATA,
            Self::ValidationFailure(SubmissionError::MissingField(_)) => MISSING_REQUIRED_FIELD,
            Self::DeliveryFailure(_) => FAILED_TO_SEND,
        }
    }

    pub fn into_parts(self) -> (StatusCode, ResponseMessage) {
        (self.status_code(), ResponseMessage::new(self.message()))
    }
}

impl IntoResponse for DeliveryOutcome {
    fn into_response(self) -> Response {
        let (status, body) = self.into_parts();
        (status, Json(body)).into_response()
    }
}

/// JSON body of every relay response.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize, ToSchema)]
pub struct ResponseMessage {
    message: String,
}

impl ResponseMessage {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
