use crate::{
    domain::{DeliveryOutcome, ResponseMessage, INVALID_REQUEST_METHOD},
    handler::ContactHandler,
    state::AppState,
};
use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::{Method, StatusCode},
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use std::sync::Arc;

/// Create a router to serve endpoints.
///
/// Submissions of any size are accepted.
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route(
            "/send-email",
            post(send_email).fallback(method_not_allowed),
        )
        .layer(DefaultBodyLimit::disable())
}

/// Relay a contact submission as an email.
///
/// The body is read as raw bytes so that every decoding problem is reported
/// by the relay itself as `400 Bad Request`.
#[tracing::instrument(name = "Send email", skip(handler, body))]
#[utoipa::path(
    post,
    path = "/send-email",
    request_body(
        content = String,
        content_type = "application/json",
        description = r#"`{"name", "email", "message"}` or `{"subject", "body"}`, depending on the configured schema"#
    ),
    responses(
        (status = OK, description = "The email was handed to the mail server", body = ResponseMessage),
        (status = BAD_REQUEST, description = "Malformed body or missing field", body = ResponseMessage),
        (status = METHOD_NOT_ALLOWED, description = "Only POST is accepted", body = ResponseMessage),
        (status = INTERNAL_SERVER_ERROR, description = "The email could not be sent", body = ResponseMessage),
    )
)]
pub async fn send_email(
    State(handler): State<Arc<ContactHandler>>,
    body: Bytes,
) -> DeliveryOutcome {
    handler.handle(&body).await
}

#[tracing::instrument(name = "Reject request method")]
async fn method_not_allowed(method: Method) -> impl IntoResponse {
    tracing::debug!("Only POST is accepted on /send-email");
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ResponseMessage::new(INVALID_REQUEST_METHOD)),
    )
}
