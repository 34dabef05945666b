//! Serverless trigger: runs the relay as an AWS Lambda function behind API
//! Gateway or a function URL.

use crate::{configuration::CorsSettings, handler::ContactHandler};
use http::{
    header::{self, InvalidHeaderValue},
    HeaderValue, Method, StatusCode,
};
use lambda_http::{service_fn, Body, Error, Request, Response};
use std::sync::Arc;

/// Whether the process was started by the Lambda runtime.
pub fn is_lambda_runtime() -> bool {
    std::env::var_os("AWS_LAMBDA_RUNTIME_API").is_some()
}

/// Serve Lambda invocations until the runtime shuts the process down.
///
/// Fails before the first invocation if the CORS settings are invalid.
pub async fn run(handler: Arc<ContactHandler>, cors: &CorsSettings) -> Result<(), Error> {
    let adapter = LambdaAdapter::new(handler, cors)?;
    tracing::info!("Running as a Lambda function");
    lambda_http::run(service_fn(|event| adapter.handle(event))).await
}

/// Translates Lambda HTTP events into calls to the [`ContactHandler`].
#[derive(Debug, Clone)]
pub struct LambdaAdapter {
    handler: Arc<ContactHandler>,
    /// `None` when CORS is disabled.
    allow_origin: Option<HeaderValue>,
}

impl LambdaAdapter {
    /// Create an adapter, parsing the configured CORS origin once up front.
    pub fn new(
        handler: Arc<ContactHandler>,
        cors: &CorsSettings,
    ) -> Result<Self, InvalidHeaderValue> {
        let allow_origin = if cors.enabled {
            Some(HeaderValue::from_str(&cors.allow_origin)?)
        } else {
            None
        };

        Ok(Self {
            handler,
            allow_origin,
        })
    }

    /// Handle a single invocation. Every request is answered with a response,
    /// an `Err` is only returned if the response itself cannot be built.
    #[tracing::instrument(name = "Handle Lambda event", skip(self, event), fields(method = %event.method()))]
    pub async fn handle(&self, event: Request) -> Result<Response<Body>, Error> {
        if self.allow_origin.is_some() && event.method() == Method::OPTIONS {
            return Ok(self
                .response_builder()
                .status(StatusCode::NO_CONTENT)
                .body(Body::Empty)?);
        }

        let (status, message) = self.handler.handle(event.body()).await.into_parts();

        Ok(self
            .response_builder()
            .status(status)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::Text(serde_json::to_string(&message)?))?)
    }

    fn response_builder(&self) -> http::response::Builder {
        let builder = Response::builder();
        match &self.allow_origin {
            None => builder,
            Some(origin) => builder
                .header(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin.clone())
                .header(header::ACCESS_CONTROL_ALLOW_METHODS, "POST")
                .header(header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"),
        }
    }
}
