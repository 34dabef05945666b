pub mod configuration;
pub mod domain;
mod error;
pub mod handler;
pub mod lambda;
pub mod mail_sender;
mod routes;
mod state;
pub mod telemetry;

use anyhow::Context;
use axum::{
    http::{header, HeaderValue, Method},
    routing::IntoMakeService,
    Router, Server,
};
use configuration::{CorsSettings, Settings};
use handler::ContactHandler;
use hyper::server::conn::AddrIncoming;
use mail_sender::{MailSender, SmtpMailSender};
use state::AppState;
use std::{net::TcpListener, sync::Arc};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    set_header::SetResponseHeaderLayer,
};

pub struct App {
    port: u16,
    server: Server<AddrIncoming, IntoMakeService<Router>>,
}

impl App {
    /// Build the app with an SMTP mail sender configured from `settings`.
    pub fn build(settings: Settings) -> anyhow::Result<Self> {
        let mail_sender = <SmtpMailSender>::try_from(settings.email())
            .context("Failed to create the SMTP mail sender")?;
        Self::build_with_mail_sender(settings, Arc::new(mail_sender))
    }

    /// Build the app, binding its listener, with the given mail sender.
    pub fn build_with_mail_sender(
        settings: Settings,
        mail_sender: Arc<dyn MailSender>,
    ) -> anyhow::Result<Self> {
        let contact_handler = build_contact_handler(&settings, mail_sender)?;
        let app_state = AppState::create(Arc::new(contact_handler));
        let router = Self::build_router(&app_state, settings.cors())?;

        let address = settings.application().address();
        let listener =
            TcpListener::bind(&address).with_context(|| format!("Failed to bind {address}"))?;
        let local_address = listener.local_addr()?;
        let server = Server::from_tcp(listener)?.serve(router.into_make_service());
        tracing::info!("Server running at {local_address}");

        Ok(Self {
            port: local_address.port(),
            server,
        })
    }

    /// The port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Serve requests until the server fails.
    pub async fn run_until_stopped(self) -> anyhow::Result<()> {
        self.server.await?;
        Ok(())
    }

    /// Build the router for the application.
    fn build_router(app_state: &AppState, cors: &CorsSettings) -> anyhow::Result<Router> {
        use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
        use tracing::Level;

        let router = routes::build_router(app_state).layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        );

        if !cors.enabled {
            return Ok(router);
        }

        // `CorsLayer` only sets the method and header lists on preflight
        // responses. Every response carries them, as on Lambda.
        Ok(router
            .layer(build_cors_layer(cors)?)
            .layer(SetResponseHeaderLayer::if_not_present(
                header::ACCESS_CONTROL_ALLOW_METHODS,
                HeaderValue::from_static("POST"),
            ))
            .layer(SetResponseHeaderLayer::if_not_present(
                header::ACCESS_CONTROL_ALLOW_HEADERS,
                HeaderValue::from_static("Content-Type"),
            )))
    }
}

/// Create the request handler shared by every trigger.
pub fn build_contact_handler(
    settings: &Settings,
    mail_sender: Arc<dyn MailSender>,
) -> anyhow::Result<ContactHandler> {
    ContactHandler::from_settings(settings, mail_sender)
        .map_err(anyhow::Error::msg)
        .context("Invalid email settings")
}

fn build_cors_layer(cors: &CorsSettings) -> anyhow::Result<CorsLayer> {
    let allow_origin = if cors.allow_origin == "*" {
        AllowOrigin::any()
    } else {
        let origin = HeaderValue::from_str(&cors.allow_origin)
            .with_context(|| format!("Invalid CORS origin {}", cors.allow_origin))?;
        AllowOrigin::exact(origin)
    };

    Ok(CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::POST])
        .allow_headers([header::CONTENT_TYPE]))
}
