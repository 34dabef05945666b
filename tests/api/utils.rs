use contact_relay::{
    configuration::{get_configuration, Settings},
    mail_sender::SmtpMailSender,
    telemetry::{get_subscriber, init_subscriber},
    App,
};
use derive_getters::Getters;
use lettre::{address::Envelope, transport::stub::AsyncStubTransport};
use once_cell::sync::Lazy;
use std::sync::Arc;

static TRACING: Lazy<()> = Lazy::new(|| {
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber("test".into(), std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber("test".into(), std::io::sink);
        init_subscriber(subscriber);
    };
});

pub const SENDER: &str = "relay@example.com";
pub const RECIPIENT: &str = "owner@example.com";

#[derive(Debug, Getters)]
pub struct TestApp {
    address: String,
    mail_sender: Arc<SmtpMailSender<AsyncStubTransport>>,
    api_client: reqwest::Client,
}

impl TestApp {
    pub fn at_url(&self, path: &str) -> String {
        format!("{}{path}", self.address)
    }

    /// Post a raw JSON body to the relay endpoint.
    pub async fn post_send_email(&self, body: impl Into<String>) -> reqwest::Response {
        self.api_client
            .post(self.at_url("/send-email"))
            .header("Content-Type", "application/json")
            .body(body.into())
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn health_check(&self) -> reqwest::Response {
        self.api_client
            .get(self.at_url("/health"))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    /// Every email the app handed to the mail transport so far.
    pub async fn sent_emails(&self) -> Vec<(Envelope, String)> {
        self.mail_sender.transport().messages().await
    }
}

/// Spawn a instance of the app on a random port with a succeeding mail
/// transport.
pub async fn spawn_app() -> TestApp {
    spawn_app_with(AsyncStubTransport::new_ok(), |_| {}).await
}

/// Spawn a instance of the app on a random port, using `transport` for mail
/// and letting `configure` adjust the settings first.
pub async fn spawn_app_with(
    transport: AsyncStubTransport,
    configure: impl FnOnce(&mut Settings),
) -> TestApp {
    Lazy::force(&TRACING);
    let config = {
        let mut c = get_configuration().expect("Failed to read configuration");

        // Make OS choose random port
        c.application.host = "127.0.0.1".into();
        c.application.port = 0;
        c.email.sender = Some(SENDER.into());
        c.email.recipient = Some(RECIPIENT.into());
        configure(&mut c);

        c
    };

    let mail_sender = Arc::new(SmtpMailSender::new(transport));
    let app = App::build_with_mail_sender(config, mail_sender.clone())
        .expect("Failed to build application");
    let application_port = app.port();

    // Start server
    let _ = tokio::spawn(app.run_until_stopped());

    TestApp {
        address: format!("http://127.0.0.1:{application_port}"),
        mail_sender,
        api_client: reqwest::Client::new(),
    }
}
