use anyhow::Context;
use contact_relay::{
    build_contact_handler, configuration::get_configuration, lambda, mail_sender::SmtpMailSender,
    telemetry, App,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init_subscriber(telemetry::get_subscriber(
        "contact_relay".to_string(),
        std::io::stdout,
    ));

    let configuration = get_configuration().context("Failed to read configuration")?;

    if lambda::is_lambda_runtime() {
        let mail_sender = <SmtpMailSender>::try_from(configuration.email())
            .context("Failed to create the SMTP mail sender")?;
        let handler = build_contact_handler(&configuration, Arc::new(mail_sender))?;
        return lambda::run(Arc::new(handler), configuration.cors())
            .await
            .map_err(|e| anyhow::anyhow!(e));
    }

    let app = App::build(configuration)?;
    app.run_until_stopped().await
}
