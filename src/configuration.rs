use crate::domain::{EmailAddress, SubmissionSchema};
use config::{Config, Environment as EnvironmentSource, File, FileFormat};
use derive_getters::Getters;
use secrecy::Secret;
use serde_aux::field_attributes::deserialize_number_from_string;
use std::time::Duration;

/// Retrieve the configuration for the application.
///
/// Sources are layered: built-in defaults, `configuration/base.yaml`,
/// `configuration/<APP_ENVIRONMENT>.yaml`, `APP_`-prefixed environment
/// variables and finally `SMTP_EMAIL`/`SMTP_PASSWORD`. Every file is optional.
pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(config::ConfigError::Message)?;
    let configuration_directory = std::path::Path::new("configuration");

    Config::builder()
        .set_default("application.host", "0.0.0.0")?
        .set_default("application.port", 8080)?
        .set_default("application.schema", "contact_form")?
        .set_default("application.log_request_body", false)?
        .set_default("email.host", "smtp.gmail.com")?
        .set_default("email.port", 587)?
        .set_default("email.username", "")?
        .set_default("email.password", "")?
        .set_default("email.tls", "starttls")?
        .set_default("email.timeout_milliseconds", 10_000)?
        .set_default("cors.enabled", true)?
        .set_default("cors.allow_origin", "*")?
        .add_source(
            File::from(configuration_directory.join("base.yaml"))
                .format(FileFormat::Yaml)
                .required(false),
        )
        .add_source(
            File::from(configuration_directory.join(environment.as_file_name()))
                .format(FileFormat::Yaml)
                .required(false),
        )
        .add_source(
            EnvironmentSource::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .set_override_option("email.username", std::env::var("SMTP_EMAIL").ok())?
        .set_override_option("email.password", std::env::var("SMTP_PASSWORD").ok())?
        .build()?
        .try_deserialize()
}

#[derive(Debug, Clone, serde::Deserialize, Getters)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub email: EmailSettings,
    pub cors: CorsSettings,
}

#[derive(Debug, Clone, serde::Deserialize, Getters)]
pub struct ApplicationSettings {
    pub host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub schema: SubmissionSchema,
    /// Log every raw request body at debug level. Bodies carry user-submitted
    /// personal data, so this stays off outside of local debugging.
    pub log_request_body: bool,
}

impl ApplicationSettings {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, serde::Deserialize, Getters)]
pub struct EmailSettings {
    pub host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub username: String,
    pub password: Secret<String>,
    #[getter(skip)]
    pub sender: Option<String>,
    #[getter(skip)]
    pub recipient: Option<String>,
    pub tls: TlsMode,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_milliseconds: u64,
}

impl EmailSettings {
    /// The `From` address of relayed mail. Defaults to the SMTP account.
    pub fn sender(&self) -> Result<EmailAddress, String> {
        let sender = self
            .sender
            .clone()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| self.username.clone());
        if sender.is_empty() {
            return Err("No sender address configured, set SMTP_EMAIL or email.sender".into());
        }
        EmailAddress::parse(sender)
    }

    /// The mailbox relayed mail is delivered to. Defaults to the sender.
    pub fn recipient(&self) -> Result<EmailAddress, String> {
        match self.recipient.clone().filter(|s| !s.is_empty()) {
            Some(recipient) => EmailAddress::parse(recipient),
            None => self.sender(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_milliseconds)
    }

    /// The bound on a single send. A zero timeout would fail every send.
    pub fn send_timeout(&self) -> Result<Duration, String> {
        if self.timeout_milliseconds == 0 {
            return Err("email.timeout_milliseconds must be greater than zero".into());
        }
        Ok(self.timeout())
    }
}

/// How the connection to the SMTP relay is secured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TlsMode {
    /// Upgrade a plain connection with `STARTTLS`, usually on port 587.
    StartTls,
    /// TLS from the first byte, usually on port 465.
    Tls,
    /// Unencrypted and unauthenticated. Only for local mail catchers.
    Plain,
}

#[derive(Debug, Clone, serde::Deserialize, Getters)]
pub struct CorsSettings {
    pub enabled: bool,
    /// Either `*` or a single origin such as `https://example.com`.
    pub allow_origin: String,
}

/// The runtime environment for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }

    fn as_file_name(&self) -> String {
        format!("{}.yaml", self.as_str())
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{other} is not a supported environment. Use either `local` or `production`."
            )),
        }
    }
}
