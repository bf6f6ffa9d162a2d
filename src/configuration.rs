use crate::domain::CustomerEmail;
use secrecy::{ExposeSecret, Secret};
use serde_aux::field_attributes::deserialize_number_from_string;
use serde_aux::field_attributes::deserialize_option_number_from_string;
use std::net::IpAddr;
use std::time::Duration;

#[derive(Debug)]
pub enum Environment {
    Local,
    Production,
}

#[derive(serde::Deserialize, Clone)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub application: ApplicationSettings,
    pub email_client: EmailClientSettings,
    pub ai_client: AiClientSettings,
    pub notification: NotificationSettings,
    pub admin: AdminSettings,
}

#[derive(serde::Deserialize, Clone)]
pub struct ApplicationSettings {
    #[serde(deserialize_with = "deserialize_option_number_from_string")]
    pub port: Option<u16>,
    pub host: IpAddr,
    pub allowed_origin: String,
}

#[derive(serde::Deserialize, Clone)]
pub struct DatabaseSettings {
    pub username: String,
    pub password: Secret<String>,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub host: String,
    pub database_name: String,
    pub require_ssl: bool,
    pub max_connections: u32,
    pub connection_timeout_milliseconds: u64,
}

#[derive(serde::Deserialize, Clone)]
pub struct EmailClientSettings {
    pub sender_email: String,
    pub timeout_milliseconds: u64,
}

#[derive(serde::Deserialize, Clone)]
pub struct AiClientSettings {
    pub base_url: String,
    pub model: String,
    pub api_key: Secret<String>,
    pub timeout_milliseconds: u64,
}

#[derive(serde::Deserialize, Clone)]
pub struct NotificationSettings {
    pub operator_email: String,
}

#[derive(serde::Deserialize, Clone)]
pub struct AdminSettings {
    /// Argon2 PHC string.
    pub password_hash: Secret<String>,
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigurationError {
    #[error("Required setting `{0}` is missing or empty.")]
    MissingSecret(&'static str),
    #[error("Setting `{0}` is not a valid email address: {1}")]
    InvalidAddress(&'static str, String),
}

impl Settings {
    /// Refuses to boot when a required secret was not provided.
    pub fn ensure_secrets_present(&self) -> Result<(), ConfigurationError> {
        let required = [
            ("database.password", self.database.password.expose_secret()),
            ("ai_client.api_key", self.ai_client.api_key.expose_secret()),
            ("admin.password_hash", self.admin.password_hash.expose_secret()),
            ("email_client.sender_email", &self.email_client.sender_email),
            (
                "notification.operator_email",
                &self.notification.operator_email,
            ),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigurationError::MissingSecret(name));
            }
        }
        self.email_client.sender()?;
        self.notification.operator()?;
        Ok(())
    }
}

impl EmailClientSettings {
    pub fn sender(&self) -> Result<CustomerEmail, ConfigurationError> {
        CustomerEmail::parse(self.sender_email.clone())
            .map_err(|e| ConfigurationError::InvalidAddress("email_client.sender_email", e))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_milliseconds)
    }
}

impl NotificationSettings {
    pub fn operator(&self) -> Result<CustomerEmail, ConfigurationError> {
        CustomerEmail::parse(self.operator_email.clone())
            .map_err(|e| ConfigurationError::InvalidAddress("notification.operator_email", e))
    }
}

impl AiClientSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_milliseconds)
    }
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} is not a supported environment. Use either 'local' or 'production'.",
                other
            )),
        }
    }
}

impl DatabaseSettings {
    pub fn connection_string(&self) -> Secret<String> {
        Secret::new(format!(
            "postgres://{}:{}@{}:{}/{}?sslmode={}",
            self.username,
            self.password.expose_secret(),
            self.host,
            self.port,
            self.database_name,
            ssl_mode(self.require_ssl)
        ))
    }

    /// Points at the server's maintenance database, for creating and
    /// dropping databases.
    pub fn connection_string_without_database(&self) -> Secret<String> {
        Secret::new(format!(
            "postgres://{}:{}@{}:{}/postgres?sslmode={}",
            self.username,
            self.password.expose_secret(),
            self.host,
            self.port,
            ssl_mode(self.require_ssl)
        ))
    }

    pub fn connection_timeout(&self) -> Duration {
        Duration::from_millis(self.connection_timeout_milliseconds)
    }
}

fn ssl_mode(require_ssl: bool) -> &'static str {
    match require_ssl {
        true => "require",
        false => "prefer",
    }
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir()
        .map_err(|e| config::ConfigError::Foreign(Box::new(e)))?;
    let configuration_directory = base_path.join("configuration");
    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(config::ConfigError::Message)?;
    let environment_filename = format!("{}.yaml", environment.as_str());

    config::Config::builder()
        .add_source(config::File::from(configuration_directory.join("base.yaml")))
        .add_source(config::File::from(
            configuration_directory.join(environment_filename),
        ))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?
        .try_deserialize()
}
