//! src/configuration.rs
use crate::wisher::LeapDayPolicy;
use chrono::{FixedOffset, NaiveTime};
use config::{Config, ConfigError, Environment as EnvSource, File};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Deserializer};
use sqlx::postgres::{PgConnectOptions, PgSslMode};

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub application: ApplicationSettings,
    pub wisher: WisherSettings,
    #[serde(default)]
    pub email: Option<EmailSettings>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseSettings {
    pub username: String,
    pub password: Secret<String>,
    pub port: u16,
    pub host: String,
    pub database_name: String,
    #[serde(default)]
    pub require_ssl: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApplicationSettings {
    pub port: u16,
    pub host: String,
    pub hmac_secret: Secret<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WisherSettings {
    pub utc_offset_minutes: i32,
    #[serde(default)]
    pub leap_day_policy: LeapDayPolicy,
    #[serde(default = "default_trigger_time")]
    pub trigger_time: String,
}

fn default_trigger_time() -> String {
    "00:01".into()
}

impl WisherSettings {
    pub fn offset(&self) -> Result<FixedOffset, ConfigError> {
        self.utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| {
                ConfigError::Message(format!(
                    "{} minutes is not a valid UTC offset.",
                    self.utc_offset_minutes
                ))
            })
    }

    pub fn trigger_time(&self) -> Result<NaiveTime, ConfigError> {
        NaiveTime::parse_from_str(&self.trigger_time, "%H:%M").map_err(|e| {
            ConfigError::Message(format!(
                "{} is not a valid trigger time (expected HH:MM): {}",
                self.trigger_time, e
            ))
        })
    }
}

#[derive(Debug, Default, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EmailTransport {
    #[default]
    Brevo,
    Smtp,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EmailSettings {
    #[serde(default)]
    pub transport: EmailTransport,
    pub sender_name: String,
    pub sender_email: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub api_url: Option<String>,
    #[serde(default, deserialize_with = "blank_secret_as_none")]
    pub api_key: Option<Secret<String>>,
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub smtp_username: Option<String>,
    #[serde(default, deserialize_with = "blank_secret_as_none")]
    pub smtp_password: Option<Secret<String>>,
}

/// `EMAIL_CLIENT_API_KEY=` is left unset, not set to an empty key.
fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

fn blank_secret_as_none<'de, D>(deserializer: D) -> Result<Option<Secret<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(blank_as_none(deserializer)?.map(Secret::new))
}

fn default_smtp_host() -> String {
    "smtp.office365.com".into()
}

fn default_smtp_port() -> u16 {
    587
}

impl DatabaseSettings {
    /// Omitting the database name connects to the Postgres instance, not a specific logical database.
    /// This is useful for operations that create or drop databases.
    pub fn without_db(&self) -> PgConnectOptions {
        let ssl_mode = if self.require_ssl {
            PgSslMode::Require
        } else {
            PgSslMode::Prefer
        };

        PgConnectOptions::new()
            .host(&self.host)
            .username(&self.username)
            .password(self.password.expose_secret())
            .port(self.port)
            .ssl_mode(ssl_mode)
    }

    pub fn with_db(&self) -> PgConnectOptions {
        self.without_db().database(&self.database_name)
    }
}

#[derive(Debug, PartialEq)]
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
}

impl TryFrom<String> for Environment {
    type Error = String;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.as_ref() {
            "local" => Ok(Environment::Local),
            "production" => Ok(Environment::Production),
            _ => Err(format!(
                "{} is not a supported environment. Use either `local` or `production`.",
                s
            )),
        }
    }
}

pub fn get_configuration() -> Result<Settings, ConfigError> {
    let base_path = std::env::current_dir()
        .map_err(|e| ConfigError::Message(format!("Failed to determine the current directory: {}", e)))?;
    let configuration_directory = base_path.join("configuration");

    // Detect the running environment.
    // Default to `local` if not specified.
    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(ConfigError::Message)?;

    // E.g. `APP_DATABASE__PASSWORD=...` sets `Settings.database.password`.
    let settings = Config::builder()
        .add_source(File::from(configuration_directory.join("base")).required(true))
        .add_source(File::from(configuration_directory.join(environment.as_str())).required(true))
        .add_source(
            EnvSource::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    let mut settings: Settings = settings.try_deserialize()?;

    if environment == Environment::Local {
        // The email file holds secrets and is not committed, so it may be absent.
        let email_file_path = configuration_directory.join("email");
        if email_file_path.exists() {
            dotenvy::from_filename(email_file_path)
                .map_err(|e| ConfigError::Foreign(Box::new(e)))?;
        }
    }

    settings.email = email_settings_from(std::env::vars())?;

    Ok(settings)
}

/// `None` when the required `EMAIL_CLIENT_*` variables are absent.
fn email_settings_from<I>(vars: I) -> Result<Option<EmailSettings>, ConfigError>
where
    I: IntoIterator<Item = (String, String)>,
{
    match envy::prefixed("EMAIL_CLIENT_").from_iter::<_, EmailSettings>(vars) {
        Ok(email_settings) => Ok(Some(email_settings)),
        Err(envy::Error::MissingValue(_)) => Ok(None),
        Err(e) => Err(ConfigError::Foreign(Box::new(e))),
    }
}
