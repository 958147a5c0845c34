use std::time::Duration;

use anyhow::Result;
use config::Config;
use serde::Deserialize;

use crate::constants::VERSION;
use crate::error::{CoreError, CoreResult};

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub mail: MailConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MailConfig {
    /// `From:` address of every scheduling message.
    pub sender: String,
    pub smtp: SmtpConfig,
}

/// How the SMTP connection is secured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SmtpSecurity {
    /// TLS from the first byte (port 465).
    Implicit,
    /// Plain connection upgraded with `STARTTLS`.
    StartTls,
    /// No TLS. Only for local relays.
    None,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub security: SmtpSecurity,
    pub username: Option<String>,
    pub password: Option<String>,
    pub timeout_secs: u64,
}

impl SmtpConfig {
    /// ## Summary
    /// Returns the bound applied to connecting and to each recipient's send.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// ## Summary
    /// Returns the SMTP credentials when both username and password are set.
    #[must_use]
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some((user.as_str(), pass.as_str())),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub expose_version: bool,
    pub version: String,
}

impl ServerConfig {
    /// ## Summary
    /// Returns the version string to disclose, or `None` when disclosure is off.
    #[must_use]
    pub fn exposed_version(&self) -> Option<&str> {
        self.expose_version.then_some(self.version.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Settings {
    /// ## Summary
    /// Loads configuration from environment variables and an optional `config.toml`.
    /// Environment variables (`KUNAI_MAIL__SENDER`, ...) take precedence over the file.
    ///
    /// ## Errors
    /// Returns an error if building the configuration or deserializing it fails.
    pub fn load() -> Result<Self> {
        let settings = Config::builder()
            .set_default("mail.smtp.host", "localhost")?
            .set_default("mail.smtp.port", 25)?
            .set_default("mail.smtp.security", "starttls")?
            .set_default("mail.smtp.timeout_secs", 30)?
            .set_default("server.expose_version", false)?
            .set_default("server.version", VERSION)?
            .set_default("logging.level", "info")?
            // TOML file
            .add_source(config::File::with_name("config.toml").required(false))
            // Env file and process environment
            .add_source(
                config::Environment::with_prefix("KUNAI")
                    .prefix_separator("_")
                    .separator("__")
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<Self>()?;

        settings.validate()?;
        Ok(settings)
    }

    /// ## Summary
    /// Checks values that deserialize fine but cannot be used.
    ///
    /// ## Errors
    /// Returns `CoreError::ConfigError` if the sender address is blank or the
    /// SMTP timeout is zero.
    pub fn validate(&self) -> CoreResult<()> {
        if self.mail.sender.trim().is_empty() {
            return Err(CoreError::ConfigError("mail.sender must not be empty".into()));
        }
        if self.mail.smtp.timeout_secs == 0 {
            return Err(CoreError::ConfigError(
                "mail.smtp.timeout_secs must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

/// ## Summary
/// Loads configuration from environment variables and `.env` file.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config() -> Result<Settings> {
    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!(error = %e, "No .env file loaded");
    }

    Settings::load()
}
