use std::time::Duration;

use dotenvy::dotenv;
use serde::Deserialize;

use crate::{error::StartupError, models::retry::RetryConfig};

#[derive(Clone, Deserialize, Debug)]
pub struct Config {
    pub rmq_url: Option<String>,
    #[serde(default = "default_transaction_queue")]
    pub transaction_queue: String,
    #[serde(default = "default_admin_queue")]
    pub admin_queue: String,
    #[serde(default)]
    pub queue_durable: bool,

    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<String>,
    #[serde(default = "default_true")]
    pub smtp_use_tls: bool,
    #[serde(default = "default_smtp_timeout_seconds")]
    pub smtp_timeout_seconds: u64,

    #[serde(default = "default_mail_from")]
    pub mail_from: String,
    #[serde(default = "default_support_contact")]
    pub support_contact: String,

    #[serde(default = "default_dispatch_max_attempts")]
    pub dispatch_max_attempts: u32,
    #[serde(default = "default_initial_retry_delay_ms")]
    pub retry_initial_delay_ms: u64,
    #[serde(default = "default_max_retry_delay_ms")]
    pub retry_max_delay_ms: u64,
    #[serde(default = "default_retry_backoff_multiplier")]
    pub retry_backoff_multiplier: u64,
}

impl Config {
    pub fn load() -> Result<Self, StartupError> {
        dotenv().ok();

        let config = envy::from_env::<Self>()?;
        config.validate()?;
        Ok(config)
    }

    /// Builds a config from explicit key/value pairs instead of the process environment.
    pub fn from_pairs<I>(pairs: I) -> Result<Self, StartupError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config = envy::from_iter::<_, Self>(pairs)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), StartupError> {
        match self.rmq_url.as_deref() {
            Some(url) if !url.trim().is_empty() => Ok(()),
            _ => Err(StartupError::MissingConnectionUrl),
        }
    }

    pub fn connection_url(&self) -> Result<&str, StartupError> {
        self.rmq_url
            .as_deref()
            .ok_or(StartupError::MissingConnectionUrl)
    }

    pub fn smtp_credentials(&self) -> Option<(String, String)> {
        match (&self.smtp_username, &self.smtp_password) {
            (Some(username), Some(password)) => Some((username.clone(), password.clone())),
            _ => None,
        }
    }

    /// Upper bound on a single SMTP send, never below one second.
    pub fn send_timeout(&self) -> Duration {
        Duration::from_secs(self.smtp_timeout_seconds.max(1))
    }

    pub fn retry_config(&self) -> RetryConfig {
        RetryConfig {
            max_attempts: self.dispatch_max_attempts.max(1),
            initial_delay_ms: self.retry_initial_delay_ms,
            max_delay_ms: self.retry_max_delay_ms,
            backoff_multiplier: self.retry_backoff_multiplier,
        }
    }
}

fn default_transaction_queue() -> String {
    "errorQueue".to_string()
}

fn default_admin_queue() -> String {
    "successQueue".to_string()
}

fn default_smtp_host() -> String {
    "sandbox.smtp.mailtrap.io".to_string()
}

fn default_smtp_port() -> u16 {
    2525
}

fn default_true() -> bool {
    true
}

fn default_smtp_timeout_seconds() -> u64 {
    30
}

fn default_mail_from() -> String {
    "noreply@cinema.local".to_string()
}

fn default_support_contact() -> String {
    "support@cinema.local".to_string()
}

fn default_dispatch_max_attempts() -> u32 {
    1
}

fn default_initial_retry_delay_ms() -> u64 {
    500
}

fn default_max_retry_delay_ms() -> u64 {
    5000
}

fn default_retry_backoff_multiplier() -> u64 {
    2
}
