//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// HTTP client settings shared by feed fetch and classification
    #[serde(default)]
    pub http: HttpConfig,

    /// Feed source settings
    #[serde(default)]
    pub feed: FeedConfig,

    /// Chat-completion classifier settings
    #[serde(default)]
    pub classifier: ClassifierConfig,

    /// Persistence settings
    #[serde(default)]
    pub store: StoreConfig,

    /// Summary email settings
    #[serde(default)]
    pub mail: MailConfig,

    /// Ingestion schedule settings
    #[serde(default)]
    pub scheduler: SchedulerConfig,

    /// Feed fetch retry settings
    #[serde(default)]
    pub retry: RetryConfig,

    /// Liveness endpoint settings
    #[serde(default)]
    pub server: ServerConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// Secrets (classifier API key, SMTP password) are overridden from the
    /// environment after parsing so they never have to live in the file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;
        config.apply_env();
        Ok(config)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            tracing::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            let mut config = Self::default();
            config.apply_env();
            config
        })
    }

    /// Override secret fields from environment variables when set.
    fn apply_env(&mut self) {
        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            self.classifier.api_key = key;
        }
        if let Ok(username) = std::env::var("SMTP_USERNAME") {
            self.mail.username = username;
        }
        if let Ok(password) = std::env::var("SMTP_PASSWORD") {
            self.mail.password = password;
        }
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.http.user_agent.trim().is_empty() {
            return Err(AppError::validation("http.user_agent is empty"));
        }
        if self.http.timeout_secs == 0 {
            return Err(AppError::validation("http.timeout_secs must be > 0"));
        }
        if self.feed.url.trim().is_empty() {
            return Err(AppError::validation("feed.url is empty"));
        }
        Url::parse(&self.feed.url)
            .map_err(|e| AppError::validation(format!("feed.url is not a valid URL: {e}")))?;
        if self.classifier.model.trim().is_empty() {
            return Err(AppError::validation("classifier.model is empty"));
        }
        if self.store.database_url.trim().is_empty() {
            return Err(AppError::validation("store.database_url is empty"));
        }
        if self.mail.smtp_host.trim().is_empty() {
            return Err(AppError::validation("mail.smtp_host is empty"));
        }
        if self.mail.from.trim().is_empty() || self.mail.to.trim().is_empty() {
            return Err(AppError::validation("mail.from and mail.to are required"));
        }
        if self.scheduler.interval_secs == 0 {
            return Err(AppError::validation("scheduler.interval_secs must be > 0"));
        }
        if self.retry.attempts == 0 {
            return Err(AppError::validation("retry.attempts must be > 0"));
        }
        Ok(())
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header for outbound requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// Feed source settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FeedConfig {
    /// URL of the RSS feed to poll
    #[serde(default)]
    pub url: String,
}

/// Chat-completion classifier settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Chat-completions endpoint
    #[serde(default = "defaults::completions_url")]
    pub base_url: String,

    /// Model identifier
    #[serde(default = "defaults::model")]
    pub model: String,

    /// API key; normally supplied via the OPENAI_API_KEY environment variable
    #[serde(default)]
    pub api_key: String,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::completions_url(),
            model: defaults::model(),
            api_key: String::new(),
        }
    }
}

/// Persistence settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// SQLite database URL
    #[serde(default = "defaults::database_url")]
    pub database_url: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_url: defaults::database_url(),
        }
    }
}

/// Summary email settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    /// Mail relay hostname
    #[serde(default)]
    pub smtp_host: String,

    /// Mail relay submission port
    #[serde(default = "defaults::smtp_port")]
    pub smtp_port: u16,

    /// Relay username; overridable via SMTP_USERNAME
    #[serde(default)]
    pub username: String,

    /// Relay password; normally supplied via SMTP_PASSWORD
    #[serde(default)]
    pub password: String,

    /// Sender address
    #[serde(default)]
    pub from: String,

    /// Recipient address
    #[serde(default)]
    pub to: String,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            smtp_host: String::new(),
            smtp_port: defaults::smtp_port(),
            username: String::new(),
            password: String::new(),
            from: String::new(),
            to: String::new(),
        }
    }
}

/// Ingestion schedule settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Seconds between ingestion runs
    #[serde(default = "defaults::interval")]
    pub interval_secs: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            interval_secs: defaults::interval(),
        }
    }
}

/// Feed fetch retry settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total tries before the run is abandoned
    #[serde(default = "defaults::retry_attempts")]
    pub attempts: u32,

    /// Fixed pause between tries, in seconds
    #[serde(default = "defaults::retry_delay")]
    pub delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            attempts: defaults::retry_attempts(),
            delay_secs: defaults::retry_delay(),
        }
    }
}

/// Liveness endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Socket address to bind
    #[serde(default = "defaults::bind_addr")]
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: defaults::bind_addr(),
        }
    }
}

mod defaults {
    // HTTP defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; feedloop/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }

    // Classifier defaults
    pub fn completions_url() -> String {
        "https://api.openai.com/v1/chat/completions".into()
    }
    pub fn model() -> String {
        "gpt-3.5-turbo".into()
    }

    // Store defaults
    pub fn database_url() -> String {
        "sqlite://feedloop.db".into()
    }

    // Mail defaults
    pub fn smtp_port() -> u16 {
        587
    }

    // Scheduler defaults: every 4 hours
    pub fn interval() -> u64 {
        4 * 60 * 60
    }

    // Retry defaults
    pub fn retry_attempts() -> u32 {
        3
    }
    pub fn retry_delay() -> u64 {
        2
    }

    // Server defaults
    pub fn bind_addr() -> String {
        "0.0.0.0:8080".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Config {
        let mut config = Config::default();
        config.feed.url = "https://example.com/feed.xml".to_string();
        config.mail.smtp_host = "smtp.example.com".to_string();
        config.mail.from = "bot@example.com".to_string();
        config.mail.to = "team@example.com".to_string();
        config
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.scheduler.interval_secs, 14_400);
        assert_eq!(config.retry.attempts, 3);
        assert_eq!(config.retry.delay_secs, 2);
        assert_eq!(config.mail.smtp_port, 587);
    }

    #[test]
    fn test_validate_accepts_complete_config() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_missing_feed_url() {
        let mut config = valid_config();
        config.feed.url = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_malformed_feed_url() {
        let mut config = valid_config();
        config.feed.url = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_interval() {
        let mut config = valid_config();
        config.scheduler.interval_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_partial_toml() {
        let raw = r#"
            [feed]
            url = "https://example.com/rss"

            [scheduler]
            interval_secs = 600
        "#;
        let config: Config = toml::from_str(raw).unwrap();
        assert_eq!(config.feed.url, "https://example.com/rss");
        assert_eq!(config.scheduler.interval_secs, 600);
        assert_eq!(config.retry.attempts, 3);
    }
}
