//! # Configuration
//!
//! Environment-driven configuration for the liftlog core. Values are loaded
//! once at process start and never mutated; services receive them by value
//! at construction.

use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use validator::Validate;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
pub struct AppConfig {
    /// Database configuration
    #[validate(nested)]
    pub database: DatabaseConfig,

    /// Authentication configuration
    #[validate(nested)]
    pub auth: AuthConfig,
}

impl AppConfig {
    /// Load configuration from the environment. `LIFTLOG_`-prefixed
    /// variables override the defaults (e.g. `LIFTLOG_AUTH__JWT_SECRET`,
    /// `LIFTLOG_DATABASE__URL`); a `.env` file is honored when present.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let loaded = config::Config::builder()
            .add_source(config::Config::try_from(&AppConfig::default())?)
            .add_source(config::Environment::with_prefix("LIFTLOG").separator("__"))
            .build()?;

        let app_config: AppConfig = loaded.try_deserialize()?;
        app_config.validate()?;
        Ok(app_config)
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        Validate::validate(self).map_err(Error::from)?;
        self.validate_custom()
    }

    /// Validation beyond what the derive can express
    fn validate_custom(&self) -> Result<()> {
        if !self.database.url.starts_with("sqlite:") {
            return Err(Error::validation("Database URL must start with 'sqlite:'"));
        }

        if self.database.min_connections > self.database.max_connections {
            return Err(Error::validation(
                "min_connections cannot be greater than max_connections",
            ));
        }

        Ok(())
    }
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DatabaseConfig {
    /// Database connection URL
    #[validate(length(min = 1, message = "Database URL cannot be empty"))]
    pub url: String,

    /// Maximum pool connections
    #[validate(range(min = 1, message = "max_connections must be greater than 0"))]
    pub max_connections: u32,

    /// Minimum pool connections kept open
    pub min_connections: u32,

    /// Connection acquire timeout in seconds
    pub connect_timeout_seconds: u64,

    /// Idle connection timeout in seconds (None = never reap)
    pub idle_timeout_seconds: Option<u64>,

    /// Apply the embedded schema on startup
    pub auto_migrate: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://liftlog.db".to_string(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout_seconds: 30,
            idle_timeout_seconds: Some(600),
            auto_migrate: true,
        }
    }
}

impl DatabaseConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_seconds)
    }

    pub fn idle_timeout(&self) -> Option<Duration> {
        self.idle_timeout_seconds.map(Duration::from_secs)
    }
}

/// Authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AuthConfig {
    /// Symmetric signing secret for identity tokens. Must be supplied via
    /// the environment; there is no usable default.
    #[validate(length(min = 32, message = "JWT secret must be at least 32 characters long"))]
    pub jwt_secret: String,

    /// Fixed token lifetime in seconds. There is no sliding renewal.
    #[validate(range(min = 1, message = "token TTL must be greater than 0"))]
    pub token_ttl_seconds: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self { jwt_secret: String::new(), token_ttl_seconds: 86_400 }
    }
}

impl AuthConfig {
    pub fn token_ttl(&self) -> Duration {
        Duration::from_secs(self.token_ttl_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> AppConfig {
        AppConfig {
            database: DatabaseConfig::default(),
            auth: AuthConfig {
                jwt_secret: "0123456789abcdef0123456789abcdef".to_string(),
                ..AuthConfig::default()
            },
        }
    }

    #[test]
    fn valid_config_passes() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn default_token_ttl_is_24_hours() {
        assert_eq!(AuthConfig::default().token_ttl(), Duration::from_secs(24 * 60 * 60));
    }

    #[test]
    fn short_jwt_secret_is_rejected() {
        let mut config = valid_config();
        config.auth.jwt_secret = "short".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_jwt_secret_is_rejected() {
        let config = AppConfig::default();
        assert!(config.validate().is_err());
    }

    #[test]
    fn non_sqlite_url_is_rejected() {
        let mut config = valid_config();
        config.database.url = "postgresql://localhost/liftlog".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn inverted_pool_bounds_are_rejected() {
        let mut config = valid_config();
        config.database.min_connections = 20;
        config.database.max_connections = 5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_ttl_is_rejected() {
        let mut config = valid_config();
        config.auth.token_ttl_seconds = 0;
        assert!(config.validate().is_err());
    }
}
