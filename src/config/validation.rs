//! Configuration validation module
//!
//! Validation functions ensuring all required settings are properly
//! configured before the server starts.

use super::Settings;
use crate::utils::errors::{GatherlyError, Result};

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_server_config(&settings.server)?;
    validate_database_config(&settings.database)?;
    validate_auth_config(&settings.auth)?;
    validate_logging_config(&settings.logging)?;

    Ok(())
}

fn validate_server_config(config: &super::ServerConfig) -> Result<()> {
    if config.host.is_empty() {
        return Err(GatherlyError::Config("Server host is required".to_string()));
    }

    if config.request_timeout_seconds == 0 {
        return Err(GatherlyError::Config(
            "Request timeout must be greater than 0".to_string(),
        ));
    }

    Ok(())
}

fn validate_database_config(config: &super::DatabaseConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(GatherlyError::Config("Database URL is required".to_string()));
    }

    if config.max_connections == 0 {
        return Err(GatherlyError::Config(
            "Max connections must be greater than 0".to_string(),
        ));
    }

    if config.min_connections > config.max_connections {
        return Err(GatherlyError::Config(
            "Min connections cannot be greater than max connections".to_string(),
        ));
    }

    Ok(())
}

fn validate_auth_config(config: &super::AuthConfig) -> Result<()> {
    if config.jwt_secret.is_empty() {
        return Err(GatherlyError::Config("JWT secret is required".to_string()));
    }

    if config.token_ttl_seconds == 0 {
        return Err(GatherlyError::Config(
            "Token TTL must be greater than 0".to_string(),
        ));
    }

    Ok(())
}

fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(GatherlyError::Config("Log level is required".to_string()));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(GatherlyError::Config(format!(
            "Invalid log level: {}. Valid levels: {:?}",
            config.level, valid_levels
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_settings() -> Settings {
        let mut settings = Settings::default();
        settings.auth.jwt_secret = "test-secret".to_string();
        settings
    }

    #[test]
    fn test_valid_settings_pass() {
        assert!(validate_settings(&valid_settings()).is_ok());
    }

    #[test]
    fn test_missing_jwt_secret_rejected() {
        let settings = Settings::default();
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_invalid_log_level_rejected() {
        let mut settings = valid_settings();
        settings.logging.level = "verbose".to_string();
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_connection_bounds_rejected() {
        let mut settings = valid_settings();
        settings.database.min_connections = 20;
        settings.database.max_connections = 10;
        assert!(validate_settings(&settings).is_err());
    }
}
