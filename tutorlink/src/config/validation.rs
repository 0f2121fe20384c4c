//! Configuration validation utilities.
//!
//! This module provides validation functions for configuration values.

use super::ConfigError;
use super::models::*;

/// Validate the entire configuration.
pub fn validate_config(config: &TutorlinkConfig) -> Result<(), ConfigError> {
    validate_storage_config(&config.storage)?;
    validate_sweeper_config(&config.sweeper)?;
    validate_notification_config(&config.notifications)?;

    Ok(())
}

/// Validate storage configuration.
fn validate_storage_config(config: &StorageConfig) -> Result<(), ConfigError> {
    if config.data_dir.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "Data directory cannot be empty".to_string(),
        ));
    }

    config
        .surrealdb
        .validate()
        .map_err(|e| ConfigError::ValidationError(e.to_string()))
}

/// Validate sweeper configuration.
fn validate_sweeper_config(config: &SweeperConfig) -> Result<(), ConfigError> {
    if config.interval.is_zero() {
        return Err(ConfigError::ValidationError(
            "Sweeper interval must be greater than 0".to_string(),
        ));
    }
    if config.ttl.is_zero() {
        return Err(ConfigError::ValidationError(
            "Pending TTL must be greater than 0".to_string(),
        ));
    }

    Ok(())
}

/// Validate notification configuration.
fn validate_notification_config(config: &NotificationConfig) -> Result<(), ConfigError> {
    if config.timeout_ms == 0 {
        return Err(ConfigError::ValidationError(
            "Notification timeout must be greater than 0".to_string(),
        ));
    }

    if let Some(webhook) = &config.webhook {
        let url = webhook.url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::ValidationError(format!(
                "Webhook URL must start with http:// or https://, got '{}'",
                webhook.url
            )));
        }
        if webhook.retry.backoff_multiplier < 1.0 {
            return Err(ConfigError::ValidationError(
                "Webhook backoff multiplier must be at least 1.0".to_string(),
            ));
        }
    }

    Ok(())
}
