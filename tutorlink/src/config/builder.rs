//! Configuration builder.
//!
//! This module provides a builder pattern API for creating configurations.

use super::{Result, models::*, validation};
use crate::notifications::webhook::RetryPolicy;
use crate::storage::config::SurrealDBEngine;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Builder for creating TutorlinkConfig instances.
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: TutorlinkConfig,
}

impl ConfigBuilder {
    /// Create a new configuration builder with default values.
    pub fn new() -> Self {
        Self {
            config: TutorlinkConfig::default(),
        }
    }

    /// Start from an existing configuration, e.g. one produced by [`super::ConfigLoader`].
    pub fn from_config(config: TutorlinkConfig) -> Self {
        Self { config }
    }

    /// Set the base data directory.
    pub fn with_data_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config.storage.data_dir = path.as_ref().to_path_buf();
        self
    }

    /// Use persistent embedded storage under the data directory
    pub fn with_default_storage(mut self) -> Self {
        if self.config.storage.data_dir == PathBuf::from("./data") {
            let home_dir = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
            self.config.storage.data_dir = home_dir.join(".tutorlink").join("data");
        }

        self.config.storage.surrealdb.engine = SurrealDBEngine::SurrealKv;
        self.config.storage.surrealdb.connection = self
            .config
            .storage
            .data_dir
            .join("db")
            .to_string_lossy()
            .to_string();

        self
    }

    /// Use in-memory storage (good for testing)
    pub fn with_memory_storage(mut self) -> Self {
        self.config.storage.surrealdb.engine = SurrealDBEngine::Memory;
        self.config.storage.surrealdb.connection = "memory".to_string();
        self
    }

    /// Set the SurrealDB namespace and database.
    pub fn with_database(mut self, namespace: impl Into<String>, database: impl Into<String>) -> Self {
        self.config.storage.surrealdb.namespace = namespace.into();
        self.config.storage.surrealdb.database = database.into();
        self
    }

    /// Set the log level.
    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.config.logging.level = level;
        self
    }

    /// Set the log format.
    pub fn with_log_format(mut self, format: LogFormat) -> Self {
        self.config.logging.format = format;
        self
    }

    /// Configure logging to a file.
    pub fn with_log_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config.logging.file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Use default logging configuration (console output at Info level)
    pub fn with_default_logging(mut self) -> Self {
        self.config.logging.level = LogLevel::Info;
        self.config.logging.format = LogFormat::Json;
        self.config.logging.file = None;

        self
    }

    /// Set how often the expiry sweeper runs.
    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.config.sweeper.interval = interval;
        self
    }

    /// Set the age after which pending relationships expire.
    pub fn with_pending_ttl(mut self, ttl: Duration) -> Self {
        self.config.sweeper.ttl = ttl;
        self
    }

    /// Enable or disable expiry reminders.
    pub fn with_reminders(mut self, enabled: bool) -> Self {
        self.config.sweeper.send_reminders = enabled;
        self
    }

    /// Do not start the expiry sweeper with the engine.
    pub fn without_sweeper(mut self) -> Self {
        self.config.sweeper.enabled = false;
        self
    }

    /// Set the per-notifier delivery timeout.
    pub fn with_notification_timeout(mut self, timeout: Duration) -> Self {
        self.config.notifications.timeout_ms = timeout.as_millis() as u64;
        self
    }

    /// Send every notification to a webhook.
    pub fn with_webhook(mut self, url: impl Into<String>) -> Self {
        self.config.notifications.webhook = Some(WebhookConfig::new(url));
        self
    }

    /// Set the retry policy of the configured webhook.
    pub fn with_webhook_retry(mut self, retry: RetryPolicy) -> Self {
        if let Some(webhook) = self.config.notifications.webhook.as_mut() {
            webhook.retry = retry;
        }
        self
    }

    /// Do not write notifications to the log.
    pub fn without_log_notifications(mut self) -> Self {
        self.config.notifications.log_notifications = false;
        self
    }

    /// Create a configuration for development with an in-memory database.
    pub fn development() -> Self {
        Self::new()
            .with_memory_storage()
            .with_log_level(LogLevel::Debug)
    }

    /// Create a configuration for automated tests.
    ///
    /// In-memory storage, no sweeper task and quiet logging.
    pub fn testing() -> Self {
        Self::development()
            .with_data_dir(PathBuf::from("./test_data"))
            .with_log_level(LogLevel::Warn)
            .without_sweeper()
    }

    /// Create a production-ready configuration with persistent storage.
    pub fn production() -> Self {
        Self::new().with_default_storage().with_default_logging()
    }

    /// Create a fully default configuration.
    ///
    /// Uses in-memory storage; switch to [`ConfigBuilder::production`] for
    /// data that should survive a restart.
    pub fn defaults() -> Self {
        Self::new()
            .with_memory_storage()
            .with_log_level(LogLevel::Info)
    }

    /// Build the configuration, validating it in the process.
    pub fn build(self) -> Result<TutorlinkConfig> {
        validation::validate_config(&self.config)?;

        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
