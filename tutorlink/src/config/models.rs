//! Configuration model definitions.
//!
//! This module contains the configuration structures for all Tutorlink components.

use crate::notifications::webhook::RetryPolicy;
use crate::storage::config::SurrealDBConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Main configuration structure for Tutorlink.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TutorlinkConfig {
    /// Storage configuration
    pub storage: StorageConfig,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// Expiry sweeper configuration
    pub sweeper: SweeperConfig,

    /// Notification delivery configuration
    pub notifications: NotificationConfig,
}

/// Configuration for storage components.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Base directory for on-disk data
    pub data_dir: PathBuf,

    /// SurrealDB connection settings
    pub surrealdb: SurrealDBConfig,
}

impl Default for StorageConfig {
    fn default() -> Self {
        let data_dir = directories::ProjectDirs::from("org", "tutorlink", "tutorlink")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("./data"));

        Self {
            data_dir,
            surrealdb: SurrealDBConfig::default(),
        }
    }
}

/// Configuration for the expiry sweeper.
///
/// Pending relationships older than `ttl` are declined automatically each time
/// the sweeper runs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SweeperConfig {
    /// Whether the engine starts the sweeper task
    pub enabled: bool,

    /// Time between two sweeps
    #[serde(with = "humantime_serde")]
    pub interval: Duration,

    /// Age after which a pending relationship expires
    #[serde(with = "humantime_serde")]
    pub ttl: Duration,

    /// Whether providers get a reminder for pending requests that have not expired yet
    pub send_reminders: bool,
}

impl Default for SweeperConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval: Duration::from_secs(24 * 60 * 60),
            ttl: Duration::from_secs(5 * 24 * 60 * 60 + 12 * 60 * 60),
            send_reminders: true,
        }
    }
}

/// Configuration for notification delivery.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NotificationConfig {
    /// Per-notifier delivery timeout in milliseconds
    pub timeout_ms: u64,

    /// Whether notifications are written to the log
    pub log_notifications: bool,

    /// Optional webhook receiving every notification
    pub webhook: Option<WebhookConfig>,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 5000,
            log_notifications: true,
            webhook: None,
        }
    }
}

/// Webhook endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WebhookConfig {
    /// The URL notifications are POSTed to
    pub url: String,

    /// Request timeout
    #[serde(with = "humantime_serde", default = "default_webhook_timeout")]
    pub timeout: Duration,

    /// Retry policy for failed requests
    #[serde(default)]
    pub retry: RetryPolicy,
}

fn default_webhook_timeout() -> Duration {
    Duration::from_secs(10)
}

impl WebhookConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: default_webhook_timeout(),
            retry: RetryPolicy::default(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level
    pub level: LogLevel,

    /// Log format
    pub format: LogFormat,

    /// File to log to (if any)
    pub file: Option<PathBuf>,

    /// Whether to log to stdout
    pub stdout: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Default,
            file: None,
            stdout: true,
        }
    }
}

/// Log level.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level
    Trace,

    /// Debug level
    Debug,

    /// Info level
    Info,

    /// Warn level
    Warn,

    /// Error level
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(format!("Invalid log level: {}", s)),
        }
    }
}

/// Log format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Default format
    Default,

    /// JSON format
    Json,

    /// Compact format
    Compact,

    /// Pretty format
    Pretty,
}
