//! Structured logging infrastructure for Tutorlink.
//!
//! This module provides a configurable logging system based on the tracing crate,
//! supporting different output formats, log levels and an optional log file.


use crate::config::{LogFormat, LogLevel, LoggingConfig};
use std::path::Path;
use std::sync::OnceLock;
use tracing::Level;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};

/// Keeps the file writer flushing for the lifetime of the process
static FILE_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Error type for logging operations
#[derive(Debug)]
pub enum LogError {
    /// IO error occurred
    IoError(std::io::Error),

    /// Error parsing log level
    InvalidLogLevel(String),

    /// Error in subscriber setup
    SubscriberError(Box<dyn std::error::Error + Send + Sync>),
}

impl From<std::io::Error> for LogError {
    fn from(err: std::io::Error) -> Self {
        LogError::IoError(err)
    }
}

impl From<Box<dyn std::error::Error + Send + Sync>> for LogError {
    fn from(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        LogError::SubscriberError(err)
    }
}

/// Result type for logging operations
pub type Result<T> = std::result::Result<T, LogError>;

/// Initialize the logging system with the given configuration.
///
/// `RUST_LOG` takes precedence over the configured level. Calling this when a
/// global subscriber is already installed is not an error.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let Some(writer) = make_writer(config)? else {
        return Ok(());
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.to_string()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_level(true)
        .with_target(true)
        .with_line_number(true);

    let result = match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Default => builder.try_init(),
    };

    match result {
        Ok(()) => Ok(()),
        Err(e) if is_already_initialized(e.as_ref()) => Ok(()),
        Err(e) => Err(LogError::SubscriberError(e)),
    }
}

fn is_already_initialized(err: &(dyn std::error::Error + Send + Sync)) -> bool {
    let message = err.to_string();
    message.contains("SetGlobalDefaultError")
        || message.contains("global default")
        || message.contains("already")
}

/// Pick stdout, the log file, or both
fn make_writer(config: &LoggingConfig) -> Result<Option<BoxMakeWriter>> {
    let file = match &config.file {
        Some(path) => Some(create_non_blocking_file(path)?),
        None => None,
    };

    let writer = match (file, config.stdout) {
        (Some(file), true) => Some(BoxMakeWriter::new(std::io::stdout.and(file))),
        (Some(file), false) => Some(BoxMakeWriter::new(file)),
        (None, true) => Some(BoxMakeWriter::new(std::io::stdout)),
        (None, false) => None,
    };

    Ok(writer)
}

/// Create a non-blocking file writer.
fn create_non_blocking_file(path: impl AsRef<Path>) -> Result<NonBlocking> {
    let path = path.as_ref();

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        std::fs::create_dir_all(parent)?;
    }

    let file_name = path
        .file_name()
        .ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("Log file path has no file name: {}", path.display()),
            )
        })?;

    let file_appender = tracing_appender::rolling::never(
        path.parent().unwrap_or_else(|| Path::new(".")),
        file_name,
    );

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    // A second init keeps the first guard; its writer is discarded with the subscriber
    let _ = FILE_GUARD.set(guard);

    Ok(non_blocking)
}

/// Parse a log level string into a LogLevel enum.
pub fn parse_log_level(level: &str) -> Result<LogLevel> {
    level
        .parse::<LogLevel>()
        .map_err(|_| LogError::InvalidLogLevel(level.to_string()))
}

/// Convert a tracing::Level to a LogLevel enum.
pub fn level_to_log_level(level: Level) -> LogLevel {
    match level {
        Level::TRACE => LogLevel::Trace,
        Level::DEBUG => LogLevel::Debug,
        Level::INFO => LogLevel::Info,
        Level::WARN => LogLevel::Warn,
        Level::ERROR => LogLevel::Error,
    }
}

/// Convert a LogLevel to a tracing::Level.
pub fn log_level_to_level(level: LogLevel) -> Level {
    match level {
        LogLevel::Trace => Level::TRACE,
        LogLevel::Debug => Level::DEBUG,
        LogLevel::Info => Level::INFO,
        LogLevel::Warn => Level::WARN,
        LogLevel::Error => Level::ERROR,
    }
}

impl std::fmt::Display for LogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogError::IoError(e) => write!(f, "IO error: {}", e),
            LogError::SubscriberError(e) => write!(f, "Subscriber error: {}", e),
            LogError::InvalidLogLevel(s) => write!(f, "Invalid log level: {}", s),
        }
    }
}

impl std::error::Error for LogError {}
