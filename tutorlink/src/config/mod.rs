//! Configuration system for Tutorlink.
//!
//! Configuration is layered: built-in defaults, then the first configuration
//! file found, then `TUTORLINK_`-prefixed environment variables. The result is
//! validated before use.

mod builder;
mod loader;
mod models;
#[cfg(test)]
mod tests;
pub mod validation;

pub use builder::ConfigBuilder;
pub use loader::ConfigLoader;
pub use models::*;

/// Default configuration file names that the system will look for
pub const DEFAULT_CONFIG_FILES: &[&str] = &[
    "tutorlink.toml",
    "tutorlink.yaml",
    "tutorlink.yml",
    "tutorlink.json",
    ".tutorlink/config.toml",
    ".tutorlink/config.yaml",
    ".tutorlink/config.yml",
    ".tutorlink/config.json",
];

/// Environment variable prefix for Tutorlink configuration
pub const ENV_PREFIX: &str = "TUTORLINK_";

/// Configuration error type
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Error occurred during file loading
    #[error("Failed to load configuration file: {0}")]
    FileLoadError(String),

    /// Error occurred during validation
    #[error("Configuration validation error: {0}")]
    ValidationError(String),

    /// Error occurred during parsing
    #[error("Configuration parsing error: {0}")]
    ParseError(String),
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;
