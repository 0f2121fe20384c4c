#[cfg(test)]
mod tests {
    use crate::config::{
        ConfigBuilder, ConfigLoader, LogFormat, LogLevel, TutorlinkConfig, validation,
    };
    use crate::storage::config::SurrealDBEngine;
    use std::io::Write;
    use std::path::PathBuf;
    use std::time::Duration;

    #[test]
    fn test_default_config() {
        let config = TutorlinkConfig::default();
        assert_eq!(config.storage.surrealdb.engine, SurrealDBEngine::Memory);
        assert_eq!(config.logging.level, LogLevel::Info);
        assert!(config.sweeper.enabled);
        assert_eq!(config.sweeper.interval, Duration::from_secs(86_400));
        assert_eq!(config.sweeper.ttl, Duration::from_secs(475_200));
        assert!(config.sweeper.send_reminders);
        assert_eq!(config.notifications.timeout_ms, 5000);
        assert!(config.notifications.webhook.is_none());
    }

    #[test]
    fn test_config_builder() {
        let config = ConfigBuilder::new()
            .with_data_dir("/tmp/test_data")
            .with_memory_storage()
            .with_log_level(LogLevel::Debug)
            .with_pending_ttl(Duration::from_secs(3600))
            .with_reminders(false)
            .with_webhook("http://localhost:9000/events")
            .build()
            .unwrap();

        assert_eq!(config.storage.data_dir, PathBuf::from("/tmp/test_data"));
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(config.sweeper.ttl, Duration::from_secs(3600));
        assert!(!config.sweeper.send_reminders);
        assert_eq!(
            config.notifications.webhook.map(|w| w.url),
            Some("http://localhost:9000/events".to_string())
        );
    }

    #[test]
    fn test_production_uses_persistent_storage() {
        let config = ConfigBuilder::new()
            .with_data_dir("/tmp/tutorlink")
            .with_default_storage()
            .build()
            .unwrap();

        assert_eq!(config.storage.surrealdb.engine, SurrealDBEngine::SurrealKv);
        assert_eq!(
            PathBuf::from(&config.storage.surrealdb.connection),
            PathBuf::from("/tmp/tutorlink").join("db")
        );
    }

    #[test]
    fn test_predefined_configs() {
        let dev = ConfigBuilder::development().build().unwrap();
        let test = ConfigBuilder::testing().build().unwrap();

        assert_eq!(dev.logging.level, LogLevel::Debug);
        assert_eq!(test.storage.data_dir, PathBuf::from("./test_data"));
        assert!(!test.sweeper.enabled);
    }

    #[test]
    fn test_validation() {
        assert!(ConfigBuilder::new().build().is_ok());
        assert!(validation::validate_config(&TutorlinkConfig::default()).is_ok());

        let zero_ttl = ConfigBuilder::new().with_pending_ttl(Duration::ZERO).build();
        assert!(zero_ttl.is_err());

        let bad_webhook = ConfigBuilder::new().with_webhook("ftp://nowhere").build();
        assert!(bad_webhook.is_err());
    }

    #[test]
    fn test_load_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[logging]
level = "warn"
format = "compact"

[sweeper]
interval = "12h"
ttl = "5days 12h"
send_reminders = false

[notifications]
timeout_ms = 250
"#
        )
        .unwrap();

        let config = ConfigLoader::new()
            .load_file(file.path())
            .unwrap()
            .extract()
            .unwrap();

        assert_eq!(config.logging.level, LogLevel::Warn);
        assert_eq!(config.logging.format, LogFormat::Compact);
        assert_eq!(config.sweeper.interval, Duration::from_secs(12 * 3600));
        assert_eq!(config.sweeper.ttl, Duration::from_secs(475_200));
        assert!(!config.sweeper.send_reminders);
        assert_eq!(config.notifications.timeout_ms, 250);
        // Untouched sections keep their defaults
        assert_eq!(config.storage.surrealdb.engine, SurrealDBEngine::Memory);
    }

    #[test]
    fn test_load_missing_file() {
        let mut loader = ConfigLoader::new();
        assert!(loader.load_file("/definitely/not/here.toml").is_err());
    }

    #[test]
    fn test_load_unsupported_extension() {
        let file = tempfile::Builder::new().suffix(".ini").tempfile().unwrap();
        let mut loader = ConfigLoader::new();
        assert!(loader.load_file(file.path()).is_err());
    }

    #[test]
    fn test_config_serialization() {
        let config = ConfigBuilder::new()
            .with_data_dir("/tmp/test_data")
            .with_webhook("https://example.com/hook")
            .build()
            .unwrap();

        let json = serde_json::to_string(&config).unwrap();
        let deserialized: TutorlinkConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(config.storage.data_dir, deserialized.storage.data_dir);
        assert_eq!(config.sweeper, deserialized.sweeper);
        assert_eq!(config.notifications, deserialized.notifications);
    }
}
