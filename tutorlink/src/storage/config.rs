//! Configuration structures for storage backends

use crate::storage::errors::StorageError;
use serde::{Deserialize, Serialize};

/// SurrealDB engine types
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SurrealDBEngine {
    /// In-memory storage (for testing)
    Memory,
    /// SurrealKV on-disk storage (embedded, pure Rust)
    SurrealKv,
    /// RocksDB on-disk storage (embedded)
    RocksDB,
}

impl SurrealDBEngine {
    pub fn as_str(&self) -> &'static str {
        match self {
            SurrealDBEngine::Memory => "memory",
            SurrealDBEngine::SurrealKv => "surrealkv",
            SurrealDBEngine::RocksDB => "rocksdb",
        }
    }

    /// Whether this engine keeps data on disk
    pub fn is_persistent(&self) -> bool {
        !matches!(self, SurrealDBEngine::Memory)
    }
}

/// SurrealDB configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SurrealDBConfig {
    /// SurrealDB engine type
    pub engine: SurrealDBEngine,

    /// Path of the data directory for on-disk engines. Ignored for memory.
    pub connection: String,

    /// Namespace
    pub namespace: String,

    /// Database name
    pub database: String,
}

impl Default for SurrealDBConfig {
    fn default() -> Self {
        Self {
            engine: SurrealDBEngine::Memory,
            connection: "memory".to_string(),
            namespace: "tutorlink".to_string(),
            database: "main".to_string(),
        }
    }
}

impl SurrealDBConfig {
    /// In-memory configuration, mostly for tests
    pub fn memory() -> Self {
        Self::default()
    }

    /// Validate the storage configuration
    pub fn validate(&self) -> Result<(), StorageError> {
        if self.engine.is_persistent() && self.connection.trim().is_empty() {
            return Err(StorageError::Configuration(format!(
                "{} engine requires a data directory",
                self.engine.as_str()
            )));
        }
        if self.namespace.is_empty() {
            return Err(StorageError::Configuration(
                "SurrealDB namespace cannot be empty".to_string(),
            ));
        }
        if self.database.is_empty() {
            return Err(StorageError::Configuration(
                "SurrealDB database cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}
