//! Storage abstractions and implementations
//!
//! The engine talks to persistence through two repositories: [`UserStore`]
//! resolves identities, roles and subjects, and [`RelationshipStore`] holds the
//! pairing records. [`PairingStore`] bundles both for callers that need the two.
//!
//! ## Storage Implementations
//!
//! - **SurrealStore**: SurrealDB-backed store, usable with the in-memory
//!   engine or one of the embedded on-disk engines.

pub mod config;
pub mod errors;
pub mod filters;
pub mod surreal;
pub mod traits;

use std::sync::Arc;

use surrealdb::Surreal;

pub use config::{SurrealDBConfig, SurrealDBEngine};
pub use errors::{StorageError, StorageResult};
pub use filters::RelationshipFilter;
pub use surreal::SurrealStore;
pub use traits::{BaseStore, PairingStore, RelationshipStore, UserStore};

/// Store type for the embedded engines
pub type EmbeddedStore = SurrealStore<surrealdb::engine::local::Db>;

/// Create a store backend based on configuration
pub async fn create_store(
    config: &SurrealDBConfig,
) -> Result<Arc<dyn PairingStore>, StorageError> {
    config.validate()?;
    let store = create_embedded_store(config).await?;
    Ok(Arc::new(store))
}

/// Create a concrete embedded store based on configuration
pub async fn create_embedded_store(config: &SurrealDBConfig) -> Result<EmbeddedStore, StorageError> {
    match config.engine {
        SurrealDBEngine::Memory => {
            tracing::info!("Creating SurrealStore with in-memory engine");
            let client = Surreal::new::<surrealdb::engine::local::Mem>(())
                .await
                .map_err(|e| {
                    StorageError::Connection(format!("Failed to create memory client: {}", e))
                })?;
            SurrealStore::new(client, config).await
        }
        #[cfg(feature = "surrealdb-embedded")]
        SurrealDBEngine::SurrealKv => {
            tracing::info!(
                "Creating SurrealStore with SurrealKV engine at {}",
                config.connection
            );
            let client = Surreal::new::<surrealdb::engine::local::SurrealKv>(
                config.connection.as_str(),
            )
            .await
            .map_err(|e| {
                StorageError::Connection(format!("Failed to create SurrealKV client: {}", e))
            })?;
            SurrealStore::new(client, config).await
        }
        #[cfg(feature = "rocksdb")]
        SurrealDBEngine::RocksDB => {
            tracing::info!(
                "Creating SurrealStore with RocksDB engine at {}",
                config.connection
            );
            let client =
                Surreal::new::<surrealdb::engine::local::RocksDb>(config.connection.as_str())
                    .await
                    .map_err(|e| {
                        StorageError::Connection(format!(
                            "Failed to create RocksDB client: {}",
                            e
                        ))
                    })?;
            SurrealStore::new(client, config).await
        }
        #[allow(unreachable_patterns)]
        other => Err(StorageError::UnsupportedStorageType(format!(
            "{} engine is not enabled in this build",
            other.as_str()
        ))),
    }
}
