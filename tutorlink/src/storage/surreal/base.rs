//! Base SurrealStore implementation

use async_trait::async_trait;
use surrealdb::{Connection, Surreal};

use super::{RELATIONSHIP_TABLE, SUBJECT_TABLE, USER_TABLE};
use crate::storage::config::{SurrealDBConfig, SurrealDBEngine};
use crate::storage::errors::StorageError;
use crate::storage::traits::BaseStore;

/// SurrealDB-backed user and relationship store
#[derive(Debug, Clone)]
pub struct SurrealStore<C>
where
    C: Connection + Clone + Send + Sync + std::fmt::Debug + 'static,
{
    pub(crate) client: Surreal<C>,
    pub(crate) namespace: String,
    pub(crate) database: String,
    pub(crate) engine: SurrealDBEngine,
}

impl<C> SurrealStore<C>
where
    C: Connection + Clone + Send + Sync + std::fmt::Debug + 'static,
{
    /// Create a new store on an existing client and initialize the schema
    pub async fn new(client: Surreal<C>, config: &SurrealDBConfig) -> Result<Self, StorageError> {
        client
            .use_ns(&config.namespace)
            .use_db(&config.database)
            .await
            .map_err(|e| {
                StorageError::Connection(format!("Failed to set namespace/database: {}", e))
            })?;

        let store = Self {
            client,
            namespace: config.namespace.clone(),
            database: config.database.clone(),
            engine: config.engine,
        };

        store.initialize_schema().await?;

        Ok(store)
    }

    async fn initialize_schema(&self) -> Result<(), StorageError> {
        super::schema::initialize_schema(&self.client).await
    }

    /// Get the underlying client for advanced operations
    pub fn client(&self) -> &Surreal<C> {
        &self.client
    }
}

/// Map a failed write, recognizing unique-key violations
pub(crate) fn write_error(context: &str, err: surrealdb::Error) -> StorageError {
    let message = err.to_string();
    if message.contains("already exists") || message.contains("already contains") {
        StorageError::AlreadyExists(format!("{}: {}", context, message))
    } else {
        StorageError::Query(format!("{}: {}", context, message))
    }
}

#[async_trait]
impl<C> BaseStore for SurrealStore<C>
where
    C: Connection + Clone + Send + Sync + std::fmt::Debug + 'static,
{
    async fn health_check(&self) -> Result<bool, StorageError> {
        let _result = self
            .client
            .query("INFO FOR DB")
            .await
            .map_err(|e| StorageError::Connection(format!("Health check failed: {}", e)))?;

        Ok(true)
    }

    async fn clear(&self) -> Result<(), StorageError> {
        for table in [RELATIONSHIP_TABLE, SUBJECT_TABLE, USER_TABLE] {
            self.client
                .query(format!("DELETE FROM {}", table))
                .await
                .map_err(|e| StorageError::Query(format!("Failed to clear table: {}", e)))?;
        }

        Ok(())
    }

    async fn get_metadata(&self) -> Result<serde_json::Value, StorageError> {
        Ok(serde_json::json!({
            "type": "surreal_store",
            "namespace": self.namespace,
            "database": self.database,
            "engine": self.engine.as_str(),
        }))
    }

    async fn close(&self) -> Result<(), StorageError> {
        // SurrealDB connections are closed when dropped
        Ok(())
    }
}
