//! Schema initialization and management for SurrealStore

use crate::storage::errors::StorageError;
use surrealdb::{Connection, Surreal};

/// Initialize the tables and indexes used by the store.
///
/// Safe to run against a database that already has the schema.
pub async fn initialize_schema<C>(client: &Surreal<C>) -> Result<(), StorageError>
where
    C: Connection,
{
    let user_table_query = r#"
        DEFINE TABLE IF NOT EXISTS user SCHEMALESS
        COMMENT "User accounts with their role capabilities";

        DEFINE INDEX IF NOT EXISTS user_user_id_idx ON user FIELDS user_id UNIQUE;
        DEFINE INDEX IF NOT EXISTS user_role_idx ON user FIELDS role_kind;
    "#;

    let subject_table_query = r#"
        DEFINE TABLE IF NOT EXISTS subject SCHEMALESS
        COMMENT "Subjects a provider can offer";

        DEFINE INDEX IF NOT EXISTS subject_subject_id_idx ON subject FIELDS subject_id UNIQUE;
        DEFINE INDEX IF NOT EXISTS subject_course_idx ON subject FIELDS course_id;
    "#;

    let relationship_table_query = r#"
        DEFINE TABLE IF NOT EXISTS relationship SCHEMALESS
        COMMENT "Pairings between requesters and providers";

        DEFINE INDEX IF NOT EXISTS relationship_pair_idx ON relationship
            FIELDS requester_id, provider_id UNIQUE;
        DEFINE INDEX IF NOT EXISTS relationship_provider_status_idx ON relationship
            FIELDS provider_id, status;
        DEFINE INDEX IF NOT EXISTS relationship_requester_idx ON relationship FIELDS requester_id;
        DEFINE INDEX IF NOT EXISTS relationship_status_idx ON relationship FIELDS status;
    "#;

    execute_schema_query(client, user_table_query, "user table").await?;
    execute_schema_query(client, subject_table_query, "subject table").await?;
    execute_schema_query(client, relationship_table_query, "relationship table").await?;

    tracing::info!("SurrealStore schema initialized successfully");
    Ok(())
}

/// Execute a schema query and handle errors
async fn execute_schema_query<C>(
    client: &Surreal<C>,
    query: &str,
    description: &str,
) -> Result<(), StorageError>
where
    C: Connection,
{
    client
        .query(query)
        .await
        .and_then(|response| response.check())
        .map_err(|e| StorageError::Query(format!("Failed to create {}: {}", description, e)))?;

    tracing::debug!("Created {} successfully", description);
    Ok(())
}
