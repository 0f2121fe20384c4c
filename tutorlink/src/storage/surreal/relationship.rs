//! Relationship storage implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::{Connection, RecordId};

use super::RELATIONSHIP_TABLE;
use super::base::{SurrealStore, write_error};
use crate::models::{
    Relationship, RelationshipId, RelationshipStatus, SubjectId, Termination, UserId,
};
use crate::storage::errors::StorageError;
use crate::storage::filters::RelationshipFilter;
use crate::storage::traits::RelationshipStore;

/// Internal representation of a relationship record for SurrealDB
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RelationshipRecord {
    relationship_id: String,
    requester_id: String,
    provider_id: String,
    status: String,
    subjects: Vec<String>,
    created_on: DateTime<Utc>,
}

impl From<&Relationship> for RelationshipRecord {
    fn from(relationship: &Relationship) -> Self {
        Self {
            relationship_id: relationship.id.to_string(),
            requester_id: relationship.requester_id.as_str().to_string(),
            provider_id: relationship.provider_id.as_str().to_string(),
            status: relationship.status.as_str().to_string(),
            subjects: relationship
                .subjects
                .iter()
                .map(|s| s.as_str().to_string())
                .collect(),
            created_on: relationship.created_on,
        }
    }
}

impl TryFrom<RelationshipRecord> for Relationship {
    type Error = StorageError;

    fn try_from(record: RelationshipRecord) -> Result<Self, Self::Error> {
        let id: RelationshipId = record.relationship_id.parse().map_err(|e| {
            StorageError::Validation(format!(
                "Invalid relationship id '{}': {}",
                record.relationship_id, e
            ))
        })?;
        let status: RelationshipStatus =
            record.status.parse().map_err(StorageError::Validation)?;

        Ok(Relationship {
            id,
            requester_id: UserId::from(record.requester_id),
            provider_id: UserId::from(record.provider_id),
            status,
            subjects: record.subjects.into_iter().map(SubjectId::from).collect(),
            created_on: record.created_on,
        })
    }
}

fn record_key(id: &RelationshipId) -> String {
    id.to_string()
}

#[async_trait]
impl<C> RelationshipStore for SurrealStore<C>
where
    C: Connection + Clone + Send + Sync + std::fmt::Debug + 'static,
{
    async fn insert_relationship(
        &self,
        relationship: Relationship,
    ) -> Result<Relationship, StorageError> {
        if self.get_relationship(&relationship.id).await?.is_some() {
            return Err(StorageError::AlreadyExists(format!(
                "Relationship between {} and {} already exists",
                relationship.requester_id, relationship.provider_id
            )));
        }

        let key = record_key(&relationship.id);
        let created: Option<RelationshipRecord> = self
            .client
            .create((RELATIONSHIP_TABLE, key.as_str()))
            .content(RelationshipRecord::from(&relationship))
            .await
            .map_err(|e| write_error("Failed to create relationship", e))?;

        created
            .ok_or_else(|| StorageError::Internal("No relationship created".to_string()))
            .and_then(Relationship::try_from)
    }

    async fn get_relationship(
        &self,
        id: &RelationshipId,
    ) -> Result<Option<Relationship>, StorageError> {
        let key = record_key(id);
        let record: Option<RelationshipRecord> = self
            .client
            .select((RELATIONSHIP_TABLE, key.as_str()))
            .await
            .map_err(|e| StorageError::Query(format!("Failed to get relationship: {}", e)))?;

        record.map(Relationship::try_from).transpose()
    }

    async fn update_relationship(
        &self,
        relationship: Relationship,
    ) -> Result<Relationship, StorageError> {
        // MERGE keeps the pair and created_on untouched
        let merge_query = r#"
            UPDATE $record_id MERGE {
                status: $status,
                subjects: $subjects
            }
        "#;

        let record = RelationshipRecord::from(&relationship);
        let mut response = self
            .client
            .query(merge_query)
            .bind((
                "record_id",
                RecordId::from((RELATIONSHIP_TABLE, record.relationship_id.as_str())),
            ))
            .bind(("status", record.status))
            .bind(("subjects", record.subjects))
            .await
            .map_err(|e| StorageError::Query(format!("Failed to update relationship: {}", e)))?;

        let updated: Option<RelationshipRecord> = response.take(0).map_err(|e| {
            StorageError::Query(format!("Failed to extract updated relationship: {}", e))
        })?;

        updated
            .ok_or_else(|| {
                StorageError::NotFound(format!(
                    "Relationship with id {} not found",
                    relationship.id
                ))
            })
            .and_then(Relationship::try_from)
    }

    async fn delete_relationship(
        &self,
        id: &RelationshipId,
        cause: Termination,
    ) -> Result<bool, StorageError> {
        let key = record_key(id);
        let deleted: Option<RelationshipRecord> = self
            .client
            .delete((RELATIONSHIP_TABLE, key.as_str()))
            .await
            .map_err(|e| StorageError::Query(format!("Failed to delete relationship: {}", e)))?;

        tracing::debug!(
            relationship_id = %id,
            cause = %cause,
            deleted = deleted.is_some(),
            "Deleted relationship record"
        );

        Ok(deleted.is_some())
    }

    async fn list_relationships(
        &self,
        filter: Option<RelationshipFilter>,
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> Result<Vec<Relationship>, StorageError> {
        let filter = filter.unwrap_or_default();

        let mut query = format!("SELECT * FROM {}", RELATIONSHIP_TABLE);
        let mut conditions = Vec::new();
        if filter.requester_id.is_some() {
            conditions.push("requester_id = $requester_id");
        }
        if filter.provider_id.is_some() {
            conditions.push("provider_id = $provider_id");
        }
        if filter.status.is_some() {
            conditions.push("status = $status");
        }
        if !conditions.is_empty() {
            query.push_str(&format!(" WHERE {}", conditions.join(" AND ")));
        }

        let mut query_builder = self.client.query(&query);
        if let Some(requester_id) = &filter.requester_id {
            query_builder = query_builder.bind(("requester_id", requester_id.as_str().to_string()));
        }
        if let Some(provider_id) = &filter.provider_id {
            query_builder = query_builder.bind(("provider_id", provider_id.as_str().to_string()));
        }
        if let Some(status) = filter.status {
            query_builder = query_builder.bind(("status", status.as_str()));
        }

        let mut response = query_builder
            .await
            .map_err(|e| StorageError::Query(format!("Failed to list relationships: {}", e)))?;

        let records: Vec<RelationshipRecord> = response
            .take(0)
            .map_err(|e| StorageError::Query(format!("Failed to extract relationships: {}", e)))?;

        let mut relationships = records
            .into_iter()
            .map(Relationship::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        // Timestamps are stored as strings, so ordering and the cutoff happen here
        if let Some(cutoff) = filter.created_before {
            relationships.retain(|r| r.created_on < cutoff);
        }
        relationships.sort_by(|a, b| a.created_on.cmp(&b.created_on).then(a.id.cmp(&b.id)));

        Ok(relationships
            .into_iter()
            .skip(offset.unwrap_or(0))
            .take(limit.unwrap_or(usize::MAX))
            .collect())
    }

    async fn count_relationships(
        &self,
        filter: Option<RelationshipFilter>,
    ) -> Result<usize, StorageError> {
        let relationships = self.list_relationships(filter, None, None).await?;
        Ok(relationships.len())
    }
}
