//! Trait definitions for storage components in Tutorlink

use async_trait::async_trait;
use std::collections::BTreeSet;
use std::fmt::Debug;

use crate::models::{
    Relationship, RelationshipId, RelationshipStatus, Subject, SubjectId, Termination, User,
    UserId,
};
use crate::storage::errors::StorageError;
use crate::storage::filters::RelationshipFilter;

/// Base trait for all storage implementations
#[async_trait]
pub trait BaseStore: Send + Sync + 'static + Debug {
    /// Check if the store is healthy and available
    async fn health_check(&self) -> std::result::Result<bool, StorageError>;

    /// Clear all data in the store
    async fn clear(&self) -> std::result::Result<(), StorageError>;

    /// Get metadata about the store
    async fn get_metadata(&self) -> std::result::Result<serde_json::Value, StorageError>;

    /// Close connections and release resources
    async fn close(&self) -> std::result::Result<(), StorageError>;
}

/// Identity and role lookup, plus subject reference data
#[async_trait]
pub trait UserStore: BaseStore {
    /// Create a new user. Fails with `AlreadyExists` if the id is taken.
    async fn create_user(&self, user: User) -> std::result::Result<User, StorageError>;

    /// Resolve a user id to its account, if any
    async fn get_user(&self, id: &UserId) -> std::result::Result<Option<User>, StorageError>;

    /// Replace an existing user
    async fn update_user(&self, user: User) -> std::result::Result<User, StorageError>;

    /// Delete a user by id
    async fn delete_user(&self, id: &UserId) -> std::result::Result<bool, StorageError>;

    /// List users ordered by id
    async fn list_users(
        &self,
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> std::result::Result<Vec<User>, StorageError>;

    /// Subjects offered by a provider. `None` when the user is unknown or
    /// lacks the provider capability.
    async fn offered_subjects(
        &self,
        provider_id: &UserId,
    ) -> std::result::Result<Option<BTreeSet<SubjectId>>, StorageError> {
        Ok(self
            .get_user(provider_id)
            .await?
            .and_then(|user| user.provider_profile().map(|p| p.offered_subjects.clone())))
    }

    /// Create a subject. Fails with `AlreadyExists` if the id is taken.
    async fn create_subject(&self, subject: Subject) -> std::result::Result<Subject, StorageError>;

    /// Get a subject by id
    async fn get_subject(&self, id: &SubjectId)
    -> std::result::Result<Option<Subject>, StorageError>;

    /// List all subjects ordered by id
    async fn list_subjects(&self) -> std::result::Result<Vec<Subject>, StorageError>;
}

/// Relationship repository.
///
/// Plain CRUD keyed by the (requester, provider) pair. No business rules live
/// here; callers are expected to hold the provider lock around mutations.
#[async_trait]
pub trait RelationshipStore: BaseStore {
    /// Insert a new relationship. Fails with `AlreadyExists` if the pair
    /// already has a record.
    async fn insert_relationship(
        &self,
        relationship: Relationship,
    ) -> std::result::Result<Relationship, StorageError>;

    /// Get a relationship by its id
    async fn get_relationship(
        &self,
        id: &RelationshipId,
    ) -> std::result::Result<Option<Relationship>, StorageError>;

    /// Get the relationship for an ordered (requester, provider) pair
    async fn get_relationship_by_pair(
        &self,
        requester_id: &UserId,
        provider_id: &UserId,
    ) -> std::result::Result<Option<Relationship>, StorageError> {
        self.get_relationship(&RelationshipId::for_pair(requester_id, provider_id))
            .await
    }

    /// Replace the status and subjects of an existing relationship
    async fn update_relationship(
        &self,
        relationship: Relationship,
    ) -> std::result::Result<Relationship, StorageError>;

    /// Delete a relationship. `cause` records why the pairing ended; the
    /// record itself is not retained.
    async fn delete_relationship(
        &self,
        id: &RelationshipId,
        cause: Termination,
    ) -> std::result::Result<bool, StorageError>;

    /// List relationships with optional filtering, ordered by creation time
    async fn list_relationships(
        &self,
        filter: Option<RelationshipFilter>,
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> std::result::Result<Vec<Relationship>, StorageError>;

    /// Count relationships with optional filtering
    async fn count_relationships(
        &self,
        filter: Option<RelationshipFilter>,
    ) -> std::result::Result<usize, StorageError>;

    /// Number of accepted relationships held by a provider
    async fn count_accepted(&self, provider_id: &UserId) -> std::result::Result<usize, StorageError> {
        self.count_relationships(Some(
            RelationshipFilter::for_provider(provider_id.clone())
                .with_status(RelationshipStatus::Accepted),
        ))
        .await
    }
}

/// Combined store used by the relationship service and the expiry sweeper
pub trait PairingStore: UserStore + RelationshipStore {}

impl<T> PairingStore for T where T: UserStore + RelationshipStore {}
