//! Bulk removal, including a store that fails on one record

mod common;

use async_trait::async_trait;
use common::{TestEngine, subjects};
use std::collections::BTreeSet;
use std::result::Result;
use std::sync::Arc;
use tutorlink::models::{Subject, SubjectId, Termination};
use tutorlink::prelude::*;
use tutorlink::storage::{BaseStore, RelationshipFilter, SurrealDBConfig, create_store};

/// Delegates to a real store but refuses to delete one relationship
#[derive(Debug)]
struct FaultyStore {
    inner: Arc<dyn PairingStore>,
    fail_on: RelationshipId,
}

#[async_trait]
impl BaseStore for FaultyStore {
    async fn health_check(&self) -> Result<bool, StorageError> {
        self.inner.health_check().await
    }

    async fn clear(&self) -> Result<(), StorageError> {
        self.inner.clear().await
    }

    async fn get_metadata(&self) -> Result<serde_json::Value, StorageError> {
        self.inner.get_metadata().await
    }

    async fn close(&self) -> Result<(), StorageError> {
        self.inner.close().await
    }
}

#[async_trait]
impl UserStore for FaultyStore {
    async fn create_user(&self, user: User) -> Result<User, StorageError> {
        self.inner.create_user(user).await
    }

    async fn get_user(&self, id: &UserId) -> Result<Option<User>, StorageError> {
        self.inner.get_user(id).await
    }

    async fn update_user(&self, user: User) -> Result<User, StorageError> {
        self.inner.update_user(user).await
    }

    async fn delete_user(&self, id: &UserId) -> Result<bool, StorageError> {
        self.inner.delete_user(id).await
    }

    async fn list_users(
        &self,
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> Result<Vec<User>, StorageError> {
        self.inner.list_users(limit, offset).await
    }

    async fn create_subject(&self, subject: Subject) -> Result<Subject, StorageError> {
        self.inner.create_subject(subject).await
    }

    async fn get_subject(&self, id: &SubjectId) -> Result<Option<Subject>, StorageError> {
        self.inner.get_subject(id).await
    }

    async fn list_subjects(&self) -> Result<Vec<Subject>, StorageError> {
        self.inner.list_subjects().await
    }
}

#[async_trait]
impl RelationshipStore for FaultyStore {
    async fn insert_relationship(
        &self,
        relationship: Relationship,
    ) -> Result<Relationship, StorageError> {
        self.inner.insert_relationship(relationship).await
    }

    async fn get_relationship(
        &self,
        id: &RelationshipId,
    ) -> Result<Option<Relationship>, StorageError> {
        self.inner.get_relationship(id).await
    }

    async fn update_relationship(
        &self,
        relationship: Relationship,
    ) -> Result<Relationship, StorageError> {
        self.inner.update_relationship(relationship).await
    }

    async fn delete_relationship(
        &self,
        id: &RelationshipId,
        cause: Termination,
    ) -> Result<bool, StorageError> {
        if id == &self.fail_on {
            return Err(StorageError::Connection("injected failure".to_string()));
        }
        self.inner.delete_relationship(id, cause).await
    }

    async fn list_relationships(
        &self,
        filter: Option<RelationshipFilter>,
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> Result<Vec<Relationship>, StorageError> {
        self.inner.list_relationships(filter, limit, offset).await
    }

    async fn count_relationships(
        &self,
        filter: Option<RelationshipFilter>,
    ) -> Result<usize, StorageError> {
        self.inner.count_relationships(filter).await
    }
}

/// Three requesters paired with one provider; the first is accepted
async fn seed(t: &TestEngine) -> (UserId, Vec<RelationshipId>) {
    let tutor = t.add_provider("tutor", &["math", "physics"], 3).await;
    let mut ids = Vec::new();
    for name in ["student-a", "student-b", "student-c"] {
        let student = t.add_requester(name).await;
        t.service()
            .request_relationship(&student, &tutor, subjects(&["math"]))
            .await
            .unwrap();
        ids.push(RelationshipId::for_pair(&student, &tutor));
    }
    t.service().accept_relationship(&ids[0]).await.unwrap();
    t.settle().await;
    t.notifier.clear();
    (tutor, ids)
}

#[tokio::test]
async fn test_remove_all_relationships() {
    let t = TestEngine::new().await;
    let (tutor, _) = seed(&t).await;

    let removed = t
        .service()
        .remove_all_relationships(&tutor, "leaving the programme")
        .await
        .expect("bulk removal failed");
    assert_eq!(removed, 3);
    assert_eq!(t.relationship_count().await, 0);

    t.settle().await;
    let notifications = t.notifier.of_kind(NotificationKind::Removed);
    assert_eq!(notifications.len(), 3);
    assert!(
        notifications
            .iter()
            .all(|n| n.reason() == Some("leaving the programme"))
    );
    let recipients: BTreeSet<String> = notifications
        .iter()
        .map(|n| n.recipients[0].user_id.to_string())
        .collect();
    assert_eq!(recipients.len(), 3);
}

#[tokio::test]
async fn test_remove_all_reports_partial_failure() {
    let inner = create_store(&SurrealDBConfig::memory()).await.unwrap();
    let fail_on = RelationshipId::for_pair(&UserId::from("student-b"), &UserId::from("tutor"));
    let store = Arc::new(FaultyStore {
        inner,
        fail_on,
    });
    let t = TestEngine::with_store(store).await;
    let (tutor, ids) = seed(&t).await;

    let err = t
        .service()
        .remove_all_relationships(&tutor, "leaving")
        .await
        .unwrap_err();

    match err {
        TutorlinkError::PartialFailure { removed, failures } => {
            assert_eq!(removed, 2);
            assert_eq!(failures.len(), 1);
            assert_eq!(failures[0].relationship_id, ids[1]);
            assert!(failures[0].cause.contains("injected failure"));
        }
        other => panic!("expected partial failure, got {other:?}"),
    }

    // The two successful removals stay committed
    assert_eq!(t.relationship_count().await, 1);
    assert!(t.engine.store().get_relationship(&ids[1]).await.unwrap().is_some());

    t.settle().await;
    assert_eq!(t.notifier.of_kind(NotificationKind::Removed).len(), 2);
}

#[tokio::test]
async fn test_remove_all_argument_checks() {
    let t = TestEngine::new().await;
    let (tutor, _) = seed(&t).await;

    let err = t
        .service()
        .remove_all_relationships(&tutor, " ")
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::MissingArguments);

    let err = t
        .service()
        .remove_all_relationships(&UserId::from("nobody"), "reason")
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::NotFound);

    assert_eq!(t.relationship_count().await, 3);
}
