//! User and subject storage implementation

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use surrealdb::Connection;

use super::base::{SurrealStore, write_error};
use super::{SUBJECT_TABLE, USER_TABLE};
use crate::models::{CourseId, ProviderProfile, Role, Subject, SubjectId, User, UserId};
use crate::storage::errors::StorageError;
use crate::storage::traits::UserStore;

const ROLE_REQUESTER_ONLY: &str = "requester_only";
const ROLE_PROVIDER_ONLY: &str = "provider_only";
const ROLE_BOTH: &str = "both";

/// Internal representation of a user record for SurrealDB
///
/// The role is flattened so provider fields can be indexed directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct UserRecord {
    user_id: String,
    name: String,
    email: Option<String>,
    role_kind: String,
    offered_subjects: Option<Vec<String>>,
    capacity_limit: Option<u32>,
}

impl From<&User> for UserRecord {
    fn from(user: &User) -> Self {
        let (role_kind, profile) = match &user.role {
            Role::RequesterOnly => (ROLE_REQUESTER_ONLY, None),
            Role::ProviderOnly { profile } => (ROLE_PROVIDER_ONLY, Some(profile)),
            Role::Both { profile } => (ROLE_BOTH, Some(profile)),
        };

        Self {
            user_id: user.id.as_str().to_string(),
            name: user.name.clone(),
            email: user.email.clone(),
            role_kind: role_kind.to_string(),
            offered_subjects: profile.map(|p| {
                p.offered_subjects
                    .iter()
                    .map(|s| s.as_str().to_string())
                    .collect()
            }),
            capacity_limit: profile.map(|p| p.capacity_limit.get()),
        }
    }
}

impl TryFrom<UserRecord> for User {
    type Error = StorageError;

    fn try_from(record: UserRecord) -> Result<Self, Self::Error> {
        let profile = || -> Result<ProviderProfile, StorageError> {
            let limit = record
                .capacity_limit
                .and_then(NonZeroU32::new)
                .ok_or_else(|| {
                    StorageError::Validation(format!(
                        "Provider {} has no positive capacity limit",
                        record.user_id
                    ))
                })?;
            let subjects = record
                .offered_subjects
                .clone()
                .unwrap_or_default()
                .into_iter()
                .map(SubjectId::from);
            Ok(ProviderProfile::new(subjects, limit))
        };

        let role = match record.role_kind.as_str() {
            ROLE_REQUESTER_ONLY => Role::RequesterOnly,
            ROLE_PROVIDER_ONLY => Role::ProviderOnly { profile: profile()? },
            ROLE_BOTH => Role::Both { profile: profile()? },
            other => {
                return Err(StorageError::Validation(format!(
                    "Unknown role '{}' for user {}",
                    other, record.user_id
                )));
            }
        };

        Ok(User {
            id: UserId::from(record.user_id),
            name: record.name,
            email: record.email,
            role,
        })
    }
}

/// Internal representation of a subject record for SurrealDB
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SubjectRecord {
    subject_id: String,
    name: String,
    course_id: String,
}

impl From<&Subject> for SubjectRecord {
    fn from(subject: &Subject) -> Self {
        Self {
            subject_id: subject.id.as_str().to_string(),
            name: subject.name.clone(),
            course_id: subject.course_id.as_str().to_string(),
        }
    }
}

impl From<SubjectRecord> for Subject {
    fn from(record: SubjectRecord) -> Self {
        Subject::new(record.subject_id, record.name, CourseId::new(record.course_id))
    }
}

#[async_trait]
impl<C> UserStore for SurrealStore<C>
where
    C: Connection + Clone + Send + Sync + std::fmt::Debug + 'static,
{
    async fn create_user(&self, user: User) -> Result<User, StorageError> {
        if self.get_user(&user.id).await?.is_some() {
            return Err(StorageError::AlreadyExists(format!(
                "User with ID {} already exists",
                user.id
            )));
        }

        let created: Option<UserRecord> = self
            .client
            .create((USER_TABLE, user.id.as_str()))
            .content(UserRecord::from(&user))
            .await
            .map_err(|e| write_error("Failed to create user", e))?;

        created
            .ok_or_else(|| StorageError::Internal("No user created".to_string()))
            .and_then(User::try_from)
    }

    async fn get_user(&self, id: &UserId) -> Result<Option<User>, StorageError> {
        let record: Option<UserRecord> = self
            .client
            .select((USER_TABLE, id.as_str()))
            .await
            .map_err(|e| StorageError::Query(format!("Failed to get user: {}", e)))?;

        record.map(User::try_from).transpose()
    }

    async fn update_user(&self, user: User) -> Result<User, StorageError> {
        let updated: Option<UserRecord> = self
            .client
            .update((USER_TABLE, user.id.as_str()))
            .content(UserRecord::from(&user))
            .await
            .map_err(|e| StorageError::Query(format!("Failed to update user: {}", e)))?;

        updated
            .ok_or_else(|| StorageError::NotFound(format!("User with id {} not found", user.id)))
            .and_then(User::try_from)
    }

    async fn delete_user(&self, id: &UserId) -> Result<bool, StorageError> {
        let deleted: Option<UserRecord> = self
            .client
            .delete((USER_TABLE, id.as_str()))
            .await
            .map_err(|e| StorageError::Query(format!("Failed to delete user: {}", e)))?;

        Ok(deleted.is_some())
    }

    async fn list_users(
        &self,
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> Result<Vec<User>, StorageError> {
        let records: Vec<UserRecord> = self
            .client
            .select(USER_TABLE)
            .await
            .map_err(|e| StorageError::Query(format!("Failed to list users: {}", e)))?;

        let mut users = records
            .into_iter()
            .map(User::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        users.sort_by(|a, b| a.id.cmp(&b.id));

        Ok(users
            .into_iter()
            .skip(offset.unwrap_or(0))
            .take(limit.unwrap_or(usize::MAX))
            .collect())
    }

    async fn create_subject(&self, subject: Subject) -> Result<Subject, StorageError> {
        if self.get_subject(&subject.id).await?.is_some() {
            return Err(StorageError::AlreadyExists(format!(
                "Subject with ID {} already exists",
                subject.id
            )));
        }

        let created: Option<SubjectRecord> = self
            .client
            .create((SUBJECT_TABLE, subject.id.as_str()))
            .content(SubjectRecord::from(&subject))
            .await
            .map_err(|e| write_error("Failed to create subject", e))?;

        created
            .map(Subject::from)
            .ok_or_else(|| StorageError::Internal("No subject created".to_string()))
    }

    async fn get_subject(&self, id: &SubjectId) -> Result<Option<Subject>, StorageError> {
        let record: Option<SubjectRecord> = self
            .client
            .select((SUBJECT_TABLE, id.as_str()))
            .await
            .map_err(|e| StorageError::Query(format!("Failed to get subject: {}", e)))?;

        Ok(record.map(Subject::from))
    }

    async fn list_subjects(&self) -> Result<Vec<Subject>, StorageError> {
        let records: Vec<SubjectRecord> = self
            .client
            .select(SUBJECT_TABLE)
            .await
            .map_err(|e| StorageError::Query(format!("Failed to list subjects: {}", e)))?;

        let mut subjects: Vec<Subject> = records.into_iter().map(Subject::from).collect();
        subjects.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(subjects)
    }
}
