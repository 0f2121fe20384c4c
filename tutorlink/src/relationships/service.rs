//! Relationship Service: input validation, lifecycle rules and notifications

use super::capacity::CapacityGuard;
use super::validation::{self, RelationshipRequestInput};
use super::{RemovalFailure, RequestOutcome};
use crate::models::{
    Counterpart, Relationship, RelationshipId, RelationshipStatus, RelationshipSummary, SubjectId,
    Termination, User, UserId,
};
use crate::notifications::{Notification, NotificationDispatcher, NotificationKind, Recipient};
use crate::storage::{PairingStore, RelationshipFilter};
use crate::{Result, TutorlinkError};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Orchestrates every relationship transition.
///
/// Each mutation resolves the relationship's provider, takes that provider's
/// lock from the [`CapacityGuard`], re-reads the record under the lock and
/// only then writes. Notifications are dispatched after the write has
/// committed and the lock has been released.
#[derive(Debug, Clone)]
pub struct RelationshipService {
    store: Arc<dyn PairingStore>,
    guard: Arc<CapacityGuard>,
    dispatcher: NotificationDispatcher,
}

#[derive(Debug, Clone, Copy)]
enum Side {
    Requester,
    Provider,
}

impl RelationshipService {
    pub fn new(
        store: Arc<dyn PairingStore>,
        guard: Arc<CapacityGuard>,
        dispatcher: NotificationDispatcher,
    ) -> Self {
        Self {
            store,
            guard,
            dispatcher,
        }
    }

    pub fn store(&self) -> &Arc<dyn PairingStore> {
        &self.store
    }

    pub fn guard(&self) -> &Arc<CapacityGuard> {
        &self.guard
    }

    pub fn dispatcher(&self) -> &NotificationDispatcher {
        &self.dispatcher
    }

    /// Ask `provider_id` for a relationship covering `subject_ids`.
    ///
    /// Creates a pending relationship, or replaces the subject set of the
    /// existing one for the pair. Repeating the identical request fails with
    /// `DuplicateRequest`.
    ///
    /// The capacity check runs before the existing pair is looked up, so at a
    /// full provider a subject change or an identical repeat of an accepted
    /// relationship fails with `CapacityExceeded` rather than being applied or
    /// reported as `DuplicateRequest`.
    #[tracing::instrument(
        skip(self, subject_ids),
        fields(requester_id = %requester_id, provider_id = %provider_id)
    )]
    pub async fn request_relationship(
        &self,
        requester_id: &UserId,
        provider_id: &UserId,
        subject_ids: impl IntoIterator<Item = SubjectId>,
    ) -> Result<RequestOutcome> {
        let subjects = validation::validate_request(requester_id, provider_id, subject_ids)?;
        let lock = self.guard.lock(provider_id).await;

        let requester = self.require_user(requester_id).await?;
        let provider = self.require_user(provider_id).await?;
        let profile = provider
            .provider_profile()
            .ok_or_else(|| TutorlinkError::RoleMismatch(provider_id.clone()))?;

        if let Some(subject) = profile.first_unoffered(&subjects) {
            return Err(TutorlinkError::SubjectNotOffered {
                subject: subject.clone(),
                provider_id: provider_id.clone(),
            });
        }

        let limit = profile.capacity_limit.get();
        if !CapacityGuard::can_accept(self.store.as_ref(), &lock, limit).await? {
            return Err(TutorlinkError::CapacityExceeded {
                provider_id: provider_id.clone(),
                limit,
            });
        }

        let existing = self
            .store
            .get_relationship_by_pair(requester_id, provider_id)
            .await?;
        let (outcome, relationship) = match existing {
            Some(existing) if existing.subjects == subjects => {
                return Err(TutorlinkError::DuplicateRequest(existing.id));
            }
            Some(mut existing) => {
                existing.subjects = subjects;
                let updated = self.store.update_relationship(existing).await?;
                (RequestOutcome::SubjectsUpdated, updated)
            }
            None => {
                let pending =
                    Relationship::pending(requester_id.clone(), provider_id.clone(), subjects);
                let created = self.store.insert_relationship(pending).await?;
                (RequestOutcome::Created, created)
            }
        };
        drop(lock);

        info!(relationship_id = %relationship.id, ?outcome, "Relationship requested");

        let kind = match outcome {
            RequestOutcome::Created => NotificationKind::NewRequest,
            RequestOutcome::SubjectsUpdated => NotificationKind::SubjectsChanged,
        };
        self.dispatcher.dispatch(
            Notification::new(kind, relationship.id, vec![Recipient::from(&provider)])
                .with_field("requester", Recipient::from(&requester))
                .with_field("subjects", &relationship.subjects),
        );

        Ok(outcome)
    }

    /// Validate a boundary-level request and submit it
    pub async fn submit_request(&self, input: RelationshipRequestInput) -> Result<RequestOutcome> {
        let request = input.validate()?;
        self.request_relationship(&request.requester_id, &request.provider_id, request.subjects)
            .await
    }

    /// Move a pending relationship to accepted, re-checking the provider's capacity
    #[tracing::instrument(skip(self), fields(relationship_id = %relationship_id))]
    pub async fn accept_relationship(&self, relationship_id: &RelationshipId) -> Result<()> {
        let provider_id = match self.store.get_relationship(relationship_id).await? {
            Some(relationship) if relationship.is_pending() => relationship.provider_id,
            _ => return Err(relationship_not_found(relationship_id)),
        };
        let lock = self.guard.lock(&provider_id).await;

        let mut relationship = match self.store.get_relationship(relationship_id).await? {
            Some(relationship) if relationship.is_pending() => relationship,
            _ => return Err(relationship_not_found(relationship_id)),
        };

        // A provider that lost the provider capability has no room at all
        let provider = self.store.get_user(&provider_id).await?;
        let limit = provider
            .as_ref()
            .and_then(User::provider_profile)
            .map_or(0, |profile| profile.capacity_limit.get());

        if !CapacityGuard::can_accept(self.store.as_ref(), &lock, limit).await? {
            return Err(TutorlinkError::CapacityExceeded { provider_id, limit });
        }

        relationship.status = RelationshipStatus::Accepted;
        let relationship = self.store.update_relationship(relationship).await?;
        drop(lock);

        info!(provider_id = %relationship.provider_id, "Relationship accepted");

        let requester = recipient_for(self.store.as_ref(), &relationship.requester_id).await;
        let provider = provider
            .as_ref()
            .map_or_else(|| Recipient::id_only(&provider_id), Recipient::from);
        self.dispatcher.dispatch(
            Notification::new(NotificationKind::Accepted, relationship.id, vec![requester])
                .with_field("provider", provider)
                .with_field("subjects", &relationship.subjects),
        );

        Ok(())
    }

    /// Provider declines a pending or accepted relationship
    #[tracing::instrument(skip(self, reason), fields(relationship_id = %relationship_id))]
    pub async fn reject_relationship(
        &self,
        relationship_id: &RelationshipId,
        reason: &str,
    ) -> Result<()> {
        let reason = validation::validate_reason(reason)?;
        let ended = self.terminate(relationship_id, Termination::Rejected).await?;

        info!("Relationship rejected");
        self.notify_requester(NotificationKind::Rejected, &ended, Some(reason))
            .await;
        Ok(())
    }

    /// Requester cancels a pending or accepted relationship
    #[tracing::instrument(skip(self), fields(relationship_id = %relationship_id))]
    pub async fn withdraw_relationship(&self, relationship_id: &RelationshipId) -> Result<()> {
        let ended = self
            .terminate(relationship_id, Termination::Withdrawn)
            .await?;

        info!("Relationship withdrawn");
        let provider = recipient_for(self.store.as_ref(), &ended.provider_id).await;
        let requester = recipient_for(self.store.as_ref(), &ended.requester_id).await;
        self.dispatcher.dispatch(
            Notification::new(NotificationKind::Withdrawn, ended.id, vec![provider])
                .with_field("requester", requester),
        );
        Ok(())
    }

    /// Provider ends a relationship
    #[tracing::instrument(skip(self, reason), fields(relationship_id = %relationship_id))]
    pub async fn remove_relationship(
        &self,
        relationship_id: &RelationshipId,
        reason: &str,
    ) -> Result<()> {
        let reason = validation::validate_reason(reason)?;
        let ended = self.terminate(relationship_id, Termination::Removed).await?;

        info!("Relationship removed");
        self.notify_requester(NotificationKind::Removed, &ended, Some(reason))
            .await;
        Ok(())
    }

    /// Remove every relationship of a provider.
    ///
    /// Each record is removed on its own under the provider lock. Records that
    /// fail stay in place and are reported through `PartialFailure`; the ones
    /// already removed are not restored. Returns the number removed.
    #[tracing::instrument(skip(self, reason), fields(provider_id = %provider_id))]
    pub async fn remove_all_relationships(
        &self,
        provider_id: &UserId,
        reason: &str,
    ) -> Result<usize> {
        validation::require_user_id(provider_id, "provider_id")?;
        let reason = validation::validate_reason(reason)?;
        self.require_user(provider_id).await?;

        let relationships = self
            .store
            .list_relationships(
                Some(RelationshipFilter::for_provider(provider_id.clone())),
                None,
                None,
            )
            .await?;

        let mut removed = 0;
        let mut failures = Vec::new();
        for relationship in relationships {
            match self.terminate(&relationship.id, Termination::Removed).await {
                Ok(ended) => {
                    removed += 1;
                    self.notify_requester(NotificationKind::Removed, &ended, Some(reason))
                        .await;
                }
                Err(TutorlinkError::NotFound(_)) => {
                    debug!(relationship_id = %relationship.id, "Relationship already gone");
                }
                Err(e) => {
                    warn!(relationship_id = %relationship.id, error = %e, "Failed to remove relationship");
                    failures.push(RemovalFailure {
                        relationship_id: relationship.id,
                        cause: e.to_string(),
                    });
                }
            }
        }

        if failures.is_empty() {
            info!(removed, "Removed all relationships");
            Ok(removed)
        } else {
            warn!(removed, failed = failures.len(), "Bulk removal partially failed");
            Err(TutorlinkError::PartialFailure { removed, failures })
        }
    }

    /// Relationships in which `user_id` is the requester
    pub async fn list_for_requester(&self, user_id: &UserId) -> Result<Vec<RelationshipSummary>> {
        self.list_for(user_id, Side::Requester).await
    }

    /// Relationships in which `user_id` is the provider
    pub async fn list_for_provider(&self, user_id: &UserId) -> Result<Vec<RelationshipSummary>> {
        self.list_for(user_id, Side::Provider).await
    }

    /// Fetch one relationship
    pub async fn get_relationship(&self, relationship_id: &RelationshipId) -> Result<Relationship> {
        self.store
            .get_relationship(relationship_id)
            .await?
            .ok_or_else(|| relationship_not_found(relationship_id))
    }

    async fn list_for(&self, user_id: &UserId, side: Side) -> Result<Vec<RelationshipSummary>> {
        validation::require_user_id(user_id, "user_id")?;
        self.require_user(user_id).await?;

        let filter = match side {
            Side::Requester => RelationshipFilter::for_requester(user_id.clone()),
            Side::Provider => RelationshipFilter::for_provider(user_id.clone()),
        };
        let relationships = self.store.list_relationships(Some(filter), None, None).await?;

        let mut counterparts: HashMap<UserId, Option<Counterpart>> = HashMap::new();
        let mut summaries = Vec::with_capacity(relationships.len());

        for relationship in relationships {
            let other_id = match side {
                Side::Requester => &relationship.provider_id,
                Side::Provider => &relationship.requester_id,
            };

            let counterpart = match counterparts.get(other_id) {
                Some(cached) => cached.clone(),
                None => {
                    let resolved = self
                        .store
                        .get_user(other_id)
                        .await?
                        .map(|user| Counterpart::from(&user));
                    counterparts.insert(other_id.clone(), resolved.clone());
                    resolved
                }
            };

            let Some(counterpart) = counterpart else {
                warn!(
                    relationship_id = %relationship.id,
                    counterpart_id = %other_id,
                    "Skipping relationship with unknown counterpart"
                );
                continue;
            };

            summaries.push(RelationshipSummary {
                id: relationship.id,
                status: relationship.status,
                counterpart,
                subjects: relationship.subjects.into_iter().collect(),
                created_on: relationship.created_on,
            });
        }

        summaries.sort_by(|a, b| {
            a.created_on
                .cmp(&b.created_on)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(summaries)
    }

    /// Delete a relationship under its provider's lock and return the record
    async fn terminate(
        &self,
        relationship_id: &RelationshipId,
        cause: Termination,
    ) -> Result<Relationship> {
        let provider_id = self
            .store
            .get_relationship(relationship_id)
            .await?
            .ok_or_else(|| relationship_not_found(relationship_id))?
            .provider_id;
        let _lock = self.guard.lock(&provider_id).await;

        let current = self
            .store
            .get_relationship(relationship_id)
            .await?
            .ok_or_else(|| relationship_not_found(relationship_id))?;

        if !self.store.delete_relationship(relationship_id, cause).await? {
            return Err(relationship_not_found(relationship_id));
        }
        Ok(current)
    }

    async fn notify_requester(
        &self,
        kind: NotificationKind,
        relationship: &Relationship,
        reason: Option<&str>,
    ) {
        let requester = recipient_for(self.store.as_ref(), &relationship.requester_id).await;
        let provider = recipient_for(self.store.as_ref(), &relationship.provider_id).await;

        let mut notification = Notification::new(kind, relationship.id, vec![requester])
            .with_field("provider", provider);
        if let Some(reason) = reason {
            notification = notification.with_reason(reason);
        }
        self.dispatcher.dispatch(notification);
    }

    async fn require_user(&self, user_id: &UserId) -> Result<User> {
        self.store
            .get_user(user_id)
            .await?
            .ok_or_else(|| TutorlinkError::NotFound(format!("user {}", user_id)))
    }
}

fn relationship_not_found(relationship_id: &RelationshipId) -> TutorlinkError {
    TutorlinkError::NotFound(format!("relationship {}", relationship_id))
}

/// Resolve a notification recipient. Lookup failures degrade to an id-only
/// recipient since the transition has already committed.
pub(crate) async fn recipient_for(store: &dyn PairingStore, user_id: &UserId) -> Recipient {
    match store.get_user(user_id).await {
        Ok(Some(user)) => Recipient::from(&user),
        Ok(None) => {
            warn!(user_id = %user_id, "Notification recipient no longer exists");
            Recipient::id_only(user_id)
        }
        Err(e) => {
            warn!(user_id = %user_id, error = %e, "Failed to resolve notification recipient");
            Recipient::id_only(user_id)
        }
    }
}
