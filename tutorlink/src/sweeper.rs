//! Expiry sweeper for stale pending relationships
//!
//! Each sweep runs two passes:
//!
//! 1. Every pending relationship older than the configured TTL is declined:
//!    the record is deleted under its provider's lock and both parties get an
//!    [`NotificationKind::Expired`] notification.
//! 2. Every pending relationship that has not expired yet gets an
//!    [`NotificationKind::ExpiryReminder`] to the provider, carrying the time
//!    left before it expires.
//!
//! Per-record failures are logged and counted but never abort the sweep. The
//! sweep stops between records once its cancellation token fires.

use crate::config::SweeperConfig;
use crate::models::{Relationship, Termination};
use crate::notifications::{Notification, NotificationDispatcher, NotificationKind};
use crate::relationships::CapacityGuard;
use crate::relationships::service::recipient_for;
use crate::storage::{PairingStore, RelationshipFilter};
use crate::{Result, TutorlinkError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Outcome of one sweep
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepReport {
    /// Pending relationships declined for age
    pub expired: usize,
    /// Reminders sent for relationships that have not expired yet
    pub reminded: usize,
    /// Records that could not be processed
    pub failed: usize,
    /// Whether the sweep stopped early on cancellation
    pub interrupted: bool,
}

/// Periodic task that expires stale pending relationships.
///
/// Shares the store, capacity guard and dispatcher with the
/// [`crate::relationships::RelationshipService`].
#[derive(Debug)]
pub struct ExpirySweeper {
    store: Arc<dyn PairingStore>,
    guard: Arc<CapacityGuard>,
    dispatcher: NotificationDispatcher,
    config: SweeperConfig,
}

impl ExpirySweeper {
    pub fn new(
        store: Arc<dyn PairingStore>,
        guard: Arc<CapacityGuard>,
        dispatcher: NotificationDispatcher,
        config: SweeperConfig,
    ) -> Self {
        Self {
            store,
            guard,
            dispatcher,
            config,
        }
    }

    pub fn config(&self) -> &SweeperConfig {
        &self.config
    }

    /// Run one complete sweep as of `now`
    pub async fn sweep_once(&self, now: DateTime<Utc>) -> Result<SweepReport> {
        self.sweep(now, &CancellationToken::new()).await
    }

    /// Run one sweep as of `now`, stopping between records once `token` is cancelled
    pub async fn sweep(&self, now: DateTime<Utc>, token: &CancellationToken) -> Result<SweepReport> {
        let ttl = chrono::Duration::from_std(self.config.ttl)
            .map_err(|e| TutorlinkError::Configuration(format!("Invalid sweeper ttl: {}", e)))?;
        let cutoff = now - ttl;
        let mut report = SweepReport::default();

        let stale = self
            .store
            .list_relationships(
                Some(RelationshipFilter {
                    created_before: Some(cutoff),
                    ..RelationshipFilter::pending()
                }),
                None,
                None,
            )
            .await?;
        debug!(count = stale.len(), %cutoff, "Expiring stale pending relationships");

        for relationship in stale {
            if token.is_cancelled() {
                report.interrupted = true;
                return Ok(report);
            }
            match self.expire(&relationship, cutoff).await {
                Ok(true) => report.expired += 1,
                Ok(false) => {
                    debug!(relationship_id = %relationship.id, "Relationship changed before expiry, skipped");
                }
                Err(e) => {
                    warn!(relationship_id = %relationship.id, error = %e, "Failed to expire relationship");
                    report.failed += 1;
                }
            }
        }

        if self.config.send_reminders {
            let pending = self
                .store
                .list_relationships(Some(RelationshipFilter::pending()), None, None)
                .await?;

            for relationship in pending.iter().filter(|r| r.created_on >= cutoff) {
                if token.is_cancelled() {
                    report.interrupted = true;
                    return Ok(report);
                }
                self.remind(relationship, relationship.created_on + ttl, now)
                    .await;
                report.reminded += 1;
            }
        }

        Ok(report)
    }

    /// Start sweeping every `interval` until `token` is cancelled.
    ///
    /// The first sweep runs immediately.
    pub fn spawn(self: Arc<Self>, token: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(self.config.interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            info!(
                interval = ?self.config.interval,
                ttl = ?self.config.ttl,
                "Expiry sweeper started"
            );

            loop {
                tokio::select! {
                    _ = token.cancelled() => {
                        info!("Expiry sweeper stopped");
                        break;
                    }
                    _ = interval.tick() => {
                        match self.sweep(Utc::now(), &token).await {
                            Ok(report) => info!(
                                expired = report.expired,
                                reminded = report.reminded,
                                failed = report.failed,
                                interrupted = report.interrupted,
                                "Sweep finished"
                            ),
                            Err(e) => error!(error = %e, "Sweep failed"),
                        }
                    }
                }
            }
        })
    }

    /// Delete one stale relationship. Returns false when the record is gone,
    /// no longer pending, or no longer stale once the lock is held.
    async fn expire(&self, candidate: &Relationship, cutoff: DateTime<Utc>) -> Result<bool> {
        let _lock = self.guard.lock(&candidate.provider_id).await;

        let current = match self.store.get_relationship(&candidate.id).await? {
            Some(current) if current.is_pending() && current.created_on < cutoff => current,
            _ => return Ok(false),
        };

        let requester = recipient_for(self.store.as_ref(), &current.requester_id).await;
        let provider = recipient_for(self.store.as_ref(), &current.provider_id).await;

        if !self
            .store
            .delete_relationship(&current.id, Termination::Expired)
            .await?
        {
            return Ok(false);
        }

        info!(relationship_id = %current.id, created_on = %current.created_on, "Pending relationship expired");
        self.dispatcher.dispatch(
            Notification::new(
                NotificationKind::Expired,
                current.id,
                vec![requester, provider],
            )
            .with_field("subjects", &current.subjects)
            .with_field("created_on", current.created_on),
        );
        Ok(true)
    }

    async fn remind(
        &self,
        relationship: &Relationship,
        expires_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) {
        let provider = recipient_for(self.store.as_ref(), &relationship.provider_id).await;
        let requester = recipient_for(self.store.as_ref(), &relationship.requester_id).await;
        let remaining = (expires_at - now).num_seconds().max(0);

        self.dispatcher.dispatch(
            Notification::new(
                NotificationKind::ExpiryReminder,
                relationship.id,
                vec![provider],
            )
            .with_field("requester", requester)
            .with_field("expires_at", expires_at)
            .with_field("remaining_secs", remaining),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ProviderProfile, SubjectId, User, UserId};
    use crate::notifications::MemoryNotifier;
    use crate::storage::{SurrealDBConfig, create_store};
    use std::collections::BTreeSet;
    use std::num::NonZeroU32;
    use std::time::Duration;

    async fn setup(config: SweeperConfig) -> (Arc<ExpirySweeper>, Arc<MemoryNotifier>) {
        let store = create_store(&SurrealDBConfig::memory()).await.unwrap();
        store
            .create_user(User::requester("student", "Bob"))
            .await
            .unwrap();
        store
            .create_user(User::provider(
                "tutor",
                "Ada",
                ProviderProfile::new([SubjectId::from("math")], NonZeroU32::MIN),
            ))
            .await
            .unwrap();

        let dispatcher = NotificationDispatcher::new();
        let notifier = Arc::new(MemoryNotifier::new());
        dispatcher.register(notifier.clone()).await;

        let sweeper = ExpirySweeper::new(store, Arc::new(CapacityGuard::new()), dispatcher, config);
        (Arc::new(sweeper), notifier)
    }

    async fn insert_pending(sweeper: &ExpirySweeper, created_on: DateTime<Utc>) -> Relationship {
        sweeper
            .store
            .insert_relationship(Relationship::pending_at(
                UserId::from("student"),
                UserId::from("tutor"),
                BTreeSet::from([SubjectId::from("math")]),
                created_on,
            ))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_reminds_before_ttl_and_expires_after() {
        let (sweeper, notifier) = setup(SweeperConfig::default()).await;
        let created = Utc::now();
        let relationship = insert_pending(&sweeper, created).await;

        let report = sweeper
            .sweep_once(created + chrono::Duration::days(5))
            .await
            .unwrap();
        assert_eq!(report.expired, 0);
        assert_eq!(report.reminded, 1);
        assert!(
            sweeper
                .store
                .get_relationship(&relationship.id)
                .await
                .unwrap()
                .is_some()
        );

        let report = sweeper
            .sweep_once(created + chrono::Duration::days(6))
            .await
            .unwrap();
        assert_eq!(report.expired, 1);
        assert_eq!(report.reminded, 0);
        assert!(
            sweeper
                .store
                .get_relationship(&relationship.id)
                .await
                .unwrap()
                .is_none()
        );

        sweeper.dispatcher.drain().await;
        let reminders = notifier.of_kind(NotificationKind::ExpiryReminder);
        assert_eq!(reminders.len(), 1);
        assert_eq!(reminders[0].payload["remaining_secs"], 12 * 60 * 60);

        let expired = notifier.of_kind(NotificationKind::Expired);
        assert_eq!(expired.len(), 1);
        assert!(expired[0].is_addressed_to(&UserId::from("student")));
        assert!(expired[0].is_addressed_to(&UserId::from("tutor")));
    }

    #[tokio::test]
    async fn test_accepted_relationships_never_expire() {
        let (sweeper, _) = setup(SweeperConfig::default()).await;
        let created = Utc::now();
        let mut relationship = insert_pending(&sweeper, created).await;
        relationship.status = crate::models::RelationshipStatus::Accepted;
        sweeper.store.update_relationship(relationship).await.unwrap();

        let report = sweeper
            .sweep_once(created + chrono::Duration::days(30))
            .await
            .unwrap();
        assert_eq!(report, SweepReport::default());
    }

    #[tokio::test]
    async fn test_reminders_can_be_disabled() {
        let config = SweeperConfig {
            send_reminders: false,
            ..SweeperConfig::default()
        };
        let (sweeper, _) = setup(config).await;
        let created = Utc::now();
        insert_pending(&sweeper, created).await;

        let report = sweeper
            .sweep_once(created + chrono::Duration::days(1))
            .await
            .unwrap();
        assert_eq!(report.reminded, 0);
    }

    #[tokio::test]
    async fn test_cancelled_sweep_stops_between_records() {
        let (sweeper, _) = setup(SweeperConfig::default()).await;
        let created = Utc::now();
        insert_pending(&sweeper, created).await;

        let token = CancellationToken::new();
        token.cancel();
        let report = sweeper
            .sweep(created + chrono::Duration::days(6), &token)
            .await
            .unwrap();

        assert!(report.interrupted);
        assert_eq!(report.expired, 0);
    }

    #[tokio::test]
    async fn test_spawned_sweeper_stops_on_cancel() {
        let config = SweeperConfig {
            interval: Duration::from_secs(3600),
            ..SweeperConfig::default()
        };
        let (sweeper, _) = setup(config).await;

        let token = CancellationToken::new();
        let handle = Arc::clone(&sweeper).spawn(token.clone());
        token.cancel();

        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("sweeper did not stop")
            .unwrap();
    }
}
