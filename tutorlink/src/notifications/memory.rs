//! Built-in notifiers that keep notifications in process

use super::traits::{Notifier, NotifyError};
use super::types::{Notification, NotificationKind};
use crate::models::UserId;
use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::info;

/// Notifier that collects every notification in memory.
///
/// Useful in tests and for embedding applications that poll for
/// notifications instead of receiving them.
#[derive(Debug, Clone, Default)]
pub struct MemoryNotifier {
    delivered: Arc<Mutex<Vec<Notification>>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything delivered so far, in delivery order
    pub fn notifications(&self) -> Vec<Notification> {
        self.lock().clone()
    }

    /// Notifications of one kind
    pub fn of_kind(&self, kind: NotificationKind) -> Vec<Notification> {
        self.lock()
            .iter()
            .filter(|n| n.kind == kind)
            .cloned()
            .collect()
    }

    /// Notifications addressed to one user
    pub fn for_recipient(&self, user_id: &UserId) -> Vec<Notification> {
        self.lock()
            .iter()
            .filter(|n| n.is_addressed_to(user_id))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Notification>> {
        self.delivered
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl Notifier for MemoryNotifier {
    async fn deliver(&self, notification: &Notification) -> Result<(), NotifyError> {
        self.lock().push(notification.clone());
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

/// Notifier that writes each notification to the log
#[derive(Debug, Clone)]
pub struct LogNotifier {
    timeout_ms: u64,
}

impl LogNotifier {
    pub fn new(timeout_ms: u64) -> Self {
        Self { timeout_ms }
    }
}

impl Default for LogNotifier {
    fn default() -> Self {
        Self::new(5000)
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn deliver(&self, notification: &Notification) -> Result<(), NotifyError> {
        let recipients: Vec<&str> = notification
            .recipients
            .iter()
            .map(|r| r.user_id.as_str())
            .collect();
        info!(
            event = notification.kind.event_name(),
            relationship_id = %notification.relationship_id,
            recipients = ?recipients,
            payload = %notification.payload,
            "Relationship notification"
        );
        Ok(())
    }

    /// Runs after the external notifiers
    fn priority(&self) -> i32 {
        -100
    }

    fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    fn name(&self) -> &str {
        "log"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RelationshipId;
    use crate::notifications::Recipient;

    #[tokio::test]
    async fn test_memory_notifier_filters() {
        let notifier = MemoryNotifier::new();
        let alice = UserId::from("alice");
        let id = RelationshipId::for_pair(&alice, &UserId::from("tutor"));
        let recipient = Recipient {
            user_id: alice.clone(),
            name: "Alice".to_string(),
            email: None,
        };

        notifier
            .deliver(&Notification::new(
                NotificationKind::Accepted,
                id,
                vec![recipient],
            ))
            .await
            .unwrap();
        notifier
            .deliver(&Notification::new(NotificationKind::Removed, id, Vec::new()))
            .await
            .unwrap();

        assert_eq!(notifier.len(), 2);
        assert_eq!(notifier.of_kind(NotificationKind::Removed).len(), 1);
        assert_eq!(notifier.for_recipient(&alice).len(), 1);

        notifier.clear();
        assert!(notifier.is_empty());
    }

    #[tokio::test]
    async fn test_log_notifier_never_fails() {
        let notifier = LogNotifier::default();
        let id = RelationshipId::for_pair(&UserId::from("a"), &UserId::from("b"));
        let result = notifier
            .deliver(&Notification::new(NotificationKind::ExpiryReminder, id, Vec::new()))
            .await;
        assert!(result.is_ok());
        assert_eq!(notifier.priority(), -100);
    }
}
