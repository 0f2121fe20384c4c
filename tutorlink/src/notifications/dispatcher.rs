//! Fire-and-forget notification dispatch
//!
//! The [`NotificationDispatcher`] keeps the registered notifiers sorted by
//! priority. [`NotificationDispatcher::dispatch`] returns immediately; delivery
//! runs on a spawned task so a slow or failing notifier never delays or fails
//! the operation that produced the notification.

use super::traits::Notifier;
use super::types::Notification;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

#[derive(Debug)]
struct NotifierEntry {
    notifier: Arc<dyn Notifier>,
    priority: i32,
}

/// Registry and dispatcher for relationship notifications
///
/// Cheap to clone; clones share the same notifiers and in-flight deliveries.
#[derive(Debug, Clone, Default)]
pub struct NotificationDispatcher {
    /// Registered notifiers, highest priority first
    notifiers: Arc<RwLock<Vec<NotifierEntry>>>,
    in_flight: Arc<Mutex<Vec<JoinHandle<()>>>>,
}

impl NotificationDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a notifier for all subsequent notifications
    pub async fn register(&self, notifier: Arc<dyn Notifier>) {
        let priority = notifier.priority();
        let name = notifier.name().to_string();
        let mut notifiers = self.notifiers.write().await;

        notifiers.push(NotifierEntry { notifier, priority });
        notifiers.sort_by(|a, b| {
            b.priority
                .cmp(&a.priority)
                .then_with(|| a.notifier.name().cmp(b.notifier.name()))
        });

        debug!(notifier = %name, priority, "Notifier registered");
    }

    /// Remove every notifier with the given name. Returns how many were removed.
    pub async fn unregister(&self, name: &str) -> usize {
        let mut notifiers = self.notifiers.write().await;
        let before = notifiers.len();
        notifiers.retain(|entry| entry.notifier.name() != name);
        before - notifiers.len()
    }

    pub async fn notifier_count(&self) -> usize {
        self.notifiers.read().await.len()
    }

    /// Names of the registered notifiers in delivery order
    pub async fn list_notifiers(&self) -> Vec<String> {
        self.notifiers
            .read()
            .await
            .iter()
            .map(|entry| entry.notifier.name().to_string())
            .collect()
    }

    /// Queue a notification for delivery to every registered notifier.
    ///
    /// Must be called from within a tokio runtime.
    pub fn dispatch(&self, notification: Notification) {
        let notifiers = Arc::clone(&self.notifiers);
        let handle = tokio::spawn(async move {
            let targets: Vec<Arc<dyn Notifier>> = notifiers
                .read()
                .await
                .iter()
                .map(|entry| Arc::clone(&entry.notifier))
                .collect();

            for notifier in targets {
                deliver_one(notifier.as_ref(), &notification).await;
            }
        });

        let mut in_flight = self.lock_in_flight();
        in_flight.retain(|handle| !handle.is_finished());
        in_flight.push(handle);
    }

    /// Number of deliveries that have not finished yet
    pub fn pending(&self) -> usize {
        self.lock_in_flight()
            .iter()
            .filter(|handle| !handle.is_finished())
            .count()
    }

    /// Wait until every dispatched notification has been delivered or given up on
    pub async fn drain(&self) {
        loop {
            let handles = std::mem::take(&mut *self.lock_in_flight());
            if handles.is_empty() {
                break;
            }
            for handle in handles {
                if let Err(e) = handle.await {
                    warn!(error = %e, "Notification task aborted");
                }
            }
        }
    }

    fn lock_in_flight(&self) -> MutexGuard<'_, Vec<JoinHandle<()>>> {
        // A poisoned list of join handles is still usable
        self.in_flight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

async fn deliver_one(notifier: &dyn Notifier, notification: &Notification) {
    let timeout_ms = notifier.timeout_ms();
    let name = notifier.name();

    match tokio::time::timeout(
        Duration::from_millis(timeout_ms),
        notifier.deliver(notification),
    )
    .await
    {
        Ok(Ok(())) => {
            debug!(
                notifier = name,
                kind = %notification.kind,
                relationship_id = %notification.relationship_id,
                "Notification delivered"
            );
        }
        Ok(Err(e)) => {
            warn!(
                notifier = name,
                kind = %notification.kind,
                relationship_id = %notification.relationship_id,
                error = %e,
                "Notification delivery failed"
            );
        }
        Err(_) => {
            warn!(
                notifier = name,
                kind = %notification.kind,
                relationship_id = %notification.relationship_id,
                timeout_ms,
                "Notification delivery timed out"
            );
        }
    }
}
