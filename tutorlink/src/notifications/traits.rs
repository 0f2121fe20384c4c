//! Traits for notification delivery.
//!
//! Implement [`Notifier`] to receive every notification the engine emits.
//!
//! # Examples
//!
//! ```no_run
//! use async_trait::async_trait;
//! use tutorlink::notifications::{Notification, Notifier, NotifyError};
//!
//! #[derive(Debug)]
//! struct StdoutNotifier;
//!
//! #[async_trait]
//! impl Notifier for StdoutNotifier {
//!     async fn deliver(&self, notification: &Notification) -> Result<(), NotifyError> {
//!         println!("{} for {}", notification.kind, notification.relationship_id);
//!         Ok(())
//!     }
//! }
//! ```

use super::types::Notification;
use async_trait::async_trait;

/// Error type for notification delivery
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// The notification could not be delivered
    #[error("Delivery failed: {0}")]
    Delivery(String),

    /// The notification could not be serialized
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Receiver of relationship notifications
///
/// # Delivery
///
/// - Notifiers run in priority order (higher priority first)
/// - Delivery happens off the caller's task; the operation that triggered the
///   notification has already committed
/// - Failures and timeouts are logged and never reach the caller
/// - Each notifier has a timeout (default: 5000ms)
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync + std::fmt::Debug {
    /// Deliver one notification
    async fn deliver(&self, notification: &Notification) -> Result<(), NotifyError>;

    /// Priority of this notifier (higher = runs first). Default priority is 0.
    fn priority(&self) -> i32 {
        0
    }

    /// Timeout in milliseconds for one delivery
    fn timeout_ms(&self) -> u64 {
        5000
    }

    /// Name used in logs
    fn name(&self) -> &str {
        "anonymous_notifier"
    }
}
