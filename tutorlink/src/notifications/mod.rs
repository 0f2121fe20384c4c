//! Notifications about relationship transitions
//!
//! Every committed lifecycle transition produces a [`Notification`] that the
//! [`NotificationDispatcher`] hands to each registered [`Notifier`]. Delivery is
//! fire-and-forget: failures are logged and never undo the transition.
//!
//! ## Built-in notifiers
//!
//! - [`LogNotifier`]: writes notifications to the tracing log
//! - [`MemoryNotifier`]: collects notifications in process
//! - [`WebhookNotifier`]: POSTs notifications to an HTTP endpoint with retries

pub mod dispatcher;
pub mod memory;
pub mod traits;
pub mod types;
pub mod webhook;

pub use dispatcher::NotificationDispatcher;
pub use memory::{LogNotifier, MemoryNotifier};
pub use traits::{Notifier, NotifyError};
pub use types::{Notification, NotificationKind, Recipient};
pub use webhook::{RetryPolicy, WebhookNotifier};
