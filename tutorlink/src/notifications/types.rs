//! Notification payloads sent when a relationship changes state

use crate::models::{RelationshipId, User, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// What happened to the relationship
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// A requester asked a provider for a new relationship
    NewRequest,
    /// A requester changed the subjects of a pending or accepted relationship
    SubjectsChanged,
    /// The provider accepted the request
    Accepted,
    /// The provider rejected the relationship
    Rejected,
    /// The requester withdrew the relationship
    Withdrawn,
    /// The provider removed the relationship
    Removed,
    /// The request was pending for too long and was declined automatically
    Expired,
    /// The request is still pending and will expire soon
    ExpiryReminder,
}

impl NotificationKind {
    /// Event name used on the wire, e.g. in webhook payloads
    pub fn event_name(&self) -> &'static str {
        match self {
            NotificationKind::NewRequest => "relationship.requested",
            NotificationKind::SubjectsChanged => "relationship.subjects_changed",
            NotificationKind::Accepted => "relationship.accepted",
            NotificationKind::Rejected => "relationship.rejected",
            NotificationKind::Withdrawn => "relationship.withdrawn",
            NotificationKind::Removed => "relationship.removed",
            NotificationKind::Expired => "relationship.expired",
            NotificationKind::ExpiryReminder => "relationship.expiry_reminder",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.event_name())
    }
}

/// Identity of a notified party
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    pub user_id: UserId,
    pub name: String,
    pub email: Option<String>,
}

impl Recipient {
    /// Recipient known only by id, used when the account can no longer be resolved
    pub fn id_only(user_id: &UserId) -> Self {
        Self {
            user_id: user_id.clone(),
            name: user_id.to_string(),
            email: None,
        }
    }
}

impl From<&User> for Recipient {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

/// A message about one relationship transition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub kind: NotificationKind,
    pub relationship_id: RelationshipId,
    pub recipients: Vec<Recipient>,

    /// Kind-specific details such as the reason or the subjects
    pub payload: serde_json::Value,

    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(
        kind: NotificationKind,
        relationship_id: RelationshipId,
        recipients: Vec<Recipient>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            relationship_id,
            recipients,
            payload: serde_json::Value::Object(serde_json::Map::new()),
            created_at: Utc::now(),
        }
    }

    /// Add a field to the payload
    pub fn with_field(mut self, key: &str, value: impl Serialize) -> Self {
        let value = serde_json::to_value(value).unwrap_or(serde_json::Value::Null);
        if let serde_json::Value::Object(map) = &mut self.payload {
            map.insert(key.to_string(), value);
        }
        self
    }

    /// Attach the free-text reason given for the transition
    pub fn with_reason(self, reason: &str) -> Self {
        self.with_field("reason", reason)
    }

    /// Whether `user_id` is among the recipients
    pub fn is_addressed_to(&self, user_id: &UserId) -> bool {
        self.recipients.iter().any(|r| &r.user_id == user_id)
    }

    /// Free-text reason, if one was attached
    pub fn reason(&self) -> Option<&str> {
        self.payload.get("reason").and_then(|v| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_fields() {
        let id = RelationshipId::for_pair(&UserId::from("a"), &UserId::from("b"));
        let recipient = Recipient {
            user_id: UserId::from("a"),
            name: "Alice".to_string(),
            email: None,
        };
        let notification = Notification::new(NotificationKind::Rejected, id, vec![recipient])
            .with_reason("fully booked")
            .with_field("subjects", ["math"]);

        assert_eq!(notification.reason(), Some("fully booked"));
        assert_eq!(notification.payload["subjects"][0], "math");
        assert!(notification.is_addressed_to(&UserId::from("a")));
        assert!(!notification.is_addressed_to(&UserId::from("b")));
    }

    #[test]
    fn test_event_names() {
        assert_eq!(NotificationKind::NewRequest.event_name(), "relationship.requested");
        assert_eq!(
            NotificationKind::ExpiryReminder.to_string(),
            "relationship.expiry_reminder"
        );
    }
}
