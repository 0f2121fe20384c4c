//! Filter types for storage queries

use crate::models::{RelationshipStatus, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Filter for relationship queries
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RelationshipFilter {
    /// Filter by requester
    pub requester_id: Option<UserId>,

    /// Filter by provider
    pub provider_id: Option<UserId>,

    /// Filter by status
    pub status: Option<RelationshipStatus>,

    /// Only relationships created strictly before this instant
    pub created_before: Option<DateTime<Utc>>,
}

impl RelationshipFilter {
    pub fn for_requester(requester_id: UserId) -> Self {
        Self {
            requester_id: Some(requester_id),
            ..Default::default()
        }
    }

    pub fn for_provider(provider_id: UserId) -> Self {
        Self {
            provider_id: Some(provider_id),
            ..Default::default()
        }
    }

    pub fn with_status(mut self, status: RelationshipStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn pending() -> Self {
        Self::default().with_status(RelationshipStatus::Pending)
    }
}
