//! Relationship model: the pairing between one requester and one provider

use super::subject::SubjectId;
use super::user::{User, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Namespace for deriving relationship ids from the (requester, provider) pair
const RELATIONSHIP_NAMESPACE: Uuid = Uuid::from_u128(0x5f0e_2c7a_9b1d_4e3f_8a6c_1d2e_3f4a_5b6c);

/// Identifier of a relationship.
///
/// Derived deterministically from the ordered (requester, provider) pair, so a
/// pair can never map to two different relationship ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RelationshipId(Uuid);

impl RelationshipId {
    pub fn for_pair(requester_id: &UserId, provider_id: &UserId) -> Self {
        // Length prefix keeps ("ab", "c") and ("a", "bc") apart
        let name = format!(
            "{}:{}:{}",
            requester_id.as_str().len(),
            requester_id.as_str(),
            provider_id.as_str()
        );
        Self(Uuid::new_v5(&RELATIONSHIP_NAMESPACE, name.as_bytes()))
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for RelationshipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RelationshipId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

impl From<Uuid> for RelationshipId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

/// Persisted status of a relationship.
///
/// Rejected, withdrawn, removed and expired relationships are deleted rather
/// than given a status of their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipStatus {
    Pending,
    Accepted,
}

impl RelationshipStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationshipStatus::Pending => "pending",
            RelationshipStatus::Accepted => "accepted",
        }
    }
}

impl fmt::Display for RelationshipStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelationshipStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(RelationshipStatus::Pending),
            "accepted" => Ok(RelationshipStatus::Accepted),
            _ => Err(format!("Invalid relationship status: {}", s)),
        }
    }
}

/// Why a relationship record is being deleted.
///
/// Passed through to the repository so a backend can keep an audit trail
/// without the service contract changing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// Declined by the provider while pending
    Rejected,
    /// Cancelled by the requester
    Withdrawn,
    /// Ended by the provider
    Removed,
    /// Declined automatically by the expiry sweeper
    Expired,
}

impl Termination {
    pub fn as_str(&self) -> &'static str {
        match self {
            Termination::Rejected => "rejected",
            Termination::Withdrawn => "withdrawn",
            Termination::Removed => "removed",
            Termination::Expired => "expired",
        }
    }
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A pairing record between one requester and one provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    pub id: RelationshipId,
    pub requester_id: UserId,
    pub provider_id: UserId,
    pub status: RelationshipStatus,

    /// Non-empty subset of the provider's offered subjects
    pub subjects: BTreeSet<SubjectId>,

    pub created_on: DateTime<Utc>,
}

impl Relationship {
    /// Create a new pending relationship stamped with the current time
    pub fn pending(requester_id: UserId, provider_id: UserId, subjects: BTreeSet<SubjectId>) -> Self {
        Self::pending_at(requester_id, provider_id, subjects, Utc::now())
    }

    pub fn pending_at(
        requester_id: UserId,
        provider_id: UserId,
        subjects: BTreeSet<SubjectId>,
        created_on: DateTime<Utc>,
    ) -> Self {
        Self {
            id: RelationshipId::for_pair(&requester_id, &provider_id),
            requester_id,
            provider_id,
            status: RelationshipStatus::Pending,
            subjects,
            created_on,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == RelationshipStatus::Pending
    }

    pub fn is_accepted(&self) -> bool {
        self.status == RelationshipStatus::Accepted
    }

    /// Age of the record at `now`
    pub fn age_at(&self, now: DateTime<Utc>) -> chrono::Duration {
        now.signed_duration_since(self.created_on)
    }
}

/// Identity of the other party in a relationship summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counterpart {
    pub id: UserId,
    pub name: String,
    pub email: Option<String>,
}

impl From<&User> for Counterpart {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

/// Listing view of a relationship from one party's point of view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipSummary {
    pub id: RelationshipId,
    pub status: RelationshipStatus,
    pub counterpart: Counterpart,
    pub subjects: Vec<SubjectId>,
    pub created_on: DateTime<Utc>,
}
