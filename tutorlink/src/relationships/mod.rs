//! Relationship lifecycle engine
//!
//! [`RelationshipService`] is the sole mutator of relationship records. Every
//! transition runs while holding the provider's lock from the
//! [`CapacityGuard`], so the accepted count of a provider can never exceed its
//! capacity limit even under concurrent requests and accepts.
//!
//! ```text
//!             request                 accept
//!   (none) ───────────► PENDING ─────────────► ACCEPTED
//!                         │  ▲                    │
//!             request with│  │                    │
//!          other subjects └──┘                    │
//!                         │                       │
//!   reject / withdraw /   ▼                       ▼   reject / withdraw /
//!   remove / expire    (deleted)              (deleted)  remove
//! ```

pub mod capacity;
pub mod service;
pub mod validation;

use crate::models::RelationshipId;
use serde::{Deserialize, Serialize};

pub use capacity::{CapacityGuard, ProviderLock};
pub use service::RelationshipService;
pub use validation::{RelationshipRequestInput, ValidatedRequest};

/// Result of a successful `request_relationship` call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestOutcome {
    /// A new pending relationship was created
    Created,
    /// The subject set of the existing relationship was replaced
    SubjectsUpdated,
}

/// One failed item of a bulk removal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovalFailure {
    pub relationship_id: RelationshipId,
    pub cause: String,
}
