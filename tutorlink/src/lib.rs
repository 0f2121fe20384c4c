//! # Tutorlink
//!
//! Relationship lifecycle and capacity engine for pairing *requesters* with
//! *providers* around a shared set of subjects.
//!
//! A requester asks a provider for help with one or more of the subjects the
//! provider offers. The provider accepts, rejects or later removes the
//! pairing, the requester can withdraw it, and stale pending requests expire
//! automatically. A provider never holds more accepted relationships than its
//! declared capacity limit.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::num::NonZeroU32;
//! use tutorlink::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let engine = init_with_defaults().await?;
//!
//!     let math = SubjectId::from("math");
//!     let profile = ProviderProfile::new([math.clone()], NonZeroU32::MIN);
//!     engine.store().create_user(User::provider("tutor-1", "Ada", profile)).await?;
//!     engine.store().create_user(User::requester("student-1", "Bob")).await?;
//!
//!     let requester = UserId::from("student-1");
//!     let provider = UserId::from("tutor-1");
//!     engine.service().request_relationship(&requester, &provider, [math]).await?;
//!
//!     let id = RelationshipId::for_pair(&requester, &provider);
//!     engine.service().accept_relationship(&id).await?;
//!
//!     engine.shutdown().await;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - **Relationship Service**: validates input and applies the lifecycle rules
//! - **Capacity Guard**: per-provider locking and the capacity decision
//! - **Expiry Sweeper**: periodic task that expires stale pending requests
//! - **Notification Dispatcher**: fire-and-forget delivery to registered notifiers
//! - **Storage**: SurrealDB-backed user and relationship repositories

pub mod config;
pub mod engine;
pub mod error_codes;
pub mod logging;
pub mod models;
pub mod notifications;
pub mod relationships;
pub mod storage;
pub mod sweeper;

/// The prelude re-exports commonly used types for convenience
pub mod prelude {
    pub use crate::engine::Tutorlink;
    pub use crate::{init, init_with_defaults};

    pub use crate::config::{ConfigBuilder, LogLevel, TutorlinkConfig};

    pub use crate::models::{
        Counterpart, CourseId, ProviderProfile, Relationship, RelationshipId,
        RelationshipStatus, RelationshipSummary, Role, Subject, SubjectId, Termination, User,
        UserId,
    };

    pub use crate::notifications::{
        Notification, NotificationDispatcher, NotificationKind, Notifier, Recipient,
    };

    pub use crate::relationships::{RelationshipService, RemovalFailure, RequestOutcome};
    pub use crate::sweeper::{ExpirySweeper, SweepReport};

    pub use crate::storage::{PairingStore, RelationshipStore, StorageError, UserStore};

    pub use crate::error_codes::{ErrorCode, ErrorMetadata};
    pub use crate::{Result, TutorlinkError};
}

use crate::models::{RelationshipId, SubjectId, UserId};
use crate::relationships::RemovalFailure;

/// Current library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Error type for Tutorlink operations
#[derive(Debug, thiserror::Error)]
pub enum TutorlinkError {
    /// A required argument was absent or blank
    #[error("Missing arguments: {0}")]
    MissingArguments(String),

    /// Requester and provider are the same user
    #[error("Requester and provider must be different users")]
    SameParty,

    /// A user or relationship does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// The target user lacks the provider capability
    #[error("User {0} does not accept relationship requests")]
    RoleMismatch(UserId),

    /// A requested subject is outside the provider's offered subjects
    #[error("Subject {subject} is not offered by provider {provider_id}")]
    SubjectNotOffered {
        subject: SubjectId,
        provider_id: UserId,
    },

    /// The provider already holds its limit of accepted relationships
    #[error("Provider {provider_id} has reached its capacity of {limit}")]
    CapacityExceeded { provider_id: UserId, limit: u32 },

    /// An identical request for the pair already exists
    #[error("Relationship {0} already exists with the same subjects")]
    DuplicateRequest(RelationshipId),

    /// Some items of a bulk removal failed; the others stay removed
    #[error("Removed {removed} relationships, {} failed", failures.len())]
    PartialFailure {
        removed: usize,
        failures: Vec<RemovalFailure>,
    },

    /// Error during storage operations
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Logging error
    #[error("Logging error: {0}")]
    Logging(#[from] crate::logging::LogError),

    /// Other unclassified errors
    #[error("{0}")]
    Other(String),
}

impl TutorlinkError {
    /// Stable code identifying the error kind
    pub fn code(&self) -> error_codes::ErrorCode {
        use error_codes::ErrorCode;

        match self {
            Self::MissingArguments(_) => ErrorCode::MissingArguments,
            Self::SameParty => ErrorCode::SameParty,
            Self::NotFound(_) => ErrorCode::NotFound,
            Self::RoleMismatch(_) => ErrorCode::RoleMismatch,
            Self::SubjectNotOffered { .. } => ErrorCode::SubjectNotOffered,
            Self::CapacityExceeded { .. } => ErrorCode::CapacityExceeded,
            Self::DuplicateRequest(_) => ErrorCode::DuplicateRequest,
            Self::PartialFailure { .. } => ErrorCode::PartialFailure,
            Self::Storage(_) => ErrorCode::StorageFailure,
            Self::Configuration(_) => ErrorCode::ConfigurationError,
            Self::Logging(_) | Self::Other(_) => ErrorCode::InternalFault,
        }
    }

    /// Catalog entry for this error
    pub fn metadata(&self) -> &'static error_codes::ErrorMetadata {
        self.code().metadata()
    }
}

impl From<crate::config::ConfigError> for TutorlinkError {
    fn from(err: crate::config::ConfigError) -> Self {
        TutorlinkError::Configuration(err.to_string())
    }
}

/// Result type for Tutorlink operations
pub type Result<T> = std::result::Result<T, TutorlinkError>;

/// Initialize Tutorlink with default configuration
///
/// Uses an in-memory store, so nothing survives the process. Mostly useful
/// for tests and experiments.
pub async fn init_with_defaults() -> Result<engine::Tutorlink> {
    let config = config::ConfigBuilder::defaults().build()?;
    init(config).await
}

/// Initialize Tutorlink with the provided configuration
///
/// Sets up logging, opens the store, registers the configured notifiers and
/// wires the relationship service and expiry sweeper together. The sweeper is
/// not started; call [`engine::Tutorlink::start_sweeper`] for that.
pub async fn init(config: config::TutorlinkConfig) -> Result<engine::Tutorlink> {
    // Ignore errors if tracing is already initialized
    let _ = logging::init(&config.logging);

    engine::Tutorlink::new(config).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            TutorlinkError::SameParty.code(),
            error_codes::ErrorCode::SameParty
        );
        assert_eq!(
            TutorlinkError::Storage("boom".to_string()).metadata().http_status,
            503
        );
        let partial = TutorlinkError::PartialFailure {
            removed: 2,
            failures: vec![RemovalFailure {
                relationship_id: RelationshipId::for_pair(
                    &UserId::from("a"),
                    &UserId::from("b"),
                ),
                cause: "store unavailable".to_string(),
            }],
        };
        assert_eq!(partial.to_string(), "Removed 2 relationships, 1 failed");
    }
}
