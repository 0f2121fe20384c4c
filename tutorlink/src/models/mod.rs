//! Domain models for users, subjects, and relationships

pub mod relationship;
pub mod subject;
pub mod user;

// Re-export important models
pub use relationship::{
    Counterpart, Relationship, RelationshipId, RelationshipStatus, RelationshipSummary,
    Termination,
};
pub use subject::{CourseId, Subject, SubjectId};
pub use user::{ProviderProfile, Role, User, UserId};
