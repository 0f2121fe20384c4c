//! SurrealDB-backed store
//!
//! One `SurrealStore` implements both repositories on top of a single client,
//! so users, subjects and relationships live in the same database.

pub mod base;
pub mod relationship;
pub mod schema;
pub mod user;

pub use base::SurrealStore;

/// Table holding user accounts
pub(crate) const USER_TABLE: &str = "user";

/// Table holding subject reference data
pub(crate) const SUBJECT_TABLE: &str = "subject";

/// Table holding relationship records
pub(crate) const RELATIONSHIP_TABLE: &str = "relationship";
