//! Error types for storage operations

use thiserror::Error;

/// Error type for the user and relationship repositories
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The backend could not be reached or opened
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Query error: {0}")]
    Query(String),

    #[error("Internal error: {0}")]
    Internal(String),

    /// Stored data violates a model invariant
    #[error("Validation error: {0}")]
    Validation(String),

    /// The record to update no longer exists
    #[error("Not found: {0}")]
    NotFound(String),

    /// A user, subject or relationship with the same key exists
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Storage engine not compiled into this build
    #[error("Unsupported storage type: {0}")]
    UnsupportedStorageType(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

impl StorageError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound(_))
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError::Connection(err.to_string())
    }
}

/// A record that vanished between lookup and write surfaces as `NotFound`;
/// every other storage failure becomes `Storage`.
impl From<StorageError> for crate::TutorlinkError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(what) => crate::TutorlinkError::NotFound(what),
            other => crate::TutorlinkError::Storage(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TutorlinkError;

    #[test]
    fn test_conversion_to_engine_error() {
        let missing: TutorlinkError = StorageError::NotFound("relationship x".to_string()).into();
        assert!(matches!(missing, TutorlinkError::NotFound(what) if what == "relationship x"));

        let broken: TutorlinkError = StorageError::Query("syntax".to_string()).into();
        assert_eq!(broken.to_string(), "Storage error: Query error: syntax");
    }
}
