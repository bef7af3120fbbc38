//! Error types for standards-state

use thiserror::Error;

/// Errors raised while connecting to or preparing the database
#[derive(Error, Debug)]
pub enum StateError {
    /// Database connection error
    #[error("Database connection failed: {0}")]
    Connection(String),

    /// Database query error
    #[error("Database query failed: {0}")]
    Query(String),

    /// Serialization error
    #[error("Serialization failed: {0}")]
    Serialization(String),

    /// Schema setup error
    #[error("Schema setup failed: {0}")]
    SchemaSetup(String),
}

impl From<surrealdb::Error> for StateError {
    fn from(err: surrealdb::Error) -> Self {
        StateError::Query(err.to_string())
    }
}

impl From<serde_json::Error> for StateError {
    fn from(err: serde_json::Error) -> Self {
        StateError::Serialization(err.to_string())
    }
}

/// Errors returned by the storage traits (`AssignmentStore`, `SubmissionStore`,
/// `CatalogSource`).
#[derive(Error, Debug)]
pub enum StorageError {
    /// No submission with the given id exists
    #[error("submission not found: {submission_id}")]
    SubmissionNotFound { submission_id: String },

    /// A stored row could not be mapped back into a domain value
    #[error("invalid stored record: {0}")]
    InvalidRecord(String),

    /// Backend-specific failure (query, connection, lock poisoning)
    #[error("storage backend error: {0}")]
    Backend(String),
}

impl From<surrealdb::Error> for StorageError {
    fn from(err: surrealdb::Error) -> Self {
        StorageError::Backend(err.to_string())
    }
}

impl From<StateError> for StorageError {
    fn from(err: StateError) -> Self {
        StorageError::Backend(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submission_not_found_display() {
        let err = StorageError::SubmissionNotFound {
            submission_id: "sub-42".to_string(),
        };
        assert_eq!(err.to_string(), "submission not found: sub-42");
    }

    #[test]
    fn test_state_error_converts_to_backend() {
        let err: StorageError = StateError::Connection("refused".into()).into();
        assert!(matches!(err, StorageError::Backend(_)));
        assert!(err.to_string().contains("refused"));
    }
}
