//! Error taxonomy for the compliance core.
//!
//! Queries never fail for unknown standard ids (they return empty results);
//! orphan submissions are not errors at all. What remains are structural
//! problems caught at the boundary and storage failures.

use standards_state::{StandardId, StorageError};

/// Compliance core errors.
#[derive(Debug, thiserror::Error)]
pub enum ComplianceError {
    #[error("unknown standard: {0}")]
    UnknownStandard(StandardId),

    #[error("invalid submission: {0}")]
    InvalidSubmission(String),

    #[error("duplicate standard id in catalogue: {0}")]
    DuplicateStandard(StandardId),

    #[error("invalid catalogue: {0}")]
    InvalidCatalog(String),

    #[error("cannot parse {kind} from '{value}'")]
    Parse { kind: &'static str, value: String },

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for compliance operations.
pub type Result<T> = std::result::Result<T, ComplianceError>;
