//! Standards-State: storage layer for healthy-city standards compliance
//!
//! This crate holds the mutable records the compliance core reasons about:
//! agency assignments and evidence submissions. It owns no business rules;
//! status derivation lives in `standards-core`.
//!
//! ## Layer 0 - Data/Persistence
//!
//! ## Key Components
//!
//! - `storage_traits`: `CatalogSource`, `AssignmentStore`, `SubmissionStore`
//! - `AssignmentMap`: the standard -> agencies relation as a plain value
//! - `fakes`: in-memory implementations of every trait
//! - `SurrealComplianceStore`: SurrealDB implementation (memory, local file or remote)

pub mod assignment_map;
mod error;
pub mod fakes;
pub mod handle;
pub mod migrations;
mod schema;
pub mod storage_traits;
pub mod surreal_store;

pub use assignment_map::AssignmentMap;
pub use error::{StateError, StorageError};
pub use handle::StoreConfig;
pub use schema::{AssignmentRow, AttachmentRow, SubmissionRow};
pub use storage_traits::{
    Agency, Assignment, AssignmentStore, Attachment, CatalogSource, ContentType, NewSubmission,
    ReviewStatus, Standard, StandardId, StorageResult, Submission, SubmissionId, SubmissionStore,
};
pub use surreal_store::SurrealComplianceStore;

/// Result type for standards-state connection/migration operations
pub type Result<T> = std::result::Result<T, StateError>;
