//! Standards Core Library
//!
//! Compliance tracking for the healthy-city standards catalogue: derives one
//! status and progress figure per standard from every agency's evidence,
//! applies reviewer decisions, and answers dashboard queries.

pub mod aggregator;
pub mod catalog;
pub mod error;
pub mod obs;
pub mod query;
pub mod review;
pub mod service;
pub mod telemetry;
pub mod view;

pub use aggregator::{
    agency_participation, derive_status, AgencySubmissionStatus, ComplianceStatus, ReviewCounts,
    StandardComplianceStatus,
};
pub use catalog::StandardCatalog;
pub use error::{ComplianceError, Result};
pub use query::{contains_arabic, AgencyFilter, ComplianceQuery, SearchTerm, StatusFilter};
pub use review::{review_submission, ReviewAction, ReviewOutcome};
pub use service::ComplianceService;
pub use view::{AgencyDashboard, AgencyStandardEntry, StandardView, StatusSummary};

pub use obs::{
    emit_assignment_toggled, emit_orphan_submission, emit_query_evaluated, emit_review_applied,
    emit_submission_added, emit_submission_withdrawn, QuerySpan,
};
pub use telemetry::init_tracing;

pub use standards_state::{
    Agency, Assignment, AssignmentMap, AssignmentStore, Attachment, CatalogSource, ContentType,
    NewSubmission, ReviewStatus, Standard, StandardId, Submission, SubmissionId, SubmissionStore,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
