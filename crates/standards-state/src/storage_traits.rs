//! Storage trait definitions for standards compliance
//!
//! These traits define the collaborator interfaces the compliance core reads
//! from and writes to:
//! - `CatalogSource`: reference data (standards and agencies)
//! - `AssignmentStore`: which agencies are responsible for which standards
//! - `SubmissionStore`: evidence submissions and their review status
//!
//! All traits are async and backend-agnostic. In-memory implementations live
//! in the `fakes` module; a SurrealDB implementation in `surreal_store`.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StorageError;

/// Result type for storage operations
pub type StorageResult<T> = std::result::Result<T, StorageError>;

// ---------------------------------------------------------------------------
// Reference data
// ---------------------------------------------------------------------------

/// Stable catalogue identifier of a standard (1..N, never reused).
pub type StandardId = u32;

/// One health-city standard: a normative statement plus its requirements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standard {
    pub id: StandardId,
    /// The standard's normative statement
    pub text: String,
    /// Ordered requirement list
    #[serde(default)]
    pub requirements: Vec<String>,
}

/// A municipal agency. `name` is the join key into assignments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Agency {
    pub id: u32,
    pub name: String,
}

/// Read access to reference data owned outside this layer.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// All standards in catalogue order.
    async fn list_standards(&self) -> StorageResult<Vec<Standard>>;

    /// All known agencies.
    async fn list_agencies(&self) -> StorageResult<Vec<Agency>>;
}

// ---------------------------------------------------------------------------
// AssignmentStore
// ---------------------------------------------------------------------------

/// A responsibility edge from a standard to an agency.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Assignment {
    pub standard_id: StandardId,
    pub agency_name: String,
}

impl Assignment {
    pub fn new(standard_id: StandardId, agency_name: impl Into<String>) -> Self {
        Self {
            standard_id,
            agency_name: agency_name.into(),
        }
    }
}

/// Many-to-many relation between standards and agencies.
///
/// Guarantees:
/// - `toggle` is an involution: applying it twice restores `is_assigned`.
/// - No duplicate edges, no empty per-standard entries left behind.
/// - Unknown standard/agency pairs never error; validity is the caller's job.
#[async_trait]
pub trait AssignmentStore: Send + Sync {
    /// Whether `agency_name` is responsible for `standard_id`.
    async fn is_assigned(&self, standard_id: StandardId, agency_name: &str) -> StorageResult<bool>;

    /// Exactly the set of agencies assigned to `standard_id`.
    async fn assigned_agencies(&self, standard_id: StandardId) -> StorageResult<BTreeSet<String>>;

    /// Flip membership of the pair. Returns the membership after the flip.
    async fn toggle(&self, standard_id: StandardId, agency_name: &str) -> StorageResult<bool>;

    /// Every edge in the relation.
    async fn list_assignments(&self) -> StorageResult<Vec<Assignment>>;

    /// Standards the agency is responsible for, ascending by id.
    async fn standards_for(&self, agency_name: &str) -> StorageResult<Vec<StandardId>>;
}

// ---------------------------------------------------------------------------
// SubmissionStore
// ---------------------------------------------------------------------------

/// Unique identifier for an evidence submission
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubmissionId(pub String);

impl SubmissionId {
    /// Generate a new random SubmissionId
    pub fn new() -> Self {
        SubmissionId(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SubmissionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SubmissionId {
    fn from(s: &str) -> Self {
        SubmissionId(s.to_string())
    }
}

/// Kind of evidence carried by a submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Text,
    Pdf,
    Photo,
    Video,
}

impl ContentType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Pdf => "pdf",
            Self::Photo => "photo",
            Self::Video => "video",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(Self::Text),
            "pdf" => Ok(Self::Pdf),
            "photo" => Ok(Self::Photo),
            "video" => Ok(Self::Video),
            other => Err(StorageError::InvalidRecord(format!(
                "unknown content type: {other}"
            ))),
        }
    }
}

/// Review status of a single submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl ReviewStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReviewStatus {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            other => Err(StorageError::InvalidRecord(format!(
                "unknown review status: {other}"
            ))),
        }
    }
}

/// An attached file. Opaque to the compliance core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub name: String,
    /// Size in bytes
    pub size: u64,
    pub mime_type: String,
}

/// Payload for creating a submission; id, status and timestamp are assigned
/// by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSubmission {
    pub standard_id: StandardId,
    pub agency_name: String,
    pub content_type: ContentType,
    #[serde(default)]
    pub files: Vec<Attachment>,
    /// Body of text evidence, or a caption for file evidence
    #[serde(default)]
    pub description: Option<String>,
}

/// A stored evidence submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub id: SubmissionId,
    pub standard_id: StandardId,
    pub agency_name: String,
    pub content_type: ContentType,
    pub status: ReviewStatus,
    pub submitted_at: DateTime<Utc>,
    pub files: Vec<Attachment>,
    pub description: Option<String>,
}

impl Submission {
    /// Materialise a new submission in `pending` state.
    pub fn from_new(new: NewSubmission, now: DateTime<Utc>) -> Self {
        Self {
            id: SubmissionId::new(),
            standard_id: new.standard_id,
            agency_name: new.agency_name,
            content_type: new.content_type,
            status: ReviewStatus::Pending,
            submitted_at: now,
            files: new.files,
            description: new.description,
        }
    }
}

/// Evidence submission store.
///
/// Guarantees:
/// - `add` assigns a fresh unique id, status `Pending`, `submitted_at = now`.
/// - `set_status` is the only mutation path for review outcomes and accepts
///   every status from every status (last write wins).
/// - `by_standard` returns submissions in submission order.
#[async_trait]
pub trait SubmissionStore: Send + Sync {
    /// Store a new submission and return its id.
    async fn add(&self, submission: NewSubmission) -> StorageResult<SubmissionId>;

    /// Retrieve one submission. `SubmissionNotFound` if absent.
    async fn get(&self, id: &SubmissionId) -> StorageResult<Submission>;

    /// All submissions for a standard, regardless of agency.
    async fn by_standard(&self, standard_id: StandardId) -> StorageResult<Vec<Submission>>;

    /// All submissions made by an agency.
    async fn by_agency(&self, agency_name: &str) -> StorageResult<Vec<Submission>>;

    /// List submissions, optionally filtered by standard.
    async fn list_submissions(
        &self,
        standard_id: Option<StandardId>,
    ) -> StorageResult<Vec<Submission>>;

    /// Overwrite the review status. `SubmissionNotFound` if absent.
    async fn set_status(&self, id: &SubmissionId, status: ReviewStatus) -> StorageResult<()>;

    /// Remove a submission. `SubmissionNotFound` if absent.
    async fn withdraw(&self, id: &SubmissionId) -> StorageResult<()>;
}
