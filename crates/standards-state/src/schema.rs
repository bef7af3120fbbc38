//! Schema definitions for the compliance SurrealDB tables
//!
//! Tables:
//! - assignments: standard -> agency responsibility edges
//! - submissions: evidence submissions with their review status

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::storage_traits::{
    Assignment, Attachment, NewSubmission, StandardId, StorageResult, Submission, SubmissionId,
};

/// Module for serializing chrono DateTime to SurrealDB datetime format
pub(crate) mod surreal_datetime {
    use chrono::{DateTime, Utc};
    use serde::{self, Deserialize, Deserializer, Serializer};
    use surrealdb::sql::Datetime as SurrealDatetime;

    pub fn serialize<S>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let sd = SurrealDatetime::from(*date);
        serde::Serialize::serialize(&sd, serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let sd = SurrealDatetime::deserialize(deserializer)?;
        Ok(DateTime::from(sd))
    }
}

/// Module for serializing optional chrono DateTime to SurrealDB datetime format
pub(crate) mod surreal_datetime_opt {
    use chrono::{DateTime, Utc};
    use serde::{self, Deserialize, Deserializer, Serializer};
    use surrealdb::sql::Datetime as SurrealDatetime;

    pub fn serialize<S>(date: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(d) => {
                let sd = SurrealDatetime::from(*d);
                serde::Serialize::serialize(&Some(sd), serializer)
            }
            None => serde::Serialize::serialize(&None::<SurrealDatetime>, serializer),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let sd = Option::<SurrealDatetime>::deserialize(deserializer)?;
        Ok(sd.map(DateTime::from))
    }
}

// ---------------------------------------------------------------------------
// Assignment rows
// ---------------------------------------------------------------------------

/// Assignment row - one responsibility edge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentRow {
    /// SurrealDB record ID
    pub id: Option<surrealdb::sql::Thing>,
    pub standard_id: StandardId,
    pub agency_name: String,
    /// When the edge was created
    #[serde(with = "surreal_datetime")]
    pub created_at: DateTime<Utc>,
}

impl AssignmentRow {
    pub fn new(standard_id: StandardId, agency_name: String) -> Self {
        AssignmentRow {
            id: None,
            standard_id,
            agency_name,
            created_at: Utc::now(),
        }
    }
}

impl From<AssignmentRow> for Assignment {
    fn from(row: AssignmentRow) -> Self {
        Assignment {
            standard_id: row.standard_id,
            agency_name: row.agency_name,
        }
    }
}

// ---------------------------------------------------------------------------
// Submission rows
// ---------------------------------------------------------------------------

/// Attachment metadata as stored inside a submission row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentRow {
    pub name: String,
    pub size: u64,
    pub mime_type: String,
}

impl From<Attachment> for AttachmentRow {
    fn from(a: Attachment) -> Self {
        AttachmentRow {
            name: a.name,
            size: a.size,
            mime_type: a.mime_type,
        }
    }
}

impl From<AttachmentRow> for Attachment {
    fn from(a: AttachmentRow) -> Self {
        Attachment {
            name: a.name,
            size: a.size,
            mime_type: a.mime_type,
        }
    }
}

static LAST_SEQUENCE: AtomicI64 = AtomicI64::new(0);

/// Next submission sequence number: the current time in nanoseconds, bumped
/// past the previous value so rows created in the same instant still sort in
/// creation order.
pub(crate) fn next_sequence(now: DateTime<Utc>) -> i64 {
    let candidate = now
        .timestamp_nanos_opt()
        .unwrap_or_else(|| now.timestamp_micros().saturating_mul(1_000));
    let mut last = LAST_SEQUENCE.load(Ordering::Relaxed);
    loop {
        let next = candidate.max(last.saturating_add(1));
        match LAST_SEQUENCE.compare_exchange_weak(last, next, Ordering::Relaxed, Ordering::Relaxed)
        {
            Ok(_) => return next,
            Err(current) => last = current,
        }
    }
}

/// Submission row - one piece of evidence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionRow {
    /// SurrealDB record ID
    pub id: Option<surrealdb::sql::Thing>,
    /// Unique submission ID (UUID string)
    pub submission_id: String,
    pub standard_id: StandardId,
    pub agency_name: String,
    /// "text" | "pdf" | "photo" | "video"
    pub content_type: String,
    /// "pending" | "approved" | "rejected"
    pub status: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub files: Vec<AttachmentRow>,
    #[serde(with = "surreal_datetime")]
    pub submitted_at: DateTime<Utc>,
    /// Creation order; ties on `submitted_at` are broken by this column
    #[serde(default)]
    pub seq: i64,
    /// Last time a reviewer changed the status
    #[serde(default, with = "surreal_datetime_opt")]
    pub reviewed_at: Option<DateTime<Utc>>,
}

impl SubmissionRow {
    /// Create a new row in "pending" state
    pub fn new(submission_id: String, new: NewSubmission) -> Self {
        let submitted_at = Utc::now();
        SubmissionRow {
            id: None,
            submission_id,
            standard_id: new.standard_id,
            agency_name: new.agency_name,
            content_type: new.content_type.as_str().to_string(),
            status: "pending".to_string(),
            description: new.description,
            files: new.files.into_iter().map(AttachmentRow::from).collect(),
            submitted_at,
            seq: next_sequence(submitted_at),
            reviewed_at: None,
        }
    }

    /// Convert back into the storage-trait type, validating enum columns.
    pub fn into_submission(self) -> StorageResult<Submission> {
        Ok(Submission {
            id: SubmissionId(self.submission_id),
            standard_id: self.standard_id,
            agency_name: self.agency_name,
            content_type: self.content_type.parse()?,
            status: self.status.parse()?,
            submitted_at: self.submitted_at,
            files: self.files.into_iter().map(Attachment::from).collect(),
            description: self.description,
        })
    }
}
