//! Status aggregation: one standard's submissions -> one compliance status.
//!
//! Aggregation is strict AND over every submission for the standard,
//! regardless of which agency made it:
//!
//! ```text
//! no submissions            -> didnt_submit      0%
//! all approved              -> approved        100%
//! all rejected              -> rejected          0%
//! anything else             -> pending_approval  round(100 * approved / total)
//! ```
//!
//! Every consumer (lists, detail views, summary counters, agency dashboards)
//! goes through [`derive_status`]; nothing else does this arithmetic.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use standards_state::{ReviewStatus, Submission};

use crate::error::ComplianceError;

/// Standard-level compliance label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceStatus {
    DidntSubmit,
    PendingApproval,
    Approved,
    Rejected,
}

impl ComplianceStatus {
    pub const ALL: [ComplianceStatus; 4] = [
        Self::DidntSubmit,
        Self::PendingApproval,
        Self::Approved,
        Self::Rejected,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::DidntSubmit => "didnt_submit",
            Self::PendingApproval => "pending_approval",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ComplianceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComplianceStatus {
    type Err = ComplianceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ComplianceError::Parse {
                kind: "compliance status",
                value: s.to_string(),
            })
    }
}

/// Review outcome counts over a standard's submissions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewCounts {
    pub total: usize,
    pub approved: usize,
    pub rejected: usize,
    pub pending: usize,
}

impl ReviewCounts {
    pub fn tally<'a>(submissions: impl IntoIterator<Item = &'a Submission>) -> Self {
        submissions
            .into_iter()
            .fold(Self::default(), |mut counts, s| {
                counts.total += 1;
                match s.status {
                    ReviewStatus::Approved => counts.approved += 1,
                    ReviewStatus::Rejected => counts.rejected += 1,
                    ReviewStatus::Pending => counts.pending += 1,
                }
                counts
            })
    }
}

/// Derived status of one standard. Computed on demand, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandardComplianceStatus {
    pub status: ComplianceStatus,
    /// 0..=100
    pub progress_percent: u8,
    pub counts: ReviewCounts,
}

impl StandardComplianceStatus {
    pub fn from_counts(counts: ReviewCounts) -> Self {
        let (status, progress_percent) = if counts.total == 0 {
            (ComplianceStatus::DidntSubmit, 0)
        } else if counts.approved == counts.total {
            (ComplianceStatus::Approved, 100)
        } else if counts.rejected == counts.total {
            (ComplianceStatus::Rejected, 0)
        } else {
            (
                ComplianceStatus::PendingApproval,
                rounded_percent(counts.approved, counts.total),
            )
        };
        Self {
            status,
            progress_percent,
            counts,
        }
    }
}

/// `round(100 * part / whole)` with halves rounding up. `whole` must be > 0.
fn rounded_percent(part: usize, whole: usize) -> u8 {
    let pct = (200 * part + whole) / (2 * whole);
    pct.min(100) as u8
}

/// Derive the standard-level status from all of a standard's submissions.
///
/// Submissions from agencies that are not assigned to the standard count
/// like any other.
pub fn derive_status(submissions: &[Submission]) -> StandardComplianceStatus {
    StandardComplianceStatus::from_counts(ReviewCounts::tally(submissions))
}

/// Whether an assigned agency has provided any evidence for a standard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgencySubmissionStatus {
    Submitted,
    NotSubmitted,
}

/// Per-agency participation for one standard, keyed by assigned agency.
///
/// Only agencies in `assigned` get an entry; submissions from anyone else
/// are ignored here. Review outcome does not matter, only presence.
pub fn agency_participation(
    assigned: &BTreeSet<String>,
    submissions: &[Submission],
) -> BTreeMap<String, AgencySubmissionStatus> {
    assigned
        .iter()
        .map(|agency| {
            let status = if submissions.iter().any(|s| &s.agency_name == agency) {
                AgencySubmissionStatus::Submitted
            } else {
                AgencySubmissionStatus::NotSubmitted
            };
            (agency.clone(), status)
        })
        .collect()
}
