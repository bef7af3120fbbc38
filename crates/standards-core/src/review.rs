//! Review workflow for individual submissions.
//!
//! ```text
//! pending   --approve-->   approved
//! pending   --reject-->    rejected
//! approved  --reject-->    rejected
//! rejected  --approve-->   approved
//! approved  --unapprove--> pending
//! toggle:   approved <-> rejected, pending -> approved
//! ```
//!
//! There is no terminal state and no illegal transition: every action is
//! accepted from every status, so a submission can be re-reviewed forever.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use standards_state::{ReviewStatus, StandardId, StorageResult, SubmissionId, SubmissionStore};

use crate::error::ComplianceError;
use crate::obs::emit_review_applied;

/// A reviewer action on one submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewAction {
    Approve,
    Reject,
    /// Reset to pending.
    Unapprove,
    /// Single-click switch: pending counts as the undecided side and resolves
    /// to approved.
    Toggle,
}

impl ReviewAction {
    /// The status a submission ends up in after this action.
    pub fn apply(self, current: ReviewStatus) -> ReviewStatus {
        match (self, current) {
            (Self::Approve, _) => ReviewStatus::Approved,
            (Self::Reject, _) => ReviewStatus::Rejected,
            (Self::Unapprove, _) => ReviewStatus::Pending,
            (Self::Toggle, ReviewStatus::Approved) => ReviewStatus::Rejected,
            (Self::Toggle, ReviewStatus::Rejected | ReviewStatus::Pending) => {
                ReviewStatus::Approved
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Reject => "reject",
            Self::Unapprove => "unapprove",
            Self::Toggle => "toggle",
        }
    }
}

impl fmt::Display for ReviewAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReviewAction {
    type Err = ComplianceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "approve" => Ok(Self::Approve),
            "reject" => Ok(Self::Reject),
            "unapprove" | "reset" => Ok(Self::Unapprove),
            "toggle" => Ok(Self::Toggle),
            other => Err(ComplianceError::Parse {
                kind: "review action",
                value: other.to_string(),
            }),
        }
    }
}

/// Record of one applied review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewOutcome {
    pub submission_id: SubmissionId,
    pub standard_id: StandardId,
    pub action: ReviewAction,
    pub from: ReviewStatus,
    pub to: ReviewStatus,
    pub reviewed_at: DateTime<Utc>,
}

impl ReviewOutcome {
    pub fn changed(&self) -> bool {
        self.from != self.to
    }
}

/// Apply `action` to a stored submission. Last write wins.
pub async fn review_submission(
    store: &dyn SubmissionStore,
    id: &SubmissionId,
    action: ReviewAction,
) -> StorageResult<ReviewOutcome> {
    let current = store.get(id).await?;
    let next = action.apply(current.status);
    store.set_status(id, next).await?;

    let outcome = ReviewOutcome {
        submission_id: id.clone(),
        standard_id: current.standard_id,
        action,
        from: current.status,
        to: next,
        reviewed_at: Utc::now(),
    };
    emit_review_applied(&outcome);
    Ok(outcome)
}
