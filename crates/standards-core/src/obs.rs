//! Structured observability hooks for compliance events.
//!
//! This module provides:
//! - Query-scoped tracing spans via the `QuerySpan` RAII guard
//! - Emission functions for write events: submission added, review applied,
//!   assignment toggled, submission withdrawn
//!
//! Events are emitted at `info!` level with a stable `event` field. Orphan
//! submissions are reported at `debug!`: they are expected, not faults.

use standards_state::{StandardId, SubmissionId};
use tracing::{debug, info};

use crate::query::ComplianceQuery;
use crate::review::ReviewOutcome;

/// RAII guard that enters a query-scoped span.
///
/// ```ignore
/// let _span = QuerySpan::enter(&query);
/// // every tracing call in scope carries term/agency/status
/// ```
pub struct QuerySpan {
    _span: tracing::span::EnteredSpan,
}

impl QuerySpan {
    pub fn enter(query: &ComplianceQuery) -> Self {
        let span = tracing::info_span!(
            "standards.query",
            term = %query.term.as_str(),
            agency = ?query.agency,
            status = %query.status,
        );
        Self {
            _span: span.entered(),
        }
    }
}

pub fn emit_submission_added(id: &SubmissionId, standard_id: StandardId, agency: &str) {
    info!(
        event = "submission.added",
        submission_id = %id,
        standard_id = standard_id,
        agency = %agency,
    );
}

/// A submission arrived from an agency that is not assigned to the standard.
pub fn emit_orphan_submission(id: &SubmissionId, standard_id: StandardId, agency: &str) {
    debug!(
        event = "submission.unassigned_agency",
        submission_id = %id,
        standard_id = standard_id,
        agency = %agency,
    );
}

pub fn emit_review_applied(outcome: &ReviewOutcome) {
    info!(
        event = "review.applied",
        submission_id = %outcome.submission_id,
        standard_id = outcome.standard_id,
        action = %outcome.action,
        from = %outcome.from,
        to = %outcome.to,
    );
}

pub fn emit_assignment_toggled(standard_id: StandardId, agency: &str, assigned: bool) {
    info!(
        event = "assignment.toggled",
        standard_id = standard_id,
        agency = %agency,
        assigned = assigned,
    );
}

pub fn emit_submission_withdrawn(id: &SubmissionId) {
    info!(event = "submission.withdrawn", submission_id = %id);
}

/// Emitted once per query with the number of matching standards.
pub fn emit_query_evaluated(matched: usize, total: usize) {
    debug!(event = "query.evaluated", matched = matched, total = total);
}
