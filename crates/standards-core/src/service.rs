//! Compliance service: the catalogue plus injected stores.
//!
//! Reads fetch assignments and submissions fresh and derive every view on
//! the spot; there is no cache to invalidate. Writes go straight to the
//! stores. An unknown standard id on the read side yields "no data", never
//! an error.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use standards_state::{
    AssignmentMap, AssignmentStore, NewSubmission, StandardId, Submission, SubmissionId,
    SubmissionStore,
};
use tracing::debug;

use crate::catalog::StandardCatalog;
use crate::error::{ComplianceError, Result};
use crate::obs::{
    emit_assignment_toggled, emit_orphan_submission, emit_query_evaluated, emit_submission_added,
    emit_submission_withdrawn, QuerySpan,
};
use crate::query::ComplianceQuery;
use crate::review::{review_submission, ReviewAction, ReviewOutcome};
use crate::view::{AgencyDashboard, StandardView, StatusSummary};

/// Entry point for dashboards and operators.
#[derive(Clone)]
pub struct ComplianceService {
    catalog: Arc<StandardCatalog>,
    assignments: Arc<dyn AssignmentStore>,
    submissions: Arc<dyn SubmissionStore>,
}

impl ComplianceService {
    pub fn new(
        catalog: StandardCatalog,
        assignments: Arc<dyn AssignmentStore>,
        submissions: Arc<dyn SubmissionStore>,
    ) -> Self {
        Self {
            catalog: Arc::new(catalog),
            assignments,
            submissions,
        }
    }

    pub fn catalog(&self) -> &StandardCatalog {
        &self.catalog
    }

    // -- reads ---------------------------------------------------------------

    /// Derived view of one standard; `None` for ids outside the catalogue.
    pub async fn standard_view(&self, id: StandardId) -> Result<Option<StandardView>> {
        let Some(standard) = self.catalog.get(id) else {
            debug!(standard_id = id, "standard not in catalogue");
            return Ok(None);
        };
        let assigned = self.assignments.assigned_agencies(id).await?;
        let submissions = self.submissions.by_standard(id).await?;
        Ok(Some(StandardView::derive(
            standard.clone(),
            assigned,
            &submissions,
        )))
    }

    /// Derived views of the whole catalogue, in catalogue order.
    pub async fn views(&self) -> Result<Vec<StandardView>> {
        let map: AssignmentMap = self.assignments.list_assignments().await?.into_iter().collect();

        let mut by_standard: BTreeMap<StandardId, Vec<Submission>> = BTreeMap::new();
        for s in self.submissions.list_submissions(None).await? {
            by_standard.entry(s.standard_id).or_default().push(s);
        }

        Ok(self
            .catalog
            .iter()
            .map(|standard| {
                let subs = by_standard
                    .get(&standard.id)
                    .map(Vec::as_slice)
                    .unwrap_or(&[]);
                StandardView::derive(standard.clone(), map.assigned_agencies(standard.id), subs)
            })
            .collect())
    }

    pub async fn search(&self, query: &ComplianceQuery) -> Result<Vec<StandardView>> {
        let _span = QuerySpan::enter(query);
        let views = self.views().await?;
        let total = views.len();
        let matched = query.apply(views);
        emit_query_evaluated(matched.len(), total);
        Ok(matched)
    }

    pub async fn summary(&self) -> Result<StatusSummary> {
        Ok(StatusSummary::from_views(&self.views().await?))
    }

    pub async fn agency_dashboard(&self, agency: &str) -> Result<AgencyDashboard> {
        Ok(AgencyDashboard::from_views(agency, &self.views().await?))
    }

    /// Submissions for a standard; empty for unknown ids.
    pub async fn submissions_for(&self, id: StandardId) -> Result<Vec<Submission>> {
        if !self.catalog.contains(id) {
            return Ok(Vec::new());
        }
        Ok(self.submissions.by_standard(id).await?)
    }

    pub async fn assigned_agencies(&self, id: StandardId) -> Result<BTreeSet<String>> {
        Ok(self.assignments.assigned_agencies(id).await?)
    }

    // -- writes --------------------------------------------------------------

    /// Validate and store a new submission (status `pending`).
    ///
    /// The standard must exist and the agency name must be non-empty. The
    /// agency does not have to be assigned to the standard.
    pub async fn submit(&self, submission: NewSubmission) -> Result<SubmissionId> {
        if !self.catalog.contains(submission.standard_id) {
            return Err(ComplianceError::UnknownStandard(submission.standard_id));
        }
        if submission.agency_name.trim().is_empty() {
            return Err(ComplianceError::InvalidSubmission(
                "agency name must not be empty".to_string(),
            ));
        }

        let standard_id = submission.standard_id;
        let agency = submission.agency_name.clone();
        let assigned = self.assignments.is_assigned(standard_id, &agency).await?;

        let id = self.submissions.add(submission).await?;
        emit_submission_added(&id, standard_id, &agency);
        if !assigned {
            emit_orphan_submission(&id, standard_id, &agency);
        }
        Ok(id)
    }

    pub async fn review(&self, id: &SubmissionId, action: ReviewAction) -> Result<ReviewOutcome> {
        Ok(review_submission(self.submissions.as_ref(), id, action).await?)
    }

    /// Flip an assignment. Returns whether the agency is assigned afterwards.
    pub async fn toggle_assignment(&self, id: StandardId, agency: &str) -> Result<bool> {
        let assigned = self.assignments.toggle(id, agency).await?;
        emit_assignment_toggled(id, agency, assigned);
        Ok(assigned)
    }

    pub async fn withdraw(&self, id: &SubmissionId) -> Result<()> {
        self.submissions.withdraw(id).await?;
        emit_submission_withdrawn(id);
        Ok(())
    }
}
