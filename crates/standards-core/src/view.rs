//! Dashboard-facing shapes built from a standard, its assignments and its
//! submissions.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use standards_state::{Standard, StandardId, Submission};

use crate::aggregator::{
    agency_participation, derive_status, AgencySubmissionStatus, ComplianceStatus, ReviewCounts,
};

/// One standard with everything a dashboard renders for it.
///
/// Serialises as `{ id, text, requirements, assigned_agencies,
/// derived_status, progress_percent, per_agency_status, counts }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandardView {
    #[serde(flatten)]
    pub standard: Standard,
    pub assigned_agencies: BTreeSet<String>,
    pub derived_status: ComplianceStatus,
    pub progress_percent: u8,
    pub per_agency_status: BTreeMap<String, AgencySubmissionStatus>,
    pub counts: ReviewCounts,
}

impl StandardView {
    /// `submissions` must be every submission for `standard`, from any agency.
    pub fn derive(
        standard: Standard,
        assigned_agencies: BTreeSet<String>,
        submissions: &[Submission],
    ) -> Self {
        let derived = derive_status(submissions);
        let per_agency_status = agency_participation(&assigned_agencies, submissions);
        Self {
            standard,
            assigned_agencies,
            derived_status: derived.status,
            progress_percent: derived.progress_percent,
            per_agency_status,
            counts: derived.counts,
        }
    }

    pub fn id(&self) -> StandardId {
        self.standard.id
    }
}

/// Summary counters across the catalogue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSummary {
    pub total: usize,
    pub didnt_submit: usize,
    pub pending_approval: usize,
    pub approved: usize,
    pub rejected: usize,
}

impl StatusSummary {
    pub fn from_views<'a>(views: impl IntoIterator<Item = &'a StandardView>) -> Self {
        views.into_iter().fold(Self::default(), |mut acc, v| {
            acc.total += 1;
            match v.derived_status {
                ComplianceStatus::DidntSubmit => acc.didnt_submit += 1,
                ComplianceStatus::PendingApproval => acc.pending_approval += 1,
                ComplianceStatus::Approved => acc.approved += 1,
                ComplianceStatus::Rejected => acc.rejected += 1,
            }
            acc
        })
    }

    pub fn count(&self, status: ComplianceStatus) -> usize {
        match status {
            ComplianceStatus::DidntSubmit => self.didnt_submit,
            ComplianceStatus::PendingApproval => self.pending_approval,
            ComplianceStatus::Approved => self.approved,
            ComplianceStatus::Rejected => self.rejected,
        }
    }
}

/// One row of an agency's own dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgencyStandardEntry {
    pub standard_id: StandardId,
    pub text: String,
    pub derived_status: ComplianceStatus,
    pub progress_percent: u8,
    pub agency_status: AgencySubmissionStatus,
}

/// The standards an agency is responsible for, in catalogue order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgencyDashboard {
    pub agency: String,
    pub standards: Vec<AgencyStandardEntry>,
    pub summary: StatusSummary,
}

impl AgencyDashboard {
    /// Build from all standard views; keeps only those assigned to `agency`.
    pub fn from_views<'a>(
        agency: &str,
        views: impl IntoIterator<Item = &'a StandardView>,
    ) -> Self {
        let assigned: Vec<&StandardView> = views
            .into_iter()
            .filter(|v| v.assigned_agencies.contains(agency))
            .collect();

        let standards = assigned
            .iter()
            .map(|v| AgencyStandardEntry {
                standard_id: v.id(),
                text: v.standard.text.clone(),
                derived_status: v.derived_status,
                progress_percent: v.progress_percent,
                agency_status: v
                    .per_agency_status
                    .get(agency)
                    .copied()
                    .unwrap_or(AgencySubmissionStatus::NotSubmitted),
            })
            .collect();

        Self {
            agency: agency.to_string(),
            standards,
            summary: StatusSummary::from_views(assigned.iter().copied()),
        }
    }
}
