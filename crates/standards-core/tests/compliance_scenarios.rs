//! End-to-end compliance scenarios through `ComplianceService` on in-memory
//! stores.

use std::sync::Arc;

use standards_core::{
    AgencyFilter, AgencySubmissionStatus, ComplianceError, ComplianceQuery, ComplianceService,
    ComplianceStatus, ContentType, NewSubmission, ReviewAction, Standard, StandardCatalog,
    StandardId, StatusFilter, SubmissionId,
};
use standards_state::fakes::{MemoryAssignmentStore, MemorySubmissionStore};
use standards_state::Assignment;

fn catalog() -> StandardCatalog {
    let mut standards: Vec<Standard> = (1..=12)
        .map(|id| Standard {
            id,
            text: format!("Standard number {id}"),
            requirements: vec![format!("Evidence for standard {id}")],
        })
        .collect();
    standards[2].text = "Community health education sessions are held monthly".to_string();
    standards[3].text = "تعزيز الصحة في المدارس".to_string();
    standards[4].requirements = vec!["Minutes of the HEALTH committee".to_string()];
    StandardCatalog::new(standards).unwrap()
}

fn service() -> ComplianceService {
    let assignments = MemoryAssignmentStore::with_assignments(vec![
        Assignment::new(3, "Municipality"),
        Assignment::new(3, "Health Directorate"),
        Assignment::new(5, "Municipality"),
        Assignment::new(5, "Police"),
        Assignment::new(7, "Police"),
    ]);
    ComplianceService::new(
        catalog(),
        Arc::new(assignments),
        Arc::new(MemorySubmissionStore::new()),
    )
}

fn evidence(standard_id: StandardId, agency: &str) -> NewSubmission {
    NewSubmission {
        standard_id,
        agency_name: agency.to_string(),
        content_type: ContentType::Text,
        files: Vec::new(),
        description: Some("evidence".to_string()),
    }
}

async fn submit_reviewed(
    svc: &ComplianceService,
    standard_id: StandardId,
    agency: &str,
    action: Option<ReviewAction>,
) -> SubmissionId {
    let id = svc.submit(evidence(standard_id, agency)).await.unwrap();
    if let Some(action) = action {
        svc.review(&id, action).await.unwrap();
    }
    id
}

// ── Aggregation scenarios ──

#[tokio::test]
async fn standard_5_two_approved_one_pending_is_67_percent() {
    let svc = service();
    submit_reviewed(&svc, 5, "Municipality", Some(ReviewAction::Approve)).await;
    submit_reviewed(&svc, 5, "Police", Some(ReviewAction::Approve)).await;
    submit_reviewed(&svc, 5, "Police", None).await;

    let view = svc.standard_view(5).await.unwrap().unwrap();
    assert_eq!(view.derived_status, ComplianceStatus::PendingApproval);
    assert_eq!(view.progress_percent, 67);
}

#[tokio::test]
async fn standard_7_all_rejected() {
    let svc = service();
    submit_reviewed(&svc, 7, "Police", Some(ReviewAction::Reject)).await;
    submit_reviewed(&svc, 7, "Police", Some(ReviewAction::Reject)).await;

    let view = svc.standard_view(7).await.unwrap().unwrap();
    assert_eq!(view.derived_status, ComplianceStatus::Rejected);
    assert_eq!(view.progress_percent, 0);
}

#[tokio::test]
async fn standard_12_without_submissions_didnt_submit() {
    let svc = service();
    let view = svc.standard_view(12).await.unwrap().unwrap();
    assert_eq!(view.derived_status, ComplianceStatus::DidntSubmit);
    assert_eq!(view.progress_percent, 0);
    assert!(view.assigned_agencies.is_empty());
}

#[tokio::test]
async fn all_approved_reaches_100() {
    let svc = service();
    submit_reviewed(&svc, 3, "Municipality", Some(ReviewAction::Approve)).await;
    submit_reviewed(&svc, 3, "Health Directorate", Some(ReviewAction::Toggle)).await;

    let view = svc.standard_view(3).await.unwrap().unwrap();
    assert_eq!(view.derived_status, ComplianceStatus::Approved);
    assert_eq!(view.progress_percent, 100);
}

#[tokio::test]
async fn orphan_submission_counts_in_aggregate_but_not_per_agency() {
    let svc = service();
    submit_reviewed(&svc, 3, "Municipality", None).await;
    submit_reviewed(&svc, 3, "X", Some(ReviewAction::Approve)).await;

    let view = svc.standard_view(3).await.unwrap().unwrap();
    assert_eq!(view.counts.total, 2);
    assert_eq!(view.counts.approved, 1);
    assert_eq!(view.progress_percent, 50);
    assert_eq!(view.derived_status, ComplianceStatus::PendingApproval);

    assert!(!view.per_agency_status.contains_key("X"));
    assert_eq!(
        view.per_agency_status["Municipality"],
        AgencySubmissionStatus::Submitted
    );
    assert_eq!(
        view.per_agency_status["Health Directorate"],
        AgencySubmissionStatus::NotSubmitted
    );
}

#[tokio::test]
async fn rereview_moves_status_back_and_forth() {
    let svc = service();
    let id = submit_reviewed(&svc, 7, "Police", Some(ReviewAction::Approve)).await;
    assert_eq!(
        svc.standard_view(7).await.unwrap().unwrap().derived_status,
        ComplianceStatus::Approved
    );

    svc.review(&id, ReviewAction::Reject).await.unwrap();
    assert_eq!(
        svc.standard_view(7).await.unwrap().unwrap().derived_status,
        ComplianceStatus::Rejected
    );

    svc.review(&id, ReviewAction::Unapprove).await.unwrap();
    assert_eq!(
        svc.standard_view(7).await.unwrap().unwrap().derived_status,
        ComplianceStatus::PendingApproval
    );
}

#[tokio::test]
async fn withdraw_rederives_from_remaining() {
    let svc = service();
    submit_reviewed(&svc, 5, "Municipality", Some(ReviewAction::Approve)).await;
    let pending = submit_reviewed(&svc, 5, "Police", None).await;

    svc.withdraw(&pending).await.unwrap();

    let view = svc.standard_view(5).await.unwrap().unwrap();
    assert_eq!(view.derived_status, ComplianceStatus::Approved);
    assert_eq!(view.progress_percent, 100);
    assert_eq!(
        view.per_agency_status["Police"],
        AgencySubmissionStatus::NotSubmitted
    );
}

// ── Not-found and boundary validation ──

#[tokio::test]
async fn unknown_standard_reads_as_no_data() {
    let svc = service();
    assert!(svc.standard_view(999).await.unwrap().is_none());
    assert!(svc.submissions_for(999).await.unwrap().is_empty());
}

#[tokio::test]
async fn submit_rejects_unknown_standard() {
    let svc = service();
    let err = svc.submit(evidence(999, "Police")).await.unwrap_err();
    assert!(matches!(err, ComplianceError::UnknownStandard(999)));
}

#[tokio::test]
async fn submit_rejects_blank_agency() {
    let svc = service();
    let err = svc.submit(evidence(1, "  ")).await.unwrap_err();
    assert!(matches!(err, ComplianceError::InvalidSubmission(_)));
}

#[tokio::test]
async fn review_unknown_submission_is_storage_error() {
    let svc = service();
    let err = svc
        .review(&SubmissionId::from("missing"), ReviewAction::Approve)
        .await
        .unwrap_err();
    assert!(matches!(err, ComplianceError::Storage(_)));
}

// ── Assignments ──

#[tokio::test]
async fn toggle_assignment_twice_restores_state() {
    let svc = service();
    assert!(svc.toggle_assignment(12, "Police").await.unwrap());
    assert!(svc.assigned_agencies(12).await.unwrap().contains("Police"));
    assert!(!svc.toggle_assignment(12, "Police").await.unwrap());
    assert!(svc.assigned_agencies(12).await.unwrap().is_empty());
}

#[tokio::test]
async fn submit_first_assign_later_shows_up_per_agency() {
    let svc = service();
    submit_reviewed(&svc, 3, "X", None).await;
    assert!(!svc
        .standard_view(3)
        .await
        .unwrap()
        .unwrap()
        .per_agency_status
        .contains_key("X"));

    svc.toggle_assignment(3, "X").await.unwrap();
    let view = svc.standard_view(3).await.unwrap().unwrap();
    assert_eq!(view.per_agency_status["X"], AgencySubmissionStatus::Submitted);
}

// ── Search ──

#[tokio::test]
async fn search_arabic_term_without_case_folding() {
    let svc = service();
    let results = svc
        .search(&ComplianceQuery::new().with_term("صحة"))
        .await
        .unwrap();
    let ids: Vec<_> = results.iter().map(|v| v.id()).collect();
    assert_eq!(ids, vec![4]);
}

#[tokio::test]
async fn search_latin_term_case_insensitive_over_text_and_requirements() {
    let svc = service();
    let results = svc
        .search(&ComplianceQuery::new().with_term("HEALTH"))
        .await
        .unwrap();
    let ids: Vec<_> = results.iter().map(|v| v.id()).collect();
    assert_eq!(ids, vec![3, 5]);
}

#[tokio::test]
async fn search_combines_filters_and_keeps_catalogue_order() {
    let svc = service();
    submit_reviewed(&svc, 7, "Police", None).await;
    submit_reviewed(&svc, 5, "Police", None).await;

    let query = ComplianceQuery::new()
        .with_agency(AgencyFilter::Agency("Police".to_string()))
        .with_status(StatusFilter::Status(ComplianceStatus::PendingApproval));
    let ids: Vec<_> = svc
        .search(&query)
        .await
        .unwrap()
        .iter()
        .map(|v| v.id())
        .collect();
    assert_eq!(ids, vec![5, 7]);

    let query = query.with_term("HEALTH");
    let ids: Vec<_> = svc
        .search(&query)
        .await
        .unwrap()
        .iter()
        .map(|v| v.id())
        .collect();
    assert_eq!(ids, vec![5]);
}

#[tokio::test]
async fn search_all_filters_return_whole_catalogue() {
    let svc = service();
    let results = svc.search(&ComplianceQuery::new()).await.unwrap();
    assert_eq!(results.len(), 12);
}

// ── Summaries ──

#[tokio::test]
async fn summary_counters_sum_to_catalogue_size() {
    let svc = service();
    submit_reviewed(&svc, 3, "Municipality", Some(ReviewAction::Approve)).await;
    submit_reviewed(&svc, 7, "Police", Some(ReviewAction::Reject)).await;
    submit_reviewed(&svc, 5, "Police", None).await;

    let summary = svc.summary().await.unwrap();
    assert_eq!(summary.total, 12);
    assert_eq!(summary.approved, 1);
    assert_eq!(summary.rejected, 1);
    assert_eq!(summary.pending_approval, 1);
    assert_eq!(summary.didnt_submit, 9);
    assert_eq!(
        summary.approved + summary.rejected + summary.pending_approval + summary.didnt_submit,
        summary.total
    );
}

#[tokio::test]
async fn agency_dashboard_lists_assigned_standards() {
    let svc = service();
    submit_reviewed(&svc, 7, "Police", None).await;

    let dashboard = svc.agency_dashboard("Police").await.unwrap();
    let ids: Vec<_> = dashboard.standards.iter().map(|e| e.standard_id).collect();
    assert_eq!(ids, vec![5, 7]);
    assert_eq!(
        dashboard.standards[0].agency_status,
        AgencySubmissionStatus::NotSubmitted
    );
    assert_eq!(
        dashboard.standards[1].agency_status,
        AgencySubmissionStatus::Submitted
    );
    assert_eq!(dashboard.summary.total, 2);
}
