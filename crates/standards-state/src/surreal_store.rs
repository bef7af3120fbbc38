//! SurrealDB-backed AssignmentStore and SubmissionStore
//!
//! Uses `schema::AssignmentRow` and `schema::SubmissionRow` for persistence,
//! converting to/from `storage_traits` types at the boundary.

use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::Utc;
use surrealdb::engine::any::Any;
use surrealdb::sql::Datetime as SurrealDatetime;
use surrealdb::Surreal;
use tracing::{debug, info};

use crate::error::StorageError;
use crate::handle;
use crate::schema::{AssignmentRow, SubmissionRow};
use crate::storage_traits::{
    Assignment, AssignmentStore, NewSubmission, ReviewStatus, StandardId, StorageResult,
    Submission, SubmissionId, SubmissionStore,
};

/// SurrealDB implementation of [`AssignmentStore`] and [`SubmissionStore`].
#[derive(Clone)]
pub struct SurrealComplianceStore {
    db: Surreal<Any>,
}

impl SurrealComplianceStore {
    /// Wrap an already migrated connection.
    pub fn new(db: Surreal<Any>) -> Self {
        Self { db }
    }

    /// Create an in-memory instance (connects to `mem://`).
    pub async fn in_memory() -> crate::Result<Self> {
        let db = handle::connect_url("mem://").await?;
        info!("SurrealComplianceStore connected (in-memory)");
        Ok(Self { db })
    }

    /// Create from environment variables; see [`handle::connect_from_env`].
    pub async fn from_env() -> crate::Result<Self> {
        let db = handle::connect_from_env().await?;
        info!("SurrealComplianceStore connected");
        Ok(Self { db })
    }

    // -- private helpers -----------------------------------------------------

    async fn fetch_submissions(
        &self,
        sql: &str,
        bindings: Vec<(&'static str, serde_json::Value)>,
    ) -> StorageResult<Vec<Submission>> {
        let mut query = self.db.query(sql.to_string());
        for binding in bindings {
            query = query.bind(binding);
        }
        let mut res = query.await?;
        let rows: Vec<SubmissionRow> = res.take(0)?;
        rows.into_iter().map(SubmissionRow::into_submission).collect()
    }

    async fn fetch_assignments(
        &self,
        sql: &str,
        bindings: Vec<(&'static str, serde_json::Value)>,
    ) -> StorageResult<Vec<AssignmentRow>> {
        let mut query = self.db.query(sql.to_string());
        for binding in bindings {
            query = query.bind(binding);
        }
        let mut res = query.await?;
        Ok(res.take(0)?)
    }
}

/// Delete-or-create in one transaction. The final statement yields whether
/// the pair is assigned afterwards.
const TOGGLE_ASSIGNMENT: &str = r#"
    BEGIN TRANSACTION;
    LET $removed = (
        DELETE assignments WHERE standard_id = $sid AND agency_name = $agency RETURN BEFORE
    );
    IF array::len($removed) == 0 {
        CREATE assignments CONTENT {
            standard_id: $sid,
            agency_name: $agency,
            created_at: time::now()
        };
    };
    array::len($removed) == 0;
    COMMIT TRANSACTION;
"#;

fn not_found(id: &SubmissionId) -> StorageError {
    StorageError::SubmissionNotFound {
        submission_id: id.0.clone(),
    }
}

#[async_trait]
impl AssignmentStore for SurrealComplianceStore {
    async fn is_assigned(&self, standard_id: StandardId, agency_name: &str) -> StorageResult<bool> {
        let rows = self
            .fetch_assignments(
                "SELECT * FROM assignments WHERE standard_id = $sid AND agency_name = $agency LIMIT 1",
                vec![("sid", standard_id.into()), ("agency", agency_name.into())],
            )
            .await?;
        Ok(!rows.is_empty())
    }

    async fn assigned_agencies(&self, standard_id: StandardId) -> StorageResult<BTreeSet<String>> {
        let rows = self
            .fetch_assignments(
                "SELECT * FROM assignments WHERE standard_id = $sid",
                vec![("sid", standard_id.into())],
            )
            .await?;
        Ok(rows.into_iter().map(|r| r.agency_name).collect())
    }

    async fn toggle(&self, standard_id: StandardId, agency_name: &str) -> StorageResult<bool> {
        let mut res = self
            .db
            .query(TOGGLE_ASSIGNMENT)
            .bind(("sid", standard_id))
            .bind(("agency", agency_name.to_string()))
            .await?
            .check()?;
        let last = res.num_statements().saturating_sub(1);
        let assigned: Option<bool> = res.take(last)?;
        let assigned = assigned.ok_or_else(|| {
            StorageError::Backend("assignment toggle returned no result".to_string())
        })?;
        debug!(standard_id, agency = %agency_name, assigned, "assignment toggled");
        Ok(assigned)
    }

    async fn list_assignments(&self) -> StorageResult<Vec<Assignment>> {
        let rows = self
            .fetch_assignments(
                "SELECT * FROM assignments ORDER BY standard_id ASC, agency_name ASC",
                Vec::new(),
            )
            .await?;
        Ok(rows.into_iter().map(Assignment::from).collect())
    }

    async fn standards_for(&self, agency_name: &str) -> StorageResult<Vec<StandardId>> {
        let rows = self
            .fetch_assignments(
                "SELECT * FROM assignments WHERE agency_name = $agency ORDER BY standard_id ASC",
                vec![("agency", agency_name.into())],
            )
            .await?;
        Ok(rows.into_iter().map(|r| r.standard_id).collect())
    }
}

#[async_trait]
impl SubmissionStore for SurrealComplianceStore {
    async fn add(&self, submission: NewSubmission) -> StorageResult<SubmissionId> {
        let id = SubmissionId::new();
        let row = SubmissionRow::new(id.0.clone(), submission);

        debug!(submission_id = %id, standard_id = row.standard_id, "creating submission");

        let _created: Option<SubmissionRow> =
            self.db.create("submissions").content(row).await?;
        Ok(id)
    }

    async fn get(&self, id: &SubmissionId) -> StorageResult<Submission> {
        self.fetch_submissions(
            "SELECT * FROM submissions WHERE submission_id = $sid",
            vec![("sid", id.0.clone().into())],
        )
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| not_found(id))
    }

    async fn by_standard(&self, standard_id: StandardId) -> StorageResult<Vec<Submission>> {
        self.list_submissions(Some(standard_id)).await
    }

    async fn by_agency(&self, agency_name: &str) -> StorageResult<Vec<Submission>> {
        self.fetch_submissions(
            "SELECT * FROM submissions WHERE agency_name = $agency ORDER BY seq ASC",
            vec![("agency", agency_name.into())],
        )
        .await
    }

    async fn list_submissions(
        &self,
        standard_id: Option<StandardId>,
    ) -> StorageResult<Vec<Submission>> {
        match standard_id {
            Some(sid) => {
                self.fetch_submissions(
                    "SELECT * FROM submissions WHERE standard_id = $sid ORDER BY seq ASC",
                    vec![("sid", sid.into())],
                )
                .await
            }
            None => {
                self.fetch_submissions(
                    "SELECT * FROM submissions ORDER BY seq ASC",
                    Vec::new(),
                )
                .await
            }
        }
    }

    async fn set_status(&self, id: &SubmissionId, status: ReviewStatus) -> StorageResult<()> {
        let mut res = self
            .db
            .query(
                "UPDATE submissions SET status = $status, reviewed_at = $at \
                 WHERE submission_id = $sid RETURN AFTER",
            )
            .bind(("status", status.as_str()))
            .bind(("at", SurrealDatetime::from(Utc::now())))
            .bind(("sid", id.0.clone()))
            .await?;
        let rows: Vec<SubmissionRow> = res.take(0)?;
        if rows.is_empty() {
            return Err(not_found(id));
        }
        Ok(())
    }

    async fn withdraw(&self, id: &SubmissionId) -> StorageResult<()> {
        let mut res = self
            .db
            .query("DELETE submissions WHERE submission_id = $sid RETURN BEFORE")
            .bind(("sid", id.0.clone()))
            .await?;
        let rows: Vec<SubmissionRow> = res.take(0)?;
        if rows.is_empty() {
            return Err(not_found(id));
        }
        Ok(())
    }
}
