//! In-memory implementations of the storage traits
//!
//! Provides `MemoryCatalogSource`, `MemoryAssignmentStore`, and
//! `MemorySubmissionStore`. They satisfy the trait contracts without any
//! external dependencies and back both the test suites and embedded use.

use std::collections::BTreeSet;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;

use crate::assignment_map::AssignmentMap;
use crate::error::StorageError;
use crate::storage_traits::*;

fn lock<T>(mutex: &Mutex<T>) -> StorageResult<MutexGuard<'_, T>> {
    mutex
        .lock()
        .map_err(|_| StorageError::Backend("in-memory store lock poisoned".to_string()))
}

// ---------------------------------------------------------------------------
// MemoryCatalogSource
// ---------------------------------------------------------------------------

/// Fixed reference data held in memory.
#[derive(Debug, Default, Clone)]
pub struct MemoryCatalogSource {
    standards: Vec<Standard>,
    agencies: Vec<Agency>,
}

impl MemoryCatalogSource {
    pub fn new(standards: Vec<Standard>, agencies: Vec<Agency>) -> Self {
        Self {
            standards,
            agencies,
        }
    }
}

#[async_trait]
impl CatalogSource for MemoryCatalogSource {
    async fn list_standards(&self) -> StorageResult<Vec<Standard>> {
        Ok(self.standards.clone())
    }

    async fn list_agencies(&self) -> StorageResult<Vec<Agency>> {
        Ok(self.agencies.clone())
    }
}

// ---------------------------------------------------------------------------
// MemoryAssignmentStore
// ---------------------------------------------------------------------------

/// In-memory assignment store backed by an [`AssignmentMap`].
#[derive(Debug, Default)]
pub struct MemoryAssignmentStore {
    map: Mutex<AssignmentMap>,
}

impl MemoryAssignmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with an initial set of edges. Duplicates collapse.
    pub fn with_assignments(assignments: impl IntoIterator<Item = Assignment>) -> Self {
        Self {
            map: Mutex::new(assignments.into_iter().collect()),
        }
    }
}

#[async_trait]
impl AssignmentStore for MemoryAssignmentStore {
    async fn is_assigned(&self, standard_id: StandardId, agency_name: &str) -> StorageResult<bool> {
        Ok(lock(&self.map)?.is_assigned(standard_id, agency_name))
    }

    async fn assigned_agencies(&self, standard_id: StandardId) -> StorageResult<BTreeSet<String>> {
        Ok(lock(&self.map)?.assigned_agencies(standard_id))
    }

    async fn toggle(&self, standard_id: StandardId, agency_name: &str) -> StorageResult<bool> {
        Ok(lock(&self.map)?.toggle(standard_id, agency_name))
    }

    async fn list_assignments(&self) -> StorageResult<Vec<Assignment>> {
        Ok(lock(&self.map)?.assignments())
    }

    async fn standards_for(&self, agency_name: &str) -> StorageResult<Vec<StandardId>> {
        Ok(lock(&self.map)?.standards_for(agency_name))
    }
}

// ---------------------------------------------------------------------------
// MemorySubmissionStore
// ---------------------------------------------------------------------------

/// In-memory submission store backed by an insertion-ordered `Vec`.
#[derive(Debug, Default)]
pub struct MemorySubmissionStore {
    submissions: Mutex<Vec<Submission>>,
}

impl MemorySubmissionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn not_found(id: &SubmissionId) -> StorageError {
    StorageError::SubmissionNotFound {
        submission_id: id.0.clone(),
    }
}

#[async_trait]
impl SubmissionStore for MemorySubmissionStore {
    async fn add(&self, submission: NewSubmission) -> StorageResult<SubmissionId> {
        let record = Submission::from_new(submission, Utc::now());
        let id = record.id.clone();
        lock(&self.submissions)?.push(record);
        Ok(id)
    }

    async fn get(&self, id: &SubmissionId) -> StorageResult<Submission> {
        let submissions = lock(&self.submissions)?;
        submissions
            .iter()
            .find(|s| &s.id == id)
            .cloned()
            .ok_or_else(|| not_found(id))
    }

    async fn by_standard(&self, standard_id: StandardId) -> StorageResult<Vec<Submission>> {
        self.list_submissions(Some(standard_id)).await
    }

    async fn by_agency(&self, agency_name: &str) -> StorageResult<Vec<Submission>> {
        let submissions = lock(&self.submissions)?;
        Ok(submissions
            .iter()
            .filter(|s| s.agency_name == agency_name)
            .cloned()
            .collect())
    }

    async fn list_submissions(
        &self,
        standard_id: Option<StandardId>,
    ) -> StorageResult<Vec<Submission>> {
        let submissions = lock(&self.submissions)?;
        Ok(submissions
            .iter()
            .filter(|s| standard_id.map(|id| s.standard_id == id).unwrap_or(true))
            .cloned()
            .collect())
    }

    async fn set_status(&self, id: &SubmissionId, status: ReviewStatus) -> StorageResult<()> {
        let mut submissions = lock(&self.submissions)?;
        let record = submissions
            .iter_mut()
            .find(|s| &s.id == id)
            .ok_or_else(|| not_found(id))?;
        record.status = status;
        Ok(())
    }

    async fn withdraw(&self, id: &SubmissionId) -> StorageResult<()> {
        let mut submissions = lock(&self.submissions)?;
        let idx = submissions
            .iter()
            .position(|s| &s.id == id)
            .ok_or_else(|| not_found(id))?;
        submissions.remove(idx);
        Ok(())
    }
}
