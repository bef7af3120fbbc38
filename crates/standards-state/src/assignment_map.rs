//! Value-level assignment relation.
//!
//! `AssignmentMap` is the plain data structure behind the in-memory
//! `AssignmentStore`, and the read snapshot the compliance core builds from
//! any store's `list_assignments()`.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::storage_traits::{Assignment, StandardId};

/// Many-to-many relation standard -> agencies.
///
/// Invariant: no standard maps to an empty set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentMap {
    edges: BTreeMap<StandardId, BTreeSet<String>>,
}

impl AssignmentMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_assigned(&self, standard_id: StandardId, agency_name: &str) -> bool {
        self.edges
            .get(&standard_id)
            .map(|set| set.contains(agency_name))
            .unwrap_or(false)
    }

    /// Agencies assigned to `standard_id`; empty for unknown ids.
    pub fn assigned_agencies(&self, standard_id: StandardId) -> BTreeSet<String> {
        self.edges.get(&standard_id).cloned().unwrap_or_default()
    }

    /// Flip membership of the pair and return the membership afterwards.
    pub fn toggle(&mut self, standard_id: StandardId, agency_name: &str) -> bool {
        let set = self.edges.entry(standard_id).or_default();
        let assigned = if set.remove(agency_name) {
            false
        } else {
            set.insert(agency_name.to_string());
            true
        };
        if set.is_empty() {
            self.edges.remove(&standard_id);
        }
        assigned
    }

    /// Standards the agency is responsible for, ascending.
    pub fn standards_for(&self, agency_name: &str) -> Vec<StandardId> {
        self.edges
            .iter()
            .filter(|(_, agencies)| agencies.contains(agency_name))
            .map(|(id, _)| *id)
            .collect()
    }

    pub fn assignments(&self) -> Vec<Assignment> {
        self.edges
            .iter()
            .flat_map(|(id, agencies)| agencies.iter().map(|name| Assignment::new(*id, name)))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

impl FromIterator<Assignment> for AssignmentMap {
    /// Duplicate edges collapse into one.
    fn from_iter<I: IntoIterator<Item = Assignment>>(iter: I) -> Self {
        let mut edges: BTreeMap<StandardId, BTreeSet<String>> = BTreeMap::new();
        for a in iter {
            edges.entry(a.standard_id).or_default().insert(a.agency_name);
        }
        Self { edges }
    }
}
