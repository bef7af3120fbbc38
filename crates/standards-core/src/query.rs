//! Dashboard search and filtering over derived standard views.
//!
//! A query is the AND of three predicates: free-text, agency, and derived
//! status. Results keep catalogue order.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use standards_state::Standard;

use crate::aggregator::ComplianceStatus;
use crate::error::ComplianceError;
use crate::view::StandardView;

/// Arabic block, U+0600..=U+06FF.
pub fn contains_arabic(s: &str) -> bool {
    s.chars().any(|c| ('\u{0600}'..='\u{06FF}').contains(&c))
}

/// Free-text search term.
///
/// Arabic terms match as a direct substring; anything else matches with both
/// sides lowercased.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchTerm {
    raw: String,
    folded: Option<String>,
}

impl SearchTerm {
    pub fn new(term: impl Into<String>) -> Self {
        let raw = term.into();
        let folded = if contains_arabic(&raw) {
            None
        } else {
            Some(raw.to_lowercase())
        };
        Self { raw, folded }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    fn matches_text(&self, haystack: &str) -> bool {
        match &self.folded {
            Some(needle) => haystack.to_lowercase().contains(needle.as_str()),
            None => haystack.contains(self.raw.as_str()),
        }
    }

    /// Match against the standard's text or any requirement.
    pub fn matches(&self, standard: &Standard) -> bool {
        self.is_empty()
            || self.matches_text(&standard.text)
            || standard.requirements.iter().any(|r| self.matches_text(r))
    }
}

/// `all` or one exact agency name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgencyFilter {
    #[default]
    All,
    Agency(String),
}

impl AgencyFilter {
    pub fn parse(value: &str) -> Self {
        if value == "all" {
            Self::All
        } else {
            Self::Agency(value.to_string())
        }
    }

    pub fn matches(&self, view: &StandardView) -> bool {
        match self {
            Self::All => true,
            Self::Agency(name) => view.assigned_agencies.contains(name),
        }
    }
}

/// `all` or one derived status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    #[default]
    All,
    Status(ComplianceStatus),
}

impl StatusFilter {
    pub fn matches(&self, view: &StandardView) -> bool {
        match self {
            Self::All => true,
            Self::Status(status) => view.derived_status == *status,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = ComplianceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            Ok(Self::All)
        } else {
            Ok(Self::Status(s.parse()?))
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Status(status) => write!(f, "{status}"),
        }
    }
}

/// `search(term, agencyFilter, statusFilter)`.
#[derive(Debug, Clone, Default)]
pub struct ComplianceQuery {
    pub term: SearchTerm,
    pub agency: AgencyFilter,
    pub status: StatusFilter,
}

impl ComplianceQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_term(mut self, term: impl Into<String>) -> Self {
        self.term = SearchTerm::new(term);
        self
    }

    pub fn with_agency(mut self, agency: AgencyFilter) -> Self {
        self.agency = agency;
        self
    }

    pub fn with_status(mut self, status: StatusFilter) -> Self {
        self.status = status;
        self
    }

    pub fn matches(&self, view: &StandardView) -> bool {
        self.term.matches(&view.standard)
            && self.agency.matches(view)
            && self.status.matches(view)
    }

    /// Filter views, keeping their order.
    pub fn apply(&self, views: impl IntoIterator<Item = StandardView>) -> Vec<StandardView> {
        views.into_iter().filter(|v| self.matches(v)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standard(text: &str, requirements: &[&str]) -> Standard {
        Standard {
            id: 1,
            text: text.to_string(),
            requirements: requirements.iter().map(|r| r.to_string()).collect(),
        }
    }

    #[test]
    fn test_detects_arabic() {
        assert!(contains_arabic("صحة"));
        assert!(contains_arabic("school صحة"));
        assert!(!contains_arabic("health"));
    }

    #[test]
    fn test_arabic_term_matches_substring() {
        let term = SearchTerm::new("صحة");
        assert!(term.matches(&standard("تعزيز الصحة في المدارس", &[])));
        assert!(!term.matches(&standard("المياه", &[])));
    }

    #[test]
    fn test_latin_term_is_case_insensitive() {
        let term = SearchTerm::new("HEALTH");
        assert!(term.matches(&standard("Promote health education", &[])));
    }

    #[test]
    fn test_arabic_term_is_not_case_folded() {
        // Mixed-script term: the Latin part must match exactly.
        let term = SearchTerm::new("WHO صحة");
        assert!(!term.matches(&standard("who صحة", &[])));
        assert!(term.matches(&standard("WHO صحة", &[])));
    }

    #[test]
    fn test_term_matches_requirements() {
        let term = SearchTerm::new("lab report");
        assert!(term.matches(&standard("Water quality", &["Monthly LAB REPORT"])));
    }

    #[test]
    fn test_empty_term_matches_everything() {
        assert!(SearchTerm::new("").matches(&standard("anything", &[])));
    }

    #[test]
    fn test_status_filter_parse() {
        assert_eq!("all".parse::<StatusFilter>().unwrap(), StatusFilter::All);
        assert_eq!(
            "pending_approval".parse::<StatusFilter>().unwrap(),
            StatusFilter::Status(ComplianceStatus::PendingApproval)
        );
        assert!("unknown".parse::<StatusFilter>().is_err());
    }

    #[test]
    fn test_agency_filter_parse() {
        assert_eq!(AgencyFilter::parse("all"), AgencyFilter::All);
        assert_eq!(
            AgencyFilter::parse("Police"),
            AgencyFilter::Agency("Police".into())
        );
    }
}
