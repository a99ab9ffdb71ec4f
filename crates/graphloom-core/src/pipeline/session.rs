//! Typed session state for one pipeline run
//!
//! The state passed between pipeline stages is an explicit struct, not a
//! free-form key-value map, so a missing or misspelled key is a compile
//! error rather than a runtime surprise.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::graph::TripleGraph;

/// Review verdict for a candidate graph
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    /// Not yet reviewed
    #[default]
    Pending,
    /// Every entity and relationship from the source is covered
    Pass,
    /// Something is missing; see the missing-item list
    Fail,
}

impl ReviewStatus {
    /// Get the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Pass => "pass",
            Self::Fail => "fail",
        }
    }
}

impl std::fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// State scoped to a single pipeline run
#[derive(Debug, Clone)]
pub struct SessionState {
    /// Unique identifier for the run
    pub id: String,
    /// When the run started
    pub started_at: DateTime<Utc>,
    /// The source document text
    pub raw_text: String,
    /// The current candidate graph
    pub candidate_graph: TripleGraph,
    /// Items the reviewer found missing; empty when none
    pub missing_items: Vec<String>,
    /// Verdict of the latest review
    pub review_status: ReviewStatus,
    /// The merged knowledge base after persistence, if reached
    pub persisted_graph: Option<TripleGraph>,
}

impl SessionState {
    /// Create a fresh session for the given source text
    pub fn new(raw_text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            started_at: Utc::now(),
            raw_text: raw_text.into(),
            candidate_graph: TripleGraph::new(),
            missing_items: Vec::new(),
            review_status: ReviewStatus::Pending,
            persisted_graph: None,
        }
    }
}
