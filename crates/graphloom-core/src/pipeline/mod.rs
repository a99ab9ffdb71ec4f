//! Text-to-knowledge-graph pipeline
//!
//! The fixed stage order for one run:
//!
//! ```text
//! raw text
//!    │
//!    ▼
//! ┌───────────────────────────────────────────────┐
//! │ Refinement loop (bounded)                     │
//! │   extraction capability → Turtle parser       │
//! │   → completeness checker → pass / feed back   │
//! └───────────────────────────────────────────────┘
//!    │ final candidate graph
//!    ▼
//! merge with persisted knowledge base
//!    │ merged graph
//!    ▼
//! visual encoding → presentation model
//! ```
//!
//! Stages execute strictly in this order; the only suspension points are
//! the capability calls. Callers wanting a deadline wrap the whole
//! [`Pipeline::run`] invocation (e.g. in `tokio::time::timeout`); the
//! pure stages never block.

mod extract;
mod refine;
mod review;
mod session;

pub use extract::{GraphExtractor, TEXT_PREVIEW_CHARS, TextPreview};
pub use refine::{
    INVALID_SYNTAX_FEEDBACK, LoopState, MAX_ITERATIONS, RefinementAttempt, RefinementLoop,
    RefinementOutcome,
};
pub use review::{CheckResult, CompletenessChecker};
pub use session::{ReviewStatus, SessionState};

use std::sync::Arc;

use tracing::info;

use crate::error::{Error, Result};
use crate::graph::MergeReport;
use crate::llm::TextGenerator;
use crate::store::GraphStore;
use crate::visualization::{self, VisualModel};

/// End-to-end pipeline: refinement, persistence and visual encoding
pub struct Pipeline {
    generator: Arc<dyn TextGenerator>,
    oracle: Arc<dyn TextGenerator>,
    max_iterations: usize,
    preview_chars: usize,
}

impl Pipeline {
    /// Create a pipeline using one capability for both extraction and
    /// review
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            oracle: generator.clone(),
            generator,
            max_iterations: MAX_ITERATIONS,
            preview_chars: TEXT_PREVIEW_CHARS,
        }
    }

    /// Use a separate capability for the completeness oracle
    pub fn with_oracle(mut self, oracle: Arc<dyn TextGenerator>) -> Self {
        self.oracle = oracle;
        self
    }

    /// Override the refinement iteration budget
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations.max(1);
        self
    }

    /// Override the text preview boundary
    pub fn with_preview_chars(mut self, preview_chars: usize) -> Self {
        self.preview_chars = preview_chars;
        self
    }

    /// Run the pipeline for a source document, merging into `store`
    ///
    /// Fails with [`Error::EmptyGraph`] when the refinement loop ends
    /// with zero triples, and with store errors when persistence fails;
    /// everything else is absorbed by the loop.
    pub async fn run(&self, source_text: &str, store: &GraphStore) -> Result<RunReport> {
        let mut session = SessionState::new(source_text);
        info!(session_id = %session.id, chars = session.raw_text.len(), "Pipeline run started");

        let refiner = RefinementLoop::new(self.generator.clone(), self.oracle.clone())
            .with_max_iterations(self.max_iterations)
            .with_preview_chars(self.preview_chars);

        let outcome = refiner.run(&session.raw_text).await;
        session.candidate_graph = outcome.graph.clone();
        session.missing_items = outcome.missing_items.clone();
        session.review_status = if outcome.passed() {
            ReviewStatus::Pass
        } else {
            ReviewStatus::Fail
        };

        if session.candidate_graph.is_empty() {
            return Err(Error::EmptyGraph);
        }

        let (merged, merge) = store.merge_and_save(&session.candidate_graph)?;
        session.persisted_graph = Some(merged.clone());

        let visual = visualization::encode(&merged);

        info!(
            session_id = %session.id,
            state = %outcome.state,
            iterations = outcome.iterations,
            merged_triples = merge.merged_size,
            nodes = visual.nodes.len(),
            "Pipeline run finished"
        );

        Ok(RunReport {
            session_id: session.id,
            state: outcome.state,
            iterations: outcome.iterations,
            missing_items: session.missing_items,
            merge,
            merged,
            visual,
        })
    }
}

/// Report of a completed pipeline run
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Identifier of the run
    pub session_id: String,
    /// Terminal loop state: passed or exhausted
    pub state: LoopState,
    /// Extraction attempts used
    pub iterations: usize,
    /// Missing items from the last failed review; empty on pass
    pub missing_items: Vec<String>,
    /// Size delta of the knowledge-base merge
    pub merge: MergeReport,
    /// The merged knowledge base
    pub merged: crate::graph::TripleGraph,
    /// Node/edge presentation model of the merged graph
    pub visual: VisualModel,
}
