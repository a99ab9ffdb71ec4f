//! Bounded refinement loop driving extraction and review
//!
//! The controller repeatedly asks the extraction capability for a
//! candidate graph, feeds the reviewer's missing items forward, and
//! stops on a pass or when the iteration budget runs out. Every
//! capability-boundary failure (unparseable candidate, extraction or
//! oracle error) is converted into a failed attempt that continues the
//! loop; the budget guarantees termination.

use std::sync::Arc;

use tracing::{info, warn};

use crate::graph::{TripleGraph, turtle};
use crate::llm::TextGenerator;

use super::extract::GraphExtractor;
use super::review::{CheckResult, CompletenessChecker};
use super::session::ReviewStatus;

/// Default refinement iteration budget
pub const MAX_ITERATIONS: usize = 5;

/// Feedback recorded when a candidate failed to parse
pub const INVALID_SYNTAX_FEEDBACK: &str = "previous output was not valid graph syntax";

/// Terminal state of the refinement loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoopState {
    /// Still iterating (never observable in an outcome)
    Running,
    /// The reviewer passed a candidate
    Passed,
    /// The iteration budget ran out; the last candidate is best-effort
    Exhausted,
}

impl std::fmt::Display for LoopState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoopState::Running => write!(f, "running"),
            LoopState::Passed => write!(f, "passed"),
            LoopState::Exhausted => write!(f, "exhausted"),
        }
    }
}

/// One pass of the loop; superseded by the next attempt or promoted to
/// the final outcome
#[derive(Debug, Clone)]
pub struct RefinementAttempt {
    /// 1-based attempt number
    pub iteration: usize,
    /// The candidate after this attempt (the previous one if parsing failed)
    pub candidate: TripleGraph,
    /// Review verdict for this attempt
    pub status: ReviewStatus,
    /// Missing items reported by this attempt
    pub missing_items: Vec<String>,
}

/// Final result of a refinement run
#[derive(Debug, Clone)]
pub struct RefinementOutcome {
    /// Terminal state: passed or exhausted
    pub state: LoopState,
    /// The final candidate graph (possibly incomplete on exhaustion)
    pub graph: TripleGraph,
    /// Number of extraction attempts made
    pub iterations: usize,
    /// Missing items from the last failed review; empty on pass
    pub missing_items: Vec<String>,
}

impl RefinementOutcome {
    /// Whether the reviewer accepted the final graph
    pub fn passed(&self) -> bool {
        self.state == LoopState::Passed
    }
}

/// The refinement loop controller
pub struct RefinementLoop {
    extractor: GraphExtractor,
    checker: CompletenessChecker,
    max_iterations: usize,
}

impl RefinementLoop {
    /// Create a loop driving both capabilities with the default budget
    pub fn new(generator: Arc<dyn TextGenerator>, oracle: Arc<dyn TextGenerator>) -> Self {
        Self {
            extractor: GraphExtractor::new(generator),
            checker: CompletenessChecker::new(oracle),
            max_iterations: MAX_ITERATIONS,
        }
    }

    /// Override the iteration budget (must be at least 1)
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations.max(1);
        self
    }

    /// Override the text preview boundary for both capabilities
    pub fn with_preview_chars(mut self, preview_chars: usize) -> Self {
        self.extractor = self.extractor.with_preview_chars(preview_chars);
        self.checker = self.checker.with_preview_chars(preview_chars);
        self
    }

    /// Run the loop for a source document
    ///
    /// Infallible by design: every failure inside an iteration becomes
    /// feedback for the next one, and the budget bounds the run.
    pub async fn run(&self, source_text: &str) -> RefinementOutcome {
        let mut missing_items: Vec<String> = Vec::new();
        let mut last_candidate = TripleGraph::new();

        for iteration in 1..=self.max_iterations {
            let attempt = self
                .attempt(iteration, source_text, &missing_items, &last_candidate)
                .await;
            last_candidate = attempt.candidate.clone();

            info!(
                iteration,
                status = %attempt.status,
                triples = attempt.candidate.len(),
                missing = attempt.missing_items.len(),
                "Refinement attempt finished"
            );

            if attempt.status == ReviewStatus::Pass {
                return RefinementOutcome {
                    state: LoopState::Passed,
                    graph: attempt.candidate,
                    iterations: iteration,
                    missing_items: Vec::new(),
                };
            }
            missing_items = attempt.missing_items;
        }

        warn!(
            budget = self.max_iterations,
            "Refinement budget exhausted; keeping last candidate"
        );
        RefinementOutcome {
            state: LoopState::Exhausted,
            graph: last_candidate,
            iterations: self.max_iterations,
            missing_items,
        }
    }

    /// Run one attempt, converting every failure into a failed review
    async fn attempt(
        &self,
        iteration: usize,
        source_text: &str,
        missing_items: &[String],
        last_candidate: &TripleGraph,
    ) -> RefinementAttempt {
        let raw = match self.extractor.extract(source_text, missing_items).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(iteration, error = %e, "Extraction request failed");
                return RefinementAttempt {
                    iteration,
                    candidate: last_candidate.clone(),
                    status: ReviewStatus::Fail,
                    missing_items: vec![format!("extraction request failed: {}", e)],
                };
            }
        };

        let candidate = match turtle::parse(&raw) {
            Ok(graph) => graph,
            Err(e) => {
                warn!(iteration, error = %e, "Candidate was not valid graph syntax");
                return RefinementAttempt {
                    iteration,
                    candidate: last_candidate.clone(),
                    status: ReviewStatus::Fail,
                    missing_items: vec![INVALID_SYNTAX_FEEDBACK.to_string()],
                };
            }
        };

        let review = match self.checker.check(source_text, &candidate).await {
            Ok(result) => result,
            Err(e) => {
                warn!(iteration, error = %e, "Completeness review failed");
                CheckResult::fail(vec![format!("completeness review failed: {}", e)])
            }
        };

        RefinementAttempt {
            iteration,
            candidate,
            status: review.status,
            missing_items: review.missing_items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::llm::TextGenerator;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Deterministic capability stub replaying scripted responses;
    /// repeats the last response once the script runs out
    struct Scripted {
        responses: Mutex<VecDeque<String>>,
        last: Mutex<String>,
        calls: Mutex<usize>,
    }

    impl Scripted {
        fn new(responses: &[&str]) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.iter().map(|s| s.to_string()).collect()),
                last: Mutex::new(responses.last().unwrap_or(&"").to_string()),
                calls: Mutex::new(0),
            })
        }

        fn calls(&self) -> usize {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl TextGenerator for Scripted {
        async fn generate(&self, _prompt: &str) -> crate::error::Result<String> {
            *self.calls.lock().unwrap() += 1;
            match self.responses.lock().unwrap().pop_front() {
                Some(response) => Ok(response),
                None => Ok(self.last.lock().unwrap().clone()),
            }
        }
    }

    /// Capability stub that always errors
    struct Failing;

    #[async_trait]
    impl TextGenerator for Failing {
        async fn generate(&self, _prompt: &str) -> crate::error::Result<String> {
            Err(Error::LlmError("capability offline".into()))
        }
    }

    const ADA_TURTLE: &str = "@prefix : <http://example.org/> .\n:Ada :bornIn :London .\n";

    #[tokio::test]
    async fn test_passes_on_first_iteration() {
        let generator = Scripted::new(&[ADA_TURTLE]);
        let oracle = Scripted::new(&["pass"]);
        let refiner = RefinementLoop::new(generator.clone(), oracle);

        let outcome = refiner.run("Ada was born in London.").await;
        assert!(outcome.passed());
        assert_eq!(outcome.iterations, 1);
        assert_eq!(outcome.graph.len(), 1);
        assert!(outcome.missing_items.is_empty());
        assert_eq!(generator.calls(), 1);
    }

    #[tokio::test]
    async fn test_always_fail_oracle_exhausts_budget() {
        let generator = Scripted::new(&[ADA_TURTLE]);
        let oracle = Scripted::new(&["fail\n- something else"]);
        let refiner = RefinementLoop::new(generator.clone(), oracle).with_max_iterations(3);

        let outcome = refiner.run("Ada was born in London.").await;
        assert_eq!(outcome.state, LoopState::Exhausted);
        assert_eq!(outcome.iterations, 3);
        // the last candidate is retained, not discarded
        assert_eq!(outcome.graph.len(), 1);
        assert_eq!(outcome.missing_items, vec!["something else"]);
        assert_eq!(generator.calls(), 3);
    }

    #[tokio::test]
    async fn test_invalid_syntax_keeps_previous_candidate() {
        let generator = Scripted::new(&[ADA_TURTLE, "this is not turtle at all {", ADA_TURTLE]);
        let oracle = Scripted::new(&["fail\n- more detail", "pass"]);
        let refiner = RefinementLoop::new(generator, oracle).with_max_iterations(5);

        let outcome = refiner.run("Ada was born in London.").await;
        // attempt 1: parses, reviewer fails it
        // attempt 2: garbage, candidate from attempt 1 is kept
        // attempt 3: parses, reviewer passes
        assert!(outcome.passed());
        assert_eq!(outcome.iterations, 3);
        assert_eq!(outcome.graph.len(), 1);
    }

    #[tokio::test]
    async fn test_syntax_feedback_reaches_next_prompt() {
        let generator = Scripted::new(&["not turtle {", ADA_TURTLE]);
        let oracle = Scripted::new(&["pass"]);
        let refiner = RefinementLoop::new(generator, oracle);

        let outcome = refiner.run("Ada was born in London.").await;
        assert!(outcome.passed());
        assert_eq!(outcome.iterations, 2);
    }

    #[tokio::test]
    async fn test_extraction_errors_are_loop_continuations() {
        let refiner =
            RefinementLoop::new(Arc::new(Failing), Scripted::new(&["pass"])).with_max_iterations(2);

        let outcome = refiner.run("Ada was born in London.").await;
        assert_eq!(outcome.state, LoopState::Exhausted);
        assert_eq!(outcome.iterations, 2);
        assert!(outcome.graph.is_empty());
        assert_eq!(outcome.missing_items.len(), 1);
        assert!(outcome.missing_items[0].contains("extraction request failed"));
    }

    #[tokio::test]
    async fn test_oracle_errors_are_loop_continuations() {
        let generator = Scripted::new(&[ADA_TURTLE]);
        let refiner =
            RefinementLoop::new(generator, Arc::new(Failing)).with_max_iterations(2);

        let outcome = refiner.run("Ada was born in London.").await;
        assert_eq!(outcome.state, LoopState::Exhausted);
        // the parsed candidate survives even though the oracle was down
        assert_eq!(outcome.graph.len(), 1);
        assert!(outcome.missing_items[0].contains("completeness review failed"));
    }
}
