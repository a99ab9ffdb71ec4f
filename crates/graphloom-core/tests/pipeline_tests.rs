//! Graphloom Core Integration Tests
//!
//! Drives the full pipeline end to end with deterministic capability
//! stubs in place of the LLM.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tempfile::TempDir;

use graphloom_core::graph::{Iri, Triple, TripleGraph, merge, turtle};
use graphloom_core::llm::TextGenerator;
use graphloom_core::pipeline::{LoopState, Pipeline};
use graphloom_core::store::GraphStore;
use graphloom_core::visualization::ColorBucket;
use graphloom_core::{Error, Result};

/// Capability stub replaying scripted responses; repeats the last one
/// when the script runs out
struct Scripted {
    responses: Mutex<VecDeque<String>>,
    last: Mutex<String>,
}

impl Scripted {
    fn new(responses: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.iter().map(|s| s.to_string()).collect()),
            last: Mutex::new(responses.last().unwrap_or(&"").to_string()),
        })
    }
}

#[async_trait]
impl TextGenerator for Scripted {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        match self.responses.lock().unwrap().pop_front() {
            Some(response) => Ok(response),
            None => Ok(self.last.lock().unwrap().clone()),
        }
    }
}

const ADA_TURTLE: &str = "@prefix : <http://example.org/> .\n:Ada :bornIn :London .\n";

#[tokio::test]
async fn test_single_pass_run_end_to_end() {
    let dir = TempDir::new().unwrap();
    let store = GraphStore::open(dir.path().join("kb.ttl"));

    let pipeline =
        Pipeline::new(Scripted::new(&[ADA_TURTLE])).with_oracle(Scripted::new(&["pass"]));

    let report = pipeline
        .run("Ada was born in London.", &store)
        .await
        .unwrap();

    assert_eq!(report.state, LoopState::Passed);
    assert_eq!(report.iterations, 1);
    assert!(report.missing_items.is_empty());

    // merged into an empty knowledge base
    assert_eq!(report.merge.base_size, 0);
    assert_eq!(report.merge.merged_size, 1);
    assert_eq!(report.merged.len(), 1);

    // two nodes, each degree 1, size 10, low bucket
    assert_eq!(report.visual.nodes.len(), 2);
    assert_eq!(report.visual.edges.len(), 1);
    for node in &report.visual.nodes {
        assert_eq!(node.degree, 1);
        assert_eq!(node.size, 10);
        assert_eq!(node.bucket, ColorBucket::Low);
    }

    // the store was rewritten and parses back
    let persisted = store.load().unwrap();
    assert_eq!(persisted.len(), 1);
}

#[tokio::test]
async fn test_refinement_feedback_improves_candidate() {
    let dir = TempDir::new().unwrap();
    let store = GraphStore::open(dir.path().join("kb.ttl"));

    let first = "@prefix : <http://example.org/> .\n:Ada :bornIn :London .\n";
    let second = "@prefix : <http://example.org/> .\n\
                  :Ada :bornIn :London ;\n    :knows :Babbage .\n";

    let pipeline = Pipeline::new(Scripted::new(&[first, second]))
        .with_oracle(Scripted::new(&["fail\n- the relation to Babbage", "pass"]));

    let report = pipeline
        .run("Ada was born in London. She knew Babbage.", &store)
        .await
        .unwrap();

    assert_eq!(report.state, LoopState::Passed);
    assert_eq!(report.iterations, 2);
    assert_eq!(report.merged.len(), 2);
}

#[tokio::test]
async fn test_exhausted_run_keeps_best_effort_candidate() {
    let dir = TempDir::new().unwrap();
    let store = GraphStore::open(dir.path().join("kb.ttl"));

    let pipeline = Pipeline::new(Scripted::new(&[ADA_TURTLE]))
        .with_oracle(Scripted::new(&["fail\n- something more"]))
        .with_max_iterations(3);

    let report = pipeline
        .run("Ada was born in London.", &store)
        .await
        .unwrap();

    assert_eq!(report.state, LoopState::Exhausted);
    assert_eq!(report.iterations, 3);
    assert_eq!(report.missing_items, vec!["something more"]);
    // the incomplete candidate is still persisted
    assert_eq!(store.load().unwrap().len(), 1);
}

#[tokio::test]
async fn test_empty_extraction_is_terminal() {
    let dir = TempDir::new().unwrap();
    let store = GraphStore::open(dir.path().join("kb.ttl"));

    let pipeline = Pipeline::new(Scripted::new(&[""]))
        .with_oracle(Scripted::new(&["pass"]))
        .with_max_iterations(2);

    let err = pipeline
        .run("Ada was born in London.", &store)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::EmptyGraph));
    // nothing was persisted
    assert!(!store.path().exists());
}

#[tokio::test]
async fn test_runs_accumulate_into_one_knowledge_base() {
    let dir = TempDir::new().unwrap();
    let store = GraphStore::open(dir.path().join("kb.ttl"));

    let ada = Pipeline::new(Scripted::new(&[ADA_TURTLE])).with_oracle(Scripted::new(&["pass"]));
    ada.run("Ada was born in London.", &store).await.unwrap();

    let google_turtle = "@prefix : <http://example.org/> .\n\
                         :Google :foundedBy :LarryPage, :SergeyBrin .\n";
    let google =
        Pipeline::new(Scripted::new(&[google_turtle])).with_oracle(Scripted::new(&["pass"]));
    let report = google
        .run("Google was founded by Larry Page and Sergey Brin.", &store)
        .await
        .unwrap();

    assert_eq!(report.merge.base_size, 1);
    assert_eq!(report.merge.merged_size, 3);

    // re-running the same document adds nothing
    let again = Pipeline::new(Scripted::new(&[ADA_TURTLE])).with_oracle(Scripted::new(&["pass"]));
    let report = again.run("Ada was born in London.", &store).await.unwrap();
    assert_eq!(report.merge.base_size, 3);
    assert_eq!(report.merge.merged_size, 3);
    assert_eq!(report.merge.duplicates(), 1);
}

#[test]
fn test_persisted_file_interoperates_with_codec() {
    let dir = TempDir::new().unwrap();
    let store = GraphStore::open(dir.path().join("kb.ttl"));

    let mut graph = TripleGraph::from_triples([Triple::new(
        Iri::new("http://example.org/Ada"),
        Iri::new("http://example.org/bornIn"),
        Iri::new("http://example.org/London"),
    )]);
    graph.bind_prefix("", "http://example.org/");
    store.save(&graph).unwrap();

    // the on-disk document is plain Turtle readable by the codec
    let raw = std::fs::read_to_string(store.path()).unwrap();
    assert!(raw.contains("@prefix"));
    let reparsed = turtle::parse(&raw).unwrap();
    assert_eq!(reparsed, graph);

    // and merging it with itself is idempotent
    let (merged, report) = merge(&graph, &reparsed);
    assert_eq!(merged, graph);
    assert_eq!(report.added(), 0);
}
