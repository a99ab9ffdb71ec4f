//! Graph merge engine
//!
//! Merging is a plain union of two triple sets. Structural triple
//! equality makes deduplication automatic, so a merge can never
//! conflict and never removes a triple; it is commutative, associative
//! and idempotent. Prefix tables are unioned with the base binding
//! winning on conflict.

use tracing::debug;

use super::model::TripleGraph;

/// Size delta report for a merge
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct MergeReport {
    /// Triples in the base graph before the merge
    pub base_size: usize,
    /// Triples in the incoming graph
    pub incoming_size: usize,
    /// Triples in the merged graph
    pub merged_size: usize,
}

impl MergeReport {
    /// Triples the merge added to the base
    pub fn added(&self) -> usize {
        self.merged_size - self.base_size
    }

    /// Incoming triples that were already present
    pub fn duplicates(&self) -> usize {
        self.base_size + self.incoming_size - self.merged_size
    }
}

impl std::fmt::Display for MergeReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} → {} triples ({} new, {} duplicate)",
            self.base_size,
            self.merged_size,
            self.added(),
            self.duplicates()
        )
    }
}

/// Merge two graphs into a new graph
///
/// The result's triple set is the union of both inputs; either input may
/// be empty (identity).
pub fn merge(base: &TripleGraph, incoming: &TripleGraph) -> (TripleGraph, MergeReport) {
    let mut merged = base.clone();
    for triple in incoming.iter() {
        merged.insert(triple.clone());
    }
    for (prefix, namespace) in incoming.prefixes() {
        merged.bind_prefix(prefix, namespace);
    }

    let report = MergeReport {
        base_size: base.len(),
        incoming_size: incoming.len(),
        merged_size: merged.len(),
    };
    debug!(
        base = report.base_size,
        incoming = report.incoming_size,
        merged = report.merged_size,
        "Merged graphs"
    );
    (merged, report)
}
