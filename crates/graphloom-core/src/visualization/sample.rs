//! Random subject sampling for graph inspection
//!
//! Draws distinct subjects uniformly and returns every triple under
//! them. Diagnostic tooling only; the random source is injected so
//! tests stay deterministic.

use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::BTreeSet;

use crate::graph::{Iri, Triple, TripleGraph};

/// Default number of subjects drawn for an inspection sample
pub const DEFAULT_SAMPLE_SIZE: usize = 2;

/// Sample up to `k` distinct subjects and collect their triples
///
/// When the graph has fewer than `k` distinct subjects, every subject is
/// taken and the result is the whole graph. Returned triples keep the
/// graph's (s, p, o) order.
pub fn sample<R: Rng + ?Sized>(graph: &TripleGraph, k: usize, rng: &mut R) -> Vec<Triple> {
    let subjects: Vec<&Iri> = graph.subjects().into_iter().collect();
    let chosen: BTreeSet<&Iri> = subjects
        .choose_multiple(rng, k.min(subjects.len()))
        .copied()
        .collect();

    graph
        .iter()
        .filter(|triple| chosen.contains(&triple.subject))
        .cloned()
        .collect()
}
