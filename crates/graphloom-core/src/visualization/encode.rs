//! Degree-weighted visual encoding of a graph
//!
//! Computes per-node connectivity, maps it to a size and a color bucket,
//! and emits the node/edge presentation model an external renderer
//! consumes. Pure computation; never blocks.

use serde::Serialize;

use crate::graph::TripleGraph;

/// Smallest rendered node size
pub const MIN_NODE_SIZE: usize = 10;

/// Largest rendered node size
pub const MAX_NODE_SIZE: usize = 30;

/// Size gained per connection before clamping
pub const SIZE_PER_CONNECTION: usize = 3;

/// Connectivity bucket a node's color is drawn from
///
/// Buckets partition degree into four contiguous, non-overlapping
/// ranges; boundary values belong to the lower bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColorBucket {
    /// More than 10 connections
    High,
    /// 6 to 10 connections
    MediumHigh,
    /// 3 to 5 connections
    Medium,
    /// At most 2 connections
    Low,
}

impl ColorBucket {
    /// Bucket for a connectivity count
    pub fn for_degree(degree: usize) -> Self {
        if degree > 10 {
            Self::High
        } else if degree > 5 {
            Self::MediumHigh
        } else if degree > 2 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    /// Hex color the renderer uses for this bucket
    pub fn hex(&self) -> &'static str {
        match self {
            Self::High => "#ff6b6b",
            Self::MediumHigh => "#4ecdc4",
            Self::Medium => "#45b7d1",
            Self::Low => "#96ceb4",
        }
    }

    /// Get the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::MediumHigh => "medium-high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl std::fmt::Display for ColorBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Rendered size for a connectivity count, clamped to the size range
pub fn node_size(degree: usize) -> usize {
    (degree * SIZE_PER_CONNECTION).clamp(MIN_NODE_SIZE, MAX_NODE_SIZE)
}

/// A renderable node
#[derive(Debug, Clone, Serialize)]
pub struct VisualNode {
    /// Stable node identifier
    pub id: String,
    /// Display label
    pub label: String,
    /// Connectivity count
    pub degree: usize,
    /// Rendered size
    pub size: usize,
    /// Connectivity bucket
    pub bucket: ColorBucket,
    /// Hex color for the bucket
    pub color: &'static str,
    /// Hover text
    pub tooltip: String,
}

/// A renderable edge; one per triple, parallel edges kept distinct
#[derive(Debug, Clone, Serialize)]
pub struct VisualEdge {
    /// Source node identifier
    pub source: String,
    /// Target node identifier
    pub target: String,
    /// Display text (the predicate label)
    pub label: String,
    /// Hover text
    pub tooltip: String,
}

/// The node/edge presentation model handed to an external renderer
#[derive(Debug, Clone, Serialize)]
pub struct VisualModel {
    /// Nodes, ordered by identifier
    pub nodes: Vec<VisualNode>,
    /// Edges, in graph order
    pub edges: Vec<VisualEdge>,
}

/// Encode a graph into its presentation model
pub fn encode(graph: &TripleGraph) -> VisualModel {
    let nodes = graph
        .degrees()
        .into_iter()
        .map(|(term, degree)| {
            let label = term.label();
            let tooltip = format!("{}\nConnections: {}", label, degree);
            VisualNode {
                id: term.key(),
                label,
                degree,
                size: node_size(degree),
                bucket: ColorBucket::for_degree(degree),
                color: ColorBucket::for_degree(degree).hex(),
                tooltip,
            }
        })
        .collect();

    let edges = graph
        .iter()
        .map(|triple| {
            let label = triple.predicate.label();
            let source_label = triple.subject.label();
            let target_label = triple.object.label();
            VisualEdge {
                source: triple.subject.as_str().to_string(),
                target: triple.object.key(),
                tooltip: format!("{}: {} → {}", label, source_label, target_label),
                label,
            }
        })
        .collect();

    VisualModel { nodes, edges }
}
