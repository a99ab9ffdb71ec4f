//! Visual encoding of knowledge graphs
//!
//! Turns a merged graph into a renderable node/edge model with
//! degree-derived sizes and colors, plus a sampling utility for
//! inspecting large graphs. Rendering itself (layout, physics, HTML)
//! belongs to an external consumer of the model.

mod encode;
mod sample;

pub use encode::{
    ColorBucket, MAX_NODE_SIZE, MIN_NODE_SIZE, SIZE_PER_CONNECTION, VisualEdge, VisualModel,
    VisualNode, encode, node_size,
};
pub use sample::{DEFAULT_SAMPLE_SIZE, sample};
