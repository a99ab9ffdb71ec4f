//! Triple graph domain module
//!
//! The data model and codec for knowledge graphs:
//!
//! - **Terms**: IRIs, blank node labels and literals ([`term`])
//! - **Model**: deduplicated triple sets with prefix tables ([`model`])
//! - **Codec**: Turtle parsing and serialization ([`turtle`])
//! - **Merge**: union of triple sets with a delta report ([`merge`])
//!
//! A graph is a *set*: inserting an already-present triple is a no-op,
//! which is what makes [`merge::merge`] commutative, associative and
//! idempotent.

mod merge;
mod model;
mod term;
pub mod turtle;

pub use merge::{MergeReport, merge};
pub use model::{GraphStats, Triple, TripleGraph};
pub use term::{Iri, Literal, Term};
