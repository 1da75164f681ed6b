//! talkscore-hybrid
//!
//! Score fusion and the per-transcript pipeline that ties the lexical and
//! semantic stages together.

pub mod fusion;
pub mod pipeline;

pub use fusion::HybridScorer;
pub use pipeline::{Pipeline, SemanticOutcome};
