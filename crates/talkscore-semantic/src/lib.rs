//! talkscore-semantic
//!
//! Retrieval-based category scoring: the transcript is split into sentences,
//! each sentence is embedded and compared with every knowledge-base entry of
//! each category, and the best agreement per category becomes its score.

pub mod classifier;
pub mod segment;
pub mod similarity;

pub use classifier::SemanticClassifier;
pub use segment::{split_sentences, Segment};
