//! talkscore-lexical
//!
//! Deterministic keyword scoring: the curated taxonomy, a whole-word matcher
//! that counts and locates taxonomy terms, and the count → score normalizer.

pub mod matcher;
pub mod normalize;
pub mod taxonomy;

pub use matcher::LexicalMatcher;
pub use normalize::{ScoreNormalizer, DEFAULT_SATURATION};
pub use taxonomy::{KeywordEntry, Taxonomy};
