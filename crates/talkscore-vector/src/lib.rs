//! Knowledge-base storage for the semantic classifier.
//!
//! `LanceKnowledgeBase` reads a LanceDB table of category-labelled,
//! pre-embedded snippets; `KnowledgeBaseWriter` appends to one (fixtures and
//! development seeding). `MemoryKnowledgeBase` serves tests and small
//! in-process reference sets.

pub mod memory;
pub mod schema;
pub mod store;
pub mod table;
pub mod writer;

pub use memory::MemoryKnowledgeBase;
pub use store::LanceKnowledgeBase;
pub use writer::{entry_id, KnowledgeBaseWriter};
