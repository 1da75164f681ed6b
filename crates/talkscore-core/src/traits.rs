use crate::types::{Category, KnowledgeBaseEntry};

/// Maps texts into a shared vector space.
///
/// Implementations return one L2-normalized vector of length `dim()` per
/// input, in input order.
pub trait Embedder: Send + Sync {
    fn dim(&self) -> usize;
    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>>;
}

/// Read-only access to category-labelled reference entries.
///
/// Calls may block on I/O. Entries must not change for the duration of a
/// single classification call.
pub trait KnowledgeBase: Send + Sync {
    fn lookup_by_category(&self, category: Category) -> anyhow::Result<Vec<KnowledgeBaseEntry>>;
}

impl<T: Embedder + ?Sized> Embedder for Box<T> {
    fn dim(&self) -> usize { (**self).dim() }
    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>> { (**self).embed_batch(texts) }
}

impl<T: KnowledgeBase + ?Sized> KnowledgeBase for Box<T> {
    fn lookup_by_category(&self, category: Category) -> anyhow::Result<Vec<KnowledgeBaseEntry>> { (**self).lookup_by_category(category) }
}
