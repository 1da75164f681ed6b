use std::collections::BTreeMap;

use talkscore_core::traits::KnowledgeBase;
use talkscore_core::types::{Category, KnowledgeBaseEntry};

/// Knowledge base held in memory, grouped by category.
#[derive(Debug, Clone, Default)]
pub struct MemoryKnowledgeBase {
    by_category: BTreeMap<Category, Vec<KnowledgeBaseEntry>>,
}

impl MemoryKnowledgeBase {
    pub fn new(entries: impl IntoIterator<Item = KnowledgeBaseEntry>) -> Self {
        let mut kb = Self::default();
        for e in entries { kb.insert(e); }
        kb
    }

    pub fn insert(&mut self, entry: KnowledgeBaseEntry) {
        self.by_category.entry(entry.category).or_default().push(entry);
    }

    pub fn len(&self) -> usize { self.by_category.values().map(Vec::len).sum() }

    pub fn is_empty(&self) -> bool { self.len() == 0 }
}

impl KnowledgeBase for MemoryKnowledgeBase {
    fn lookup_by_category(&self, category: Category) -> anyhow::Result<Vec<KnowledgeBaseEntry>> {
        Ok(self.by_category.get(&category).cloned().unwrap_or_default())
    }
}
