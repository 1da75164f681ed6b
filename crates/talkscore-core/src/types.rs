//! Domain types shared by the lexical, semantic and hybrid stages.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde::ser::SerializeMap;
use std::collections::BTreeMap;
use std::fmt;
use std::ops::{Index, IndexMut};
use std::str::FromStr;

use crate::error::Error;

/// One of the four developmental talk domains.
///
/// The set is closed. `Category::ALL` fixes the iteration order used
/// everywhere results are ordered "by category".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Science,
    Social,
    Literature,
    Language,
}

impl Category {
    pub const ALL: [Category; 4] = [Category::Science, Category::Social, Category::Literature, Category::Language];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Science => "science",
            Category::Social => "social",
            Category::Literature => "literature",
            Category::Language => "language",
        }
    }

    fn slot(self) -> usize {
        match self {
            Category::Science => 0,
            Category::Social => 1,
            Category::Literature => 2,
            Category::Language => 3,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == lower)
            .ok_or_else(|| Error::InvalidInput(format!("unknown category '{s}'")))
    }
}

/// A value for each category, indexable by `Category`.
///
/// Serializes as a map keyed by the lower-case category name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PerCategory<T>([T; 4]);

impl<T: Copy> PerCategory<T> {
    pub fn from_fn(mut f: impl FnMut(Category) -> T) -> Self {
        Self(Category::ALL.map(&mut f))
    }

    pub fn get(&self, category: Category) -> T { self.0[category.slot()] }

    pub fn iter(&self) -> impl Iterator<Item = (Category, T)> + '_ {
        Category::ALL.into_iter().map(move |c| (c, self.get(c)))
    }

    pub fn map<U: Copy>(&self, mut f: impl FnMut(Category, T) -> U) -> PerCategory<U> {
        PerCategory::from_fn(|c| f(c, self.get(c)))
    }
}

impl<T: Copy + Default + PartialEq> PerCategory<T> {
    pub fn is_all_default(&self) -> bool { self.0.iter().all(|v| *v == T::default()) }
}

impl<T> Index<Category> for PerCategory<T> {
    type Output = T;
    fn index(&self, category: Category) -> &T { &self.0[category.slot()] }
}

impl<T> IndexMut<Category> for PerCategory<T> {
    fn index_mut(&mut self, category: Category) -> &mut T { &mut self.0[category.slot()] }
}

impl<T: Serialize> Serialize for PerCategory<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(4))?;
        for c in Category::ALL {
            map.serialize_entry(c.as_str(), &self.0[c.slot()])?;
        }
        map.end()
    }
}

impl<'de, T: Deserialize<'de> + Default + Copy> Deserialize<'de> for PerCategory<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map = BTreeMap::<Category, T>::deserialize(deserializer)?;
        let mut out = Self::default();
        for (c, v) in map { out[c] = v; }
        Ok(out)
    }
}

/// Raw keyword occurrence counts. Uncapped.
pub type CategoryCounts = PerCategory<u32>;

/// Bounded scores, each in `0..=100`.
pub type CategoryScores = PerCategory<u8>;

/// A taxonomy keyword found in a transcript.
///
/// `start`/`end` are character (not byte) offsets into the original text;
/// `text` is the matched slice with its original casing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordMatch {
    pub text: String,
    pub category: Category,
    pub start: usize,
    pub end: usize,
}

/// A category-labelled reference snippet with its embedding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeBaseEntry {
    pub id: String,
    pub text: String,
    pub category: Category,
    pub embedding: Vec<f32>,
    #[serde(default)]
    pub metadata: serde_json::Value,
    pub source: String,
}

/// A transcript span whose similarity to a category's references passed
/// the configured threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemanticSegment {
    pub text: String,
    pub category: Category,
    pub similarity: f32,
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemanticClassificationResult {
    pub scores: CategoryScores,
    pub segments: Vec<SemanticSegment>,
}

/// Which signals produced the final scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClassificationMethod {
    #[serde(rename = "keyword-only")]
    KeywordOnly,
    #[serde(rename = "hybrid")]
    Hybrid,
}

impl ClassificationMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            ClassificationMethod::KeywordOnly => "keyword-only",
            ClassificationMethod::Hybrid => "hybrid",
        }
    }
}

impl fmt::Display for ClassificationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FusedScores {
    pub scores: CategoryScores,
    pub method: ClassificationMethod,
}

/// Indicates which stage produced an evidence segment.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Semantic,
    Keyword,
}

/// A highlightable span attributed to a category.
///
/// `strength` is the similarity for semantic evidence and absent for
/// keyword evidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceSegment {
    pub text: String,
    pub category: Category,
    pub start: usize,
    pub end: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strength: Option<f32>,
    pub source: SourceKind,
}

impl From<KeywordMatch> for EvidenceSegment {
    fn from(m: KeywordMatch) -> Self {
        Self { text: m.text, category: m.category, start: m.start, end: m.end, strength: None, source: SourceKind::Keyword }
    }
}

impl From<SemanticSegment> for EvidenceSegment {
    fn from(s: SemanticSegment) -> Self {
        Self { text: s.text, category: s.category, start: s.start, end: s.end, strength: Some(s.similarity), source: SourceKind::Semantic }
    }
}

/// The complete result of analysing one transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub counts: CategoryCounts,
    pub scores: CategoryScores,
    pub method: ClassificationMethod,
    pub segments: Vec<EvidenceSegment>,
}
