use std::sync::Arc;
use std::time::Instant;

use talkscore_core::config::SemanticConfig;
use talkscore_core::error::{Error, Result};
use talkscore_core::text::is_blank;
use talkscore_core::traits::{Embedder, KnowledgeBase};
use talkscore_core::types::{Category, PerCategory, SemanticClassificationResult, SemanticSegment};

use crate::segment::split_sentences;
use crate::similarity::{aggregate, cosine, strength_score};

fn unavailable(context: &str, e: impl std::fmt::Display) -> Error {
    Error::ClassificationUnavailable(format!("{context}: {e}"))
}

/// Scores a transcript against a labelled knowledge base.
///
/// Fails as a unit: any embedding or lookup error aborts the call with
/// `ClassificationUnavailable`, never a partial result.
#[derive(Clone)]
pub struct SemanticClassifier {
    embedder: Arc<dyn Embedder>,
    knowledge_base: Arc<dyn KnowledgeBase>,
    config: SemanticConfig,
}

impl SemanticClassifier {
    pub fn new(embedder: Arc<dyn Embedder>, knowledge_base: Arc<dyn KnowledgeBase>, config: SemanticConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { embedder, knowledge_base, config })
    }

    pub fn classify(&self, transcript: &str) -> Result<SemanticClassificationResult> {
        if is_blank(transcript) {
            return Err(Error::InvalidInput("transcript is empty".into()));
        }
        let started = Instant::now();
        let segments = split_sentences(transcript, self.config.min_segment_chars);
        let texts: Vec<String> = segments.iter().map(|s| s.text.clone()).collect();
        let vectors = self.embedder.embed_batch(&texts).map_err(|e| unavailable("embedding failed", format!("{e:#}")))?;
        if vectors.len() != segments.len() {
            return Err(unavailable("embedding failed", format!("expected {} vectors, got {}", segments.len(), vectors.len())));
        }
        let dim = self.embedder.dim();
        if let Some(v) = vectors.iter().find(|v| v.len() != dim) {
            return Err(unavailable("embedding failed", format!("vector dim {} != {}", v.len(), dim)));
        }

        let mut strengths: PerCategory<f32> = PerCategory::default();
        let mut evidence: Vec<(usize, Category, f32)> = Vec::new();
        let mut total_entries = 0usize;
        for category in Category::ALL {
            let entries = self
                .knowledge_base
                .lookup_by_category(category)
                .map_err(|e| unavailable("knowledge base lookup failed", format!("{e:#}")))?;
            total_entries += entries.len();
            if let Some(bad) = entries.iter().find(|e| e.embedding.len() != dim) {
                return Err(unavailable(
                    "knowledge base entry incompatible",
                    format!("entry '{}' has dim {} but embedder produces {}", bad.id, bad.embedding.len(), dim),
                ));
            }
            if entries.is_empty() { continue; }
            let mut best = f32::NEG_INFINITY;
            for (idx, v) in vectors.iter().enumerate() {
                let sims: Vec<f32> = entries.iter().map(|e| cosine(v, &e.embedding)).collect();
                let agg = aggregate(&sims, self.config.aggregation, self.config.top_k);
                best = best.max(agg);
                if agg > self.config.similarity_threshold { evidence.push((idx, category, agg)); }
            }
            strengths[category] = best;
        }
        if total_entries == 0 {
            return Err(Error::ClassificationUnavailable("knowledge base has no entries".into()));
        }

        // position first, then category order
        evidence.sort_by_key(|(idx, category, _)| (*idx, *category));
        let segments = evidence
            .into_iter()
            .map(|(idx, category, similarity)| SemanticSegment {
                text: segments[idx].text.clone(),
                category,
                similarity,
                start: segments[idx].start,
                end: segments[idx].end,
            })
            .collect::<Vec<_>>();
        let scores = strengths.map(|_, s| strength_score(s, self.config.strength_saturation));
        tracing::debug!(
            segments = texts.len(),
            evidence = segments.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "semantic classification done"
        );
        Ok(SemanticClassificationResult { scores, segments })
    }
}
