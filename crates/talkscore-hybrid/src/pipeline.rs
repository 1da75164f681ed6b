//! Per-transcript orchestration.
//!
//! Lexical scoring always runs. The semantic stage is attempted when a
//! classifier is configured and enabled and the transcript is not blank; it
//! runs on the blocking pool under a deadline. Any semantic failure degrades to
//! keyword-only scoring, so `analyze` always produces an `Analysis`.

use std::sync::Arc;
use std::time::{Duration, Instant};

use talkscore_core::config::{expand_path, ClassifierConfig, FusionWeights};
use talkscore_core::error::{Error, Result};
use talkscore_core::text::is_blank;
use talkscore_core::types::{Analysis, EvidenceSegment, SemanticClassificationResult};
use talkscore_lexical::{LexicalMatcher, ScoreNormalizer, Taxonomy};
use talkscore_semantic::SemanticClassifier;

use crate::fusion::HybridScorer;

/// What happened to the semantic stage for one transcript.
#[derive(Debug)]
pub enum SemanticOutcome {
    Success(SemanticClassificationResult),
    /// Not attempted: disabled, no classifier, or blank input.
    Skipped,
    Failed(Error),
}

pub struct Pipeline {
    matcher: Arc<LexicalMatcher>,
    normalizer: ScoreNormalizer,
    semantic: Option<Arc<SemanticClassifier>>,
    semantic_enabled: bool,
    timeout: Duration,
    scorer: HybridScorer,
}

impl Pipeline {
    /// Builds the pipeline, failing with `Configuration` on invalid settings
    /// or a taxonomy override that cannot be read or compiled.
    pub fn new(config: &ClassifierConfig, semantic: Option<SemanticClassifier>) -> Result<Self> {
        config.validate()?;
        let matcher = match &config.lexical.taxonomy_path {
            Some(path) => {
                let path = expand_path(path);
                LexicalMatcher::new(&Taxonomy::from_file(&path)?)?
            }
            None => LexicalMatcher::new(Taxonomy::builtin())?,
        };
        Ok(Self {
            matcher: Arc::new(matcher),
            normalizer: ScoreNormalizer::new(config.lexical.saturation)?,
            semantic: semantic.map(Arc::new),
            semantic_enabled: config.semantic.enabled,
            timeout: Duration::from_millis(config.semantic.timeout_ms),
            scorer: HybridScorer::new(config.fusion)?,
        })
    }

    pub fn fusion_weights(&self) -> FusionWeights { self.scorer.weights() }

    pub fn semantic_enabled(&self) -> bool { self.semantic_enabled && self.semantic.is_some() }

    pub async fn analyze(&self, transcript: &str) -> Analysis {
        let started = Instant::now();
        let counts = self.matcher.count(transcript);
        let lexical = self.normalizer.normalize(&counts);

        let semantic = match self.run_semantic(transcript).await {
            SemanticOutcome::Success(result) => Some(result),
            SemanticOutcome::Skipped => None,
            SemanticOutcome::Failed(e) => {
                tracing::warn!(error = %e, "semantic classification failed, using keyword scores only");
                None
            }
        };

        let fused = self.scorer.combine(semantic.as_ref().map(|r| &r.scores), &lexical);
        let segments: Vec<EvidenceSegment> = match semantic {
            Some(result) if !result.segments.is_empty() => result.segments.into_iter().map(Into::into).collect(),
            _ => self.matcher.locate(transcript).into_iter().map(Into::into).collect(),
        };
        tracing::info!(
            method = %fused.method,
            segments = segments.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "transcript analyzed"
        );
        Analysis { counts, scores: fused.scores, method: fused.method, segments }
    }

    /// Attempts semantic classification without ever propagating its error.
    pub async fn run_semantic(&self, transcript: &str) -> SemanticOutcome {
        let Some(classifier) = self.semantic.as_ref().filter(|_| self.semantic_enabled) else {
            return SemanticOutcome::Skipped;
        };
        if is_blank(transcript) {
            return SemanticOutcome::Skipped;
        }
        let classifier = Arc::clone(classifier);
        let text = transcript.to_owned();
        let task = tokio::task::spawn_blocking(move || classifier.classify(&text));
        // the blocking task keeps running past the deadline; its result is dropped
        match tokio::time::timeout(self.timeout, task).await {
            Ok(Ok(Ok(result))) => SemanticOutcome::Success(result),
            Ok(Ok(Err(e))) => SemanticOutcome::Failed(e),
            Ok(Err(join)) => SemanticOutcome::Failed(Error::ClassificationUnavailable(format!("semantic task aborted: {join}"))),
            Err(_) => SemanticOutcome::Failed(Error::ClassificationUnavailable(format!(
                "semantic classification timed out after {} ms",
                self.timeout.as_millis()
            ))),
        }
    }
}
