use talkscore_core::config::FusionWeights;
use talkscore_core::error::Result;
use talkscore_core::types::{CategoryScores, ClassificationMethod, FusedScores};

/// Fuses semantic and lexical scores under fixed, validated weights.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HybridScorer {
    weights: FusionWeights,
}

impl HybridScorer {
    pub fn new(weights: FusionWeights) -> Result<Self> {
        weights.validate()?;
        Ok(Self { weights })
    }

    pub fn weights(&self) -> FusionWeights { self.weights }

    /// Without semantic scores the lexical scores pass through unchanged.
    pub fn combine(&self, semantic: Option<&CategoryScores>, lexical: &CategoryScores) -> FusedScores {
        match semantic {
            None => FusedScores { scores: *lexical, method: ClassificationMethod::KeywordOnly },
            Some(semantic) => {
                let scores = lexical.map(|c, l| {
                    let mixed = self.weights.semantic_weight * f64::from(semantic[c]) + self.weights.lexical_weight * f64::from(l);
                    mixed.clamp(0.0, 100.0).round() as u8
                });
                FusedScores { scores, method: ClassificationMethod::Hybrid }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use talkscore_core::types::Category;
    use talkscore_core::Error;

    fn scores(v: [u8; 4]) -> CategoryScores {
        let mut out = CategoryScores::default();
        for (c, x) in Category::ALL.into_iter().zip(v) { out[c] = x; }
        out
    }

    #[test]
    fn absent_semantic_keeps_lexical() {
        let scorer = HybridScorer::new(FusionWeights::default()).unwrap();
        let lexical = scores([10, 0, 55, 100]);
        let fused = scorer.combine(None, &lexical);
        assert_eq!(fused.scores, lexical);
        assert_eq!(fused.method, ClassificationMethod::KeywordOnly);
    }

    #[test]
    fn weighted_combination_rounds() {
        let scorer = HybridScorer::new(FusionWeights::new(0.6, 0.4).unwrap()).unwrap();
        let fused = scorer.combine(Some(&scores([100, 0, 50, 33])), &scores([0, 100, 50, 34]));
        assert_eq!(fused.method, ClassificationMethod::Hybrid);
        assert_eq!(fused.scores, scores([60, 40, 50, 33]));
    }

    #[test]
    fn matches_formula_over_grid() {
        let weights = FusionWeights::new(0.7, 0.3).unwrap();
        let scorer = HybridScorer::new(weights).unwrap();
        for s in (0..=100u8).step_by(7) {
            for l in (0..=100u8).step_by(11) {
                let fused = scorer.combine(Some(&scores([s; 4])), &scores([l; 4]));
                let expected = (0.7 * f64::from(s) + 0.3 * f64::from(l)).clamp(0.0, 100.0).round() as u8;
                for (_, v) in fused.scores.iter() { assert_eq!(v, expected, "s={s} l={l}"); }
            }
        }
    }

    #[test]
    fn rejects_bad_weights() {
        let bad = FusionWeights { semantic_weight: 0.5, lexical_weight: 0.6 };
        assert!(matches!(HybridScorer::new(bad), Err(Error::Configuration(_))));
    }
}
