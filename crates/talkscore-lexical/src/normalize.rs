use talkscore_core::error::{Error, Result};
use talkscore_core::types::{CategoryCounts, CategoryScores};

/// Occurrences needed for a category to reach a score of 100.
pub const DEFAULT_SATURATION: u32 = 20;

/// Maps raw counts to `0..=100` with `min(100, round(count / K * 100))`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreNormalizer {
    saturation: u32,
}

impl Default for ScoreNormalizer {
    fn default() -> Self { Self { saturation: DEFAULT_SATURATION } }
}

impl ScoreNormalizer {
    pub fn new(saturation: u32) -> Result<Self> {
        if saturation == 0 {
            return Err(Error::Configuration("saturation threshold must be positive".into()));
        }
        Ok(Self { saturation })
    }

    pub fn score(&self, count: u32) -> u8 {
        let scaled = (f64::from(count) / f64::from(self.saturation) * 100.0).round();
        // clamped to [0, 100] before the cast
        scaled.clamp(0.0, 100.0) as u8
    }

    pub fn normalize(&self, counts: &CategoryCounts) -> CategoryScores { counts.map(|_, n| self.score(n)) }
}
