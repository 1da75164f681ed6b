//! Lightweight configuration loader and path helpers.
//!
//! Uses Figment to merge `config.toml` + `config.<env>.toml` + `APP_*` env vars
//! (nested keys separated by `__`, e.g. `APP_FUSION__SEMANTIC_WEIGHT`).
//! `ClassifierConfig` is the typed view consumed by the pipeline; every field
//! has a default so an absent file still yields a usable configuration.

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::new().merge(Toml::file("config.toml"));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        Ok(Self { figment })
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    /// Extract and validate the classifier settings.
    pub fn classifier(&self) -> Result<ClassifierConfig> {
        let config: ClassifierConfig = self
            .figment
            .extract()
            .map_err(|e| Error::Configuration(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub lexical: LexicalConfig,
    pub semantic: SemanticConfig,
    pub fusion: FusionWeights,
    pub knowledge_base: KnowledgeBaseConfig,
    pub embedding: EmbeddingConfig,
}

impl ClassifierConfig {
    pub fn validate(&self) -> Result<()> {
        if self.lexical.saturation == 0 {
            return Err(Error::Configuration("lexical.saturation must be positive".into()));
        }
        self.semantic.validate()?;
        self.fusion.validate()?;
        if self.embedding.dim == 0 || self.embedding.max_len == 0 {
            return Err(Error::Configuration("embedding.dim and embedding.max_len must be positive".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LexicalConfig {
    /// Keyword occurrences needed for a category to reach 100.
    pub saturation: u32,
    /// Optional TOML file replacing the built-in taxonomy.
    pub taxonomy_path: Option<String>,
}

impl Default for LexicalConfig {
    fn default() -> Self { Self { saturation: 20, taxonomy_path: None } }
}

/// How per-entry similarities collapse into one value per category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    #[default]
    Max,
    TopKMean,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SemanticConfig {
    pub enabled: bool,
    /// Aggregated cosine similarity a segment must exceed to count as evidence.
    pub similarity_threshold: f32,
    pub aggregation: Aggregation,
    /// Used only with `Aggregation::TopKMean`.
    pub top_k: usize,
    /// Similarity that maps to a score of 100.
    pub strength_saturation: f32,
    pub min_segment_chars: usize,
    pub timeout_ms: u64,
}

impl Default for SemanticConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            similarity_threshold: 0.55,
            aggregation: Aggregation::Max,
            top_k: 3,
            strength_saturation: 0.85,
            min_segment_chars: 8,
            timeout_ms: 5_000,
        }
    }
}

impl SemanticConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.similarity_threshold.is_finite() || !(-1.0..=1.0).contains(&self.similarity_threshold) {
            return Err(Error::Configuration(format!(
                "semantic.similarity_threshold must be within [-1, 1], got {}",
                self.similarity_threshold
            )));
        }
        if !self.strength_saturation.is_finite() || self.strength_saturation <= 0.0 || self.strength_saturation > 1.0 {
            return Err(Error::Configuration(format!(
                "semantic.strength_saturation must be within (0, 1], got {}",
                self.strength_saturation
            )));
        }
        if self.aggregation == Aggregation::TopKMean && self.top_k == 0 {
            return Err(Error::Configuration("semantic.top_k must be positive for top_k_mean".into()));
        }
        if self.timeout_ms == 0 {
            return Err(Error::Configuration("semantic.timeout_ms must be positive".into()));
        }
        Ok(())
    }
}

/// Fusion weights for the hybrid scorer. Must sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionWeights {
    pub semantic_weight: f64,
    pub lexical_weight: f64,
}

impl Default for FusionWeights {
    fn default() -> Self { Self { semantic_weight: 0.6, lexical_weight: 0.4 } }
}

impl FusionWeights {
    pub const SUM_TOLERANCE: f64 = 1e-6;

    pub fn new(semantic_weight: f64, lexical_weight: f64) -> Result<Self> {
        let weights = Self { semantic_weight, lexical_weight };
        weights.validate()?;
        Ok(weights)
    }

    pub fn validate(&self) -> Result<()> {
        for (name, w) in [("semantic_weight", self.semantic_weight), ("lexical_weight", self.lexical_weight)] {
            if !w.is_finite() || !(0.0..=1.0).contains(&w) {
                return Err(Error::Configuration(format!("fusion.{name} must be within [0, 1], got {w}")));
            }
        }
        let sum = self.semantic_weight + self.lexical_weight;
        if (sum - 1.0).abs() > Self::SUM_TOLERANCE {
            return Err(Error::Configuration(format!("fusion weights must sum to 1, got {sum}")));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KnowledgeBaseConfig {
    pub uri: String,
    pub table: String,
}

impl Default for KnowledgeBaseConfig {
    fn default() -> Self { Self { uri: "data/kb".to_string(), table: "knowledge_base".to_string() } }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingBackend {
    #[default]
    Model,
    Hash,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub backend: EmbeddingBackend,
    pub model_dir: String,
    pub max_len: usize,
    pub dim: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self { backend: EmbeddingBackend::Model, model_dir: "models/bge-m3".to_string(), max_len: 256, dim: 1024 }
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    // Expand env vars first
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
/// If `p` is absolute, it's returned as-is; otherwise `base.join(p)` is returned.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}
