//! Embedding backends for the semantic classifier.
//!
//! `default_embedder` honours `APP_USE_FAKE_EMBEDDINGS=1` (or
//! `embedding.backend = "hash"`) to switch to the deterministic
//! `HashEmbedder`, which keeps tests fast and model-free.

use anyhow::Result;

use talkscore_core::config::{EmbeddingBackend, EmbeddingConfig};
use talkscore_core::traits::Embedder;

pub mod device;
pub mod hash;
pub mod model;
pub mod pool;
pub mod tokenize;

pub use hash::HashEmbedder;
pub use model::BgeEmbedder;
pub use pool::masked_mean_l2;

pub fn use_fake_embeddings() -> bool {
    std::env::var("APP_USE_FAKE_EMBEDDINGS").ok().map(|v| v == "1" || v.eq_ignore_ascii_case("true")).unwrap_or(false)
}

pub fn default_embedder(config: &EmbeddingConfig) -> Result<Box<dyn Embedder>> {
    if use_fake_embeddings() || config.backend == EmbeddingBackend::Hash {
        tracing::info!(dim = config.dim, "using HashEmbedder");
        return Ok(Box::new(HashEmbedder::new(config.dim)));
    }
    Ok(Box::new(BgeEmbedder::load(config)?))
}
