use talkscore_core::config::{EmbeddingBackend, EmbeddingConfig};
use talkscore_embed::{default_embedder, HashEmbedder};
use talkscore_core::traits::Embedder;

fn cosine(a: &[f32], b: &[f32]) -> f32 { a.iter().zip(b).map(|(x, y)| x * y).sum() }

#[test]
fn hash_embedder_shapes_and_determinism() {
    let config = EmbeddingConfig { backend: EmbeddingBackend::Hash, dim: 256, ..EmbeddingConfig::default() };
    let embedder = default_embedder(&config).expect("embedder");
    assert_eq!(embedder.dim(), 256);

    let texts = vec!["We mixed the colours".to_string(), "We mixed the colours".to_string()];
    let embs = embedder.embed_batch(&texts).expect("embed_batch");
    assert_eq!(embs.len(), 2);
    let v1 = &embs[0];
    assert_eq!(v1.len(), 256, "embedding dim follows config");

    let norm: f32 = v1.iter().map(|x| x * x).sum::<f32>().sqrt();
    assert!((norm - 1.0).abs() <= 1e-3, "vector is L2-normalized (norm={norm})");
    for (a, b) in v1.iter().zip(embs[1].iter()) { assert!((a - b).abs() <= 1e-6); }
}

#[test]
fn hash_embedder_ignores_case_and_punctuation() {
    let e = HashEmbedder::new(512);
    let a = e.embed_text("The Experiment worked!");
    let b = e.embed_text("the experiment, worked");
    assert!(cosine(&a, &b) > 0.999);
    let c = e.embed_text("my friend shared her crayons");
    assert!(cosine(&a, &c) < cosine(&a, &b));
}

#[test]
fn hash_embedder_blank_text_is_zero_vector() {
    let e = HashEmbedder::new(16);
    assert!(e.embed_text("  ...  ").iter().all(|x| *x == 0.0));
}
