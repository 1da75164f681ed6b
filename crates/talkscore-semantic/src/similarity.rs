use talkscore_core::config::Aggregation;

/// Cosine similarity; 0 when either vector has zero norm.
pub fn cosine(a: &[f32], b: &[f32]) -> f32 {
    let (mut dot, mut na, mut nb) = (0f32, 0f32, 0f32);
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        na += x * x;
        nb += y * y;
    }
    if na == 0.0 || nb == 0.0 { return 0.0; }
    dot / (na.sqrt() * nb.sqrt())
}

/// Collapse one segment's similarities against a category's entries.
/// Empty input aggregates to 0.
pub fn aggregate(similarities: &[f32], aggregation: Aggregation, top_k: usize) -> f32 {
    if similarities.is_empty() { return 0.0; }
    match aggregation {
        Aggregation::Max => similarities.iter().copied().fold(f32::NEG_INFINITY, f32::max),
        Aggregation::TopKMean => {
            let mut sorted = similarities.to_vec();
            sorted.sort_by(|a, b| b.total_cmp(a));
            let k = top_k.clamp(1, sorted.len());
            sorted[..k].iter().sum::<f32>() / k as f32
        }
    }
}

/// `min(100, round(max(0, strength) / saturation * 100))`.
pub fn strength_score(strength: f32, saturation: f32) -> u8 {
    let scaled = (f64::from(strength.max(0.0)) / f64::from(saturation) * 100.0).round();
    scaled.clamp(0.0, 100.0) as u8
}
