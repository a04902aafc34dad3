/// Cosine similarity between two vectors. Returns 0.0 for zero-length or
/// zero-norm vectors; otherwise clamped to `[-1, 1]`.
///
/// Accumulates in f64 so the result does not depend on vector magnitude.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dim = a.len().min(b.len());
    if dim == 0 {
        return 0.0;
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;

    for (&x, &y) in a[..dim].iter().zip(&b[..dim]) {
        let (x, y) = (f64::from(x), f64::from(y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    (dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(-1.0, 1.0) as f32
}
