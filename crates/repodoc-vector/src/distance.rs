use repodoc_core::traits::Similarity;

pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    let n = a.len().min(b.len());
    let (a, b) = (&a[..n], &b[..n]);
    let mut sum = 0.0;
    let mut i = 0;

    // Unrolling 4
    while i + 3 < n {
        sum += a[i] * b[i] + a[i + 1] * b[i + 1] + a[i + 2] * b[i + 2] + a[i + 3] * b[i + 3];
        i += 4;
    }
    while i < n {
        sum += a[i] * b[i];
        i += 1;
    }
    sum
}

pub fn magnitude(v: &[f32]) -> f32 { dot(v, v).sqrt() }

/// Score of a stored vector against a query; higher is more similar.
/// Cosine against a zero vector is 0.
pub fn score(similarity: Similarity, query: &[f32], query_norm: f32, vector: &[f32], vector_norm: f32) -> f32 {
    let d = dot(query, vector);
    let s = match similarity {
        Similarity::DotProduct => d,
        Similarity::Cosine if query_norm == 0.0 || vector_norm == 0.0 => 0.0,
        Similarity::Cosine => d / (query_norm * vector_norm),
    };
    if s.is_nan() { f32::NEG_INFINITY } else { s }
}
