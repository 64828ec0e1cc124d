//! Dense vector math shared by hashing and ranking.

/// Dot product of two equal-length vectors.
#[inline]
#[must_use]
pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Euclidean (L2) norm.
#[inline]
#[must_use]
pub fn norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

/// Cosine similarity `dot(a, b) / (norm(a) * norm(b))`, in `[-1, 1]`
/// up to floating-point error.
///
/// A zero-norm input produces `NaN`. Degenerate vectors must stay visible to
/// callers instead of being coerced to some similarity, so the value is
/// returned as-is.
#[inline]
#[must_use]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    dot(a, b) / (norm(a) * norm(b))
}
