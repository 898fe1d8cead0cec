use crate::normalize::norm_f64;
use crate::VectorError;

fn check_dims(a: &[f32], b: &[f32]) -> Result<(), VectorError> {
    if a.len() != b.len() {
        return Err(VectorError::DimensionMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    Ok(())
}

fn dot_f64(a: &[f32], b: &[f32]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| f64::from(x) * f64::from(y))
        .sum()
}

/// Dot product of two equal-length vectors, accumulated in `f64`.
pub fn dot(a: &[f32], b: &[f32]) -> Result<f32, VectorError> {
    check_dims(a, b)?;
    Ok(dot_f64(a, b) as f32)
}

/// Cosine similarity in `[-1, 1]`.
///
/// Returns `0.0` when either side has zero norm instead of dividing by zero.
/// Mismatched dimensions are an error, never a silently truncated dot product.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32, VectorError> {
    check_dims(a, b)?;
    let norms = norm_f64(a) * norm_f64(b);
    if norms > 0.0 {
        Ok((dot_f64(a, b) / norms).clamp(-1.0, 1.0) as f32)
    } else {
        Ok(0.0)
    }
}
