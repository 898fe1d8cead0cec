/// Sum of squares in `f64`; `f32` squares overflow above ~1.8e19 and vanish below ~1e-23.
pub(crate) fn norm_f64(v: &[f32]) -> f64 {
    v.iter()
        .map(|&x| {
            let x = f64::from(x);
            x * x
        })
        .sum::<f64>()
        .sqrt()
}

/// Euclidean length of `v`.
pub fn l2_norm(v: &[f32]) -> f32 {
    norm_f64(v) as f32
}

/// In-place L2 normalization helper to keep allocations down during hot paths.
/// A zero vector is left untouched so downstream similarity comes out as 0.
pub fn l2_normalize_in_place(v: &mut [f32]) {
    let norm = norm_f64(v);
    if norm > 0.0 {
        for x in v.iter_mut() {
            *x = (f64::from(*x) / norm) as f32;
        }
    }
}

/// Returns a unit-length copy of `v` (or an unchanged copy when the norm is zero).
pub fn normalize(v: &[f32]) -> Vec<f32> {
    let mut out = v.to_vec();
    l2_normalize_in_place(&mut out);
    out
}
