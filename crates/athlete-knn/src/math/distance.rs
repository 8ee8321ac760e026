use crate::error::{KnnError, Result};

/// Euclidean distance between two feature vectors: √(Σ(aᵢ - bᵢ)²).
///
/// Both slices must have the same length, otherwise
/// [`KnnError::DimensionMismatch`] is returned. Values are expected to be
/// numeric already; text coercion happens when records are loaded.
pub fn euclidean(a: &[f64], b: &[f64]) -> Result<f64> {
    if a.len() != b.len() {
        return Err(KnnError::DimensionMismatch {
            expected: a.len(),
            found: b.len(),
        });
    }

    let sum_sq = a
        .iter()
        .zip(b.iter())
        .map(|(&ai, &bi)| {
            let diff = ai - bi;
            diff * diff
        })
        .sum::<f64>();

    Ok(sum_sq.sqrt())
}
