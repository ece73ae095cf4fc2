use super::error::ComparisonError;
use nalgebra::Vector3;

/// Elementwise difference `computed[i] - reference[i]` of two force sequences.
///
/// # Errors
///
/// Returns [`ComparisonError::AtomCountMismatch`] if the sequences differ in length.
pub fn diff(
    computed: &[Vector3<f64>],
    reference: &[Vector3<f64>],
) -> Result<Vec<Vector3<f64>>, ComparisonError> {
    if computed.len() != reference.len() {
        return Err(ComparisonError::AtomCountMismatch {
            computed: computed.len(),
            reference: reference.len(),
        });
    }

    Ok(computed
        .iter()
        .zip(reference)
        .map(|(a, b)| a - b)
        .collect())
}

/// Largest absolute element over all rows; `0.0` for empty or all-zero input.
///
/// A NaN element anywhere makes the norm NaN, so a ratio built from it can
/// never pass a tolerance check.
pub fn infinity_norm(rows: &[Vector3<f64>]) -> f64 {
    rows.iter()
        .flat_map(|row| row.iter())
        .fold(0.0, |acc: f64, &value| {
            if acc.is_nan() || value.is_nan() {
                f64::NAN
            } else {
                acc.max(value.abs())
            }
        })
}
