use super::config::{ComparisonConfig, EnergyCheckMode};
use super::error::ComparisonError;
use super::metrics::{diff, infinity_norm};
use nalgebra::Vector3;
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct EnergyCheck {
    pub computed: f64,
    pub reference: f64,
    pub relative_error: f64,
    pub passed: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForceCheck {
    pub diff: Vec<Vector3<f64>>,
    pub max_diff: f64,
    pub max_reference: f64,
    pub relative_error: f64,
    pub passed: bool,
}

// Strict inequality: a ratio sitting exactly on the threshold fails, as does NaN.
#[inline]
fn within(relative_error: f64, threshold: f64) -> bool {
    relative_error < threshold
}

/// Compares a computed solvation energy against the reference value.
///
/// The relative error is formed according to `config.energy_check` and passes
/// only when strictly below `config.threshold`.
///
/// # Errors
///
/// Returns [`ComparisonError::ZeroReferenceEnergy`] when the reference energy is
/// exactly zero.
pub fn check_energy(
    computed: f64,
    reference: f64,
    config: &ComparisonConfig,
) -> Result<EnergyCheck, ComparisonError> {
    if reference == 0.0 {
        return Err(ComparisonError::ZeroReferenceEnergy);
    }

    let relative_error = match config.energy_check {
        EnergyCheckMode::Signed => (computed - reference) / reference,
        EnergyCheckMode::Absolute => ((computed - reference) / reference).abs(),
    };
    let passed = within(relative_error, config.threshold);
    debug!(
        computed,
        reference,
        relative_error,
        mode = %config.energy_check,
        passed,
        "Energy check evaluated."
    );

    Ok(EnergyCheck {
        computed,
        reference,
        relative_error,
        passed,
    })
}

/// Compares computed per-atom forces against the reference forces.
///
/// The relative error is `‖computed − reference‖∞ / ‖reference‖∞`.
///
/// # Errors
///
/// Returns [`ComparisonError::AtomCountMismatch`] if the atom counts differ and
/// [`ComparisonError::ZeroReferenceForces`] if every reference component is zero.
pub fn check_forces(
    computed: &[Vector3<f64>],
    reference: &[Vector3<f64>],
    config: &ComparisonConfig,
) -> Result<ForceCheck, ComparisonError> {
    let rows = diff(computed, reference)?;
    check_force_diff(rows, reference, config)
}

/// Judges an already computed force difference against the reference norm.
///
/// Lets a caller report the maximum difference before the ratio is formed,
/// which fails for identically zero reference forces.
pub fn check_force_diff(
    rows: Vec<Vector3<f64>>,
    reference: &[Vector3<f64>],
    config: &ComparisonConfig,
) -> Result<ForceCheck, ComparisonError> {
    if rows.len() != reference.len() {
        return Err(ComparisonError::AtomCountMismatch {
            computed: rows.len(),
            reference: reference.len(),
        });
    }

    let max_diff = infinity_norm(&rows);
    let max_reference = infinity_norm(reference);
    if max_reference == 0.0 {
        return Err(ComparisonError::ZeroReferenceForces);
    }

    let relative_error = max_diff / max_reference;
    let passed = within(relative_error, config.threshold);
    debug!(
        atoms = rows.len(),
        max_diff, max_reference, relative_error, passed, "Force check evaluated."
    );

    Ok(ForceCheck {
        diff: rows,
        max_diff,
        max_reference,
        relative_error,
        passed,
    })
}
