use crate::config::AppConfig;
use crate::error::{CliError, Result};
use crate::utils::progress::SolverSpinner;
use ddxcheck::compare::check::{check_energy, check_force_diff};
use ddxcheck::compare::metrics::{diff, infinity_norm};
use ddxcheck::compare::config::ComparisonConfig;
use ddxcheck::io::log::SolverLog;
use ddxcheck::io::report::write_force_report;
use std::io::Write;
use std::path::Path;
use tracing::{info, warn};

pub async fn run(config: &AppConfig, quiet: bool) -> Result<()> {
    info!("Checking test case {:?}", &config.basename);

    let spinner = SolverSpinner::start(&config.solver.executable, quiet);
    let output = config.solver.run().await;
    spinner.finish();
    let output = output?;

    let computed: SolverLog = output.stdout.parse().map_err(CliError::SolverOutput)?;
    if !computed.has_energy() {
        warn!("Solver output has no solvation energy line; using 0.0.");
    }

    info!("Loading reference log from {:?}", &config.reference_path);
    let reference =
        SolverLog::read_from_path(&config.reference_path).map_err(|e| CliError::FileParsing {
            path: config.reference_path.clone(),
            source: e.into(),
        })?;
    if !reference.has_energy() {
        warn!(
            "Reference log {:?} has no solvation energy line; using 0.0.",
            &config.reference_path
        );
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    evaluate(
        &computed,
        &reference,
        &config.comparison,
        config.report_path.as_deref(),
        &mut out,
    )
}

/// Prints the diagnostics for one comparison to `out` and turns a failed check
/// into [`CliError::ToleranceExceeded`].
///
/// The energy check runs first; when it fails, the force line is not printed.
/// The force line is printed before the ratio is formed, so it is still shown
/// when the reference forces are identically zero. A requested report is
/// written before the force verdict so that it survives a failing run.
pub fn evaluate(
    computed: &SolverLog,
    reference: &SolverLog,
    comparison: &ComparisonConfig,
    report_path: Option<&Path>,
    out: &mut impl Write,
) -> Result<()> {
    writeln!(out, "Energy:         {:20.10}", computed.energy)?;
    writeln!(out, "Ref. energy:    {:20.10}", reference.energy)?;

    let energy = check_energy(computed.energy, reference.energy, comparison)?;
    if !energy.passed {
        return Err(CliError::ToleranceExceeded {
            check: "energy",
            relative_error: energy.relative_error,
            threshold: comparison.threshold,
        });
    }

    let rows = diff(&computed.forces, &reference.forces)?;
    writeln!(out, "Force max diff: {:20.10}", infinity_norm(&rows))?;
    out.flush()?;

    let forces = check_force_diff(rows, &reference.forces, comparison)?;

    if let Some(path) = report_path {
        write_force_report(&forces.diff, path)?;
        info!("Wrote force difference report to {:?}", path);
    }

    if !forces.passed {
        return Err(CliError::ToleranceExceeded {
            check: "force",
            relative_error: forces.relative_error,
            threshold: comparison.threshold,
        });
    }

    info!(
        atoms = forces.diff.len(),
        energy_error = energy.relative_error,
        force_error = forces.relative_error,
        "Energy and forces agree with the reference."
    );
    Ok(())
}
