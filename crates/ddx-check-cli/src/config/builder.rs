use super::defaults::DefaultsConfig;
use super::file::FileConfig;
use super::models::AppConfig;
use crate::cli::Cli;
use crate::error::{CliError, Result};
use ddxcheck::compare::config::ComparisonConfigBuilder;
use ddxcheck::driver::{REFERENCE_EXTENSION, SolverCommand, derive_path};
use std::time::Duration;
use tracing::debug;

/// Merges command-line flags, the optional config file, and built-in defaults,
/// in that order of precedence.
pub fn build_config(args: &Cli) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = match &args.config {
        Some(path) => FileConfig::from_file(path)?,
        None => FileConfig::default(),
    };

    let solver_file = file_config.solver.unwrap_or_default();
    let executable = args
        .solver
        .clone()
        .or(solver_file.executable)
        .unwrap_or(defaults.solver_executable);
    let timeout_secs = args
        .timeout
        .or(solver_file.timeout_secs)
        .or(defaults.timeout_secs);
    let timeout = match timeout_secs {
        Some(0) => {
            return Err(CliError::Config(
                "Solver timeout must be at least one second".to_string(),
            ));
        }
        Some(secs) => Some(Duration::from_secs(secs)),
        None => None,
    };

    let tolerance_file = file_config.tolerance.unwrap_or_default();
    let threshold = args
        .threshold
        .or(tolerance_file.threshold)
        .unwrap_or(defaults.threshold);
    let energy_check = args
        .energy_check
        .or(tolerance_file.energy_check)
        .unwrap_or(defaults.energy_check);

    let comparison = ComparisonConfigBuilder::new()
        .threshold(threshold)
        .energy_check(energy_check)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    let solver = SolverCommand::for_basename(executable, &args.basename).with_timeout(timeout);
    let reference_path = derive_path(&args.basename, REFERENCE_EXTENSION);

    debug!(
        "Resolved configuration: solver={:?}, input={:?}, reference={:?}, threshold={:e}, energy-check={}, timeout={:?}",
        solver.executable,
        solver.input,
        reference_path,
        comparison.threshold,
        comparison.energy_check,
        solver.timeout
    );

    Ok(AppConfig {
        basename: args.basename.clone(),
        reference_path,
        solver,
        comparison,
        report_path: args.report.clone(),
    })
}
