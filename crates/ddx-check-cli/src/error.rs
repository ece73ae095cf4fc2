use ddxcheck::compare::error::ComparisonError;
use ddxcheck::driver::DriverError;
use ddxcheck::io::log::LogError;
use ddxcheck::io::report::ReportError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Driver(#[from] DriverError),

    #[error(transparent)]
    Comparison(#[from] ComparisonError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse solver output: {0}")]
    SolverOutput(#[source] LogError),

    #[error("Failed to parse file '{path}': {source}", path = path.display())]
    FileParsing {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error(
        "{check} check failed: relative error {relative_error:.3e} is not below threshold {threshold:.3e}"
    )]
    ToleranceExceeded {
        check: &'static str,
        relative_error: f64,
        threshold: f64,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CliError {
    /// Process exit status for this error. A failed solver run passes its own
    /// status through unchanged.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Driver(DriverError::Failed { code, .. }) => *code,
            _ => 1,
        }
    }
}
