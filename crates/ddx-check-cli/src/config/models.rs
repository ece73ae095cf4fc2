use ddxcheck::compare::config::ComparisonConfig;
use ddxcheck::driver::SolverCommand;
use std::path::PathBuf;

pub struct AppConfig {
    pub basename: PathBuf,
    pub reference_path: PathBuf,
    pub solver: SolverCommand,
    pub comparison: ComparisonConfig,
    pub report_path: Option<PathBuf>,
}
