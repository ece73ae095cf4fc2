use clap::Parser;
use ddxcheck::compare::config::EnergyCheckMode;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "Tony Kan",
    version,
    about = "ddx-check - Runs the ddX solvation driver on a test case and checks its energy and forces against a reference log.",
    help_template = HELP_TEMPLATE,
)]
pub struct Cli {
    /// Base name of the test case. `<BASENAME>.txt` is passed to the solver and
    /// `<BASENAME>.ref` is read as the reference log.
    #[arg(required = true, value_name = "BASENAME")]
    pub basename: PathBuf,

    // --- Solver ---
    /// Path to the solver executable [default: ./ddx_driver_testing]
    #[arg(long, value_name = "PATH")]
    pub solver: Option<PathBuf>,

    /// Kill the solver and fail if it runs longer than this many seconds.
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    // --- Tolerance ---
    /// Relative-error threshold shared by the energy and force checks [default: 1e-4]
    #[arg(short, long, value_name = "FLOAT")]
    pub threshold: Option<f64>,

    /// How the relative energy error is formed: 'signed' or 'absolute' [default: signed]
    #[arg(long, value_name = "MODE")]
    pub energy_check: Option<EnergyCheckMode>,

    // --- Output ---
    /// Write per-atom force differences to a CSV file.
    #[arg(long, value_name = "PATH")]
    pub report: Option<PathBuf>,

    /// Path to an optional configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all log output and the progress spinner
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}
